use crate::scheme::Kind;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {

    /* the component name is not one of api, sched or rte */
    #[error("unknown component: {0}")]
    InvalidComponent(String),

    /* a packaging defect: the path is not part of the embedded bundle */
    #[error("manifest not found in catalog: {0}")]
    NotFound(String),

    #[error("unable to parse manifest {path}: {source}")]
    Parse {
	path: String,
	#[source]
	source: serde_yaml::Error,
    },

    #[error("manifest {0} carries no apiVersion/kind")]
    MissingTypeMeta(String),

    #[error("manifest {path} has unregistered kind {api_version}/{kind}")]
    UnknownKind {
	path: String,
	api_version: String,
	kind: String,
    },

    #[error("unexpected type, expected {expected} got {found}")]
    KindMismatch {
	expected: Kind,
	found: Kind,
    },

    #[error("unable to serialize object: {0}")]
    Serialize(#[from] serde_yaml::Error),

    #[error("unable to write object: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;

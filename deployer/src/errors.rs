use crate::transport::ClusterError;
use deployer_manifests::ObjectIdentity;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {

    /* encapsulate a kube-rust error, e.g. while building the client */
    #[error("kube error: {0}")]
    Kube(#[from] kube::Error),

    /* invalid component, missing or undecodable manifest */
    #[error("manifest error: {0}")]
    Manifest(#[from] deployer_manifests::Error),

    #[error("unable to create {identity}: {source}")]
    Create {
	identity: ObjectIdentity,
	#[source]
	source: ClusterError,
    },

    #[error("unable to delete {identity}: {source}")]
    Delete {
	identity: ObjectIdentity,
	#[source]
	source: ClusterError,
    },
}

pub type Result<T, E = Error> = std::result::Result<T, E>;

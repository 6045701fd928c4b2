use crate::catalog::RawManifest;
use crate::errors::{Error, Result};
use crate::object::{FromTypedObject, TypedObject};
use crate::scheme::{Kind, Scheme};

use serde::Deserialize;

/*
 * Just enough of a document to pick the concrete type it should be
 * decoded into.
 */
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct TypeMetaProbe {
    api_version: Option<String>,
    kind: Option<String>,
}

/*
 * Decoder turns raw manifest bytes into a TypedObject. It only knows the
 * kinds registered in the scheme it was built with and fails closed on
 * anything else.
 */
#[derive(Debug, Copy, Clone)]
pub struct Decoder<'s> {
    scheme: &'s Scheme,
}

impl<'s> Decoder<'s> {

    pub fn new(scheme: &'s Scheme) -> Self {
	Self{
	    scheme: scheme,
	}
    }

    pub fn decode_manifest(&self, raw: &RawManifest) -> Result<TypedObject> {
	self.decode(raw.path(), raw.data())
    }

    /*
     * `origin` is only used to label errors, usually the catalog path.
     */
    pub fn decode(&self, origin: &str, data: &[u8]) -> Result<TypedObject> {
	let probe: TypeMetaProbe = serde_yaml::from_slice(data).map_err(|err| parse_error(origin, err))?;

	let (api_version, kind_name) = match (probe.api_version, probe.kind) {
	    (Some(api_version), Some(kind)) if !api_version.is_empty() && !kind.is_empty() => (api_version, kind),
	    _ => return Err(Error::MissingTypeMeta(origin.to_string())),
	};

	let kind = match self.scheme.lookup(&api_version, &kind_name) {
	    Some(kind) => kind,
	    None => {
		return Err(Error::UnknownKind{
		    path: origin.to_string(),
		    api_version: api_version,
		    kind: kind_name,
		});
	    }
	};

	log::debug!("decoding {} as {}", origin, kind);

	let parse = |err: serde_yaml::Error| parse_error(origin, err);
	let obj = match kind {
	    Kind::Namespace => TypedObject::Namespace(serde_yaml::from_slice(data).map_err(parse)?),
	    Kind::ServiceAccount => TypedObject::ServiceAccount(serde_yaml::from_slice(data).map_err(parse)?),
	    Kind::ClusterRole => TypedObject::ClusterRole(serde_yaml::from_slice(data).map_err(parse)?),
	    Kind::ClusterRoleBinding => TypedObject::ClusterRoleBinding(serde_yaml::from_slice(data).map_err(parse)?),
	    Kind::RoleBinding => TypedObject::RoleBinding(serde_yaml::from_slice(data).map_err(parse)?),
	    Kind::ConfigMap => TypedObject::ConfigMap(serde_yaml::from_slice(data).map_err(parse)?),
	    Kind::Deployment => TypedObject::Deployment(serde_yaml::from_slice(data).map_err(parse)?),
	    Kind::DaemonSet => TypedObject::DaemonSet(serde_yaml::from_slice(data).map_err(parse)?),
	    Kind::CustomResourceDefinition => TypedObject::CustomResourceDefinition(serde_yaml::from_slice(data).map_err(parse)?),
	};

	Ok(obj)
    }

    /*
     * decode() followed by the "object is of kind T" check.
     */
    pub fn decode_as<T: FromTypedObject>(&self, raw: &RawManifest) -> Result<T> {
	let obj = self.decode_manifest(raw)?;
	T::from_typed(obj)
    }
}

fn parse_error(origin: &str, err: serde_yaml::Error) -> Error {
    Error::Parse{
	path: origin.to_string(),
	source: err,
    }
}

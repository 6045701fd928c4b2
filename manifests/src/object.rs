use crate::errors::{Error, Result};
use crate::scheme::Kind;

use k8s_openapi::api::apps::v1::{DaemonSet, Deployment};
use k8s_openapi::api::core::v1::{ConfigMap, Namespace, ServiceAccount};
use k8s_openapi::api::rbac::v1::{ClusterRole, ClusterRoleBinding, RoleBinding};
use k8s_openapi::apiextensions_apiserver::pkg::apis::apiextensions::v1::CustomResourceDefinition;
use kube::api::ObjectMeta;
use serde::Serialize;
use std::fmt;
use std::io::Write;

/*
 * A decoded resource object, tagged with its concrete kind.
 */
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum TypedObject {
    Namespace(Namespace),
    ServiceAccount(ServiceAccount),
    ClusterRole(ClusterRole),
    ClusterRoleBinding(ClusterRoleBinding),
    RoleBinding(RoleBinding),
    ConfigMap(ConfigMap),
    Deployment(Deployment),
    DaemonSet(DaemonSet),
    CustomResourceDefinition(CustomResourceDefinition),
}

impl TypedObject {

    pub fn kind(&self) -> Kind {
	match self {
	    TypedObject::Namespace(_) => Kind::Namespace,
	    TypedObject::ServiceAccount(_) => Kind::ServiceAccount,
	    TypedObject::ClusterRole(_) => Kind::ClusterRole,
	    TypedObject::ClusterRoleBinding(_) => Kind::ClusterRoleBinding,
	    TypedObject::RoleBinding(_) => Kind::RoleBinding,
	    TypedObject::ConfigMap(_) => Kind::ConfigMap,
	    TypedObject::Deployment(_) => Kind::Deployment,
	    TypedObject::DaemonSet(_) => Kind::DaemonSet,
	    TypedObject::CustomResourceDefinition(_) => Kind::CustomResourceDefinition,
	}
    }

    pub fn metadata(&self) -> &ObjectMeta {
	match self {
	    TypedObject::Namespace(obj) => &obj.metadata,
	    TypedObject::ServiceAccount(obj) => &obj.metadata,
	    TypedObject::ClusterRole(obj) => &obj.metadata,
	    TypedObject::ClusterRoleBinding(obj) => &obj.metadata,
	    TypedObject::RoleBinding(obj) => &obj.metadata,
	    TypedObject::ConfigMap(obj) => &obj.metadata,
	    TypedObject::Deployment(obj) => &obj.metadata,
	    TypedObject::DaemonSet(obj) => &obj.metadata,
	    TypedObject::CustomResourceDefinition(obj) => &obj.metadata,
	}
    }

    pub fn identity(&self) -> ObjectIdentity {
	let kind = self.kind();
	let metadata = self.metadata();

	let namespace = if kind.is_namespaced() {
	    metadata.namespace.clone()
	} else {
	    None
	};

	ObjectIdentity{
	    kind: kind,
	    namespace: namespace,
	    name: metadata.name.clone().unwrap_or_default(),
	}
    }
}

/*
 * kind/namespace/name of an object, enough to tell the cluster (and the
 * user reading an error) which object we are talking about.
 */
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ObjectIdentity {
    pub kind: Kind,
    pub namespace: Option<String>,
    pub name: String,
}

impl fmt::Display for ObjectIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
	match &self.namespace {
	    Some(ns) => write!(f, "{} {}/{}", self.kind, ns, self.name),
	    None => write!(f, "{} {}", self.kind, self.name),
	}
    }
}

/*
 * Conversion from the tagged variant back to a concrete type. This is the
 * "object is of kind X" check every accessor applies: a mismatch is an
 * error, never a cast.
 */
pub trait FromTypedObject: Sized {
    const EXPECTED: Kind;

    fn from_typed(obj: TypedObject) -> Result<Self>;
}

macro_rules! typed_kind {
    ($ty:ident) => {
	impl FromTypedObject for $ty {
	    const EXPECTED: Kind = Kind::$ty;

	    fn from_typed(obj: TypedObject) -> Result<Self> {
		match obj {
		    TypedObject::$ty(inner) => Ok(inner),
		    other => Err(Error::KindMismatch{
			expected: Kind::$ty,
			found: other.kind(),
		    }),
		}
	    }
	}

	impl From<$ty> for TypedObject {
	    fn from(obj: $ty) -> Self {
		TypedObject::$ty(obj)
	    }
	}
    };
}

typed_kind!(Namespace);
typed_kind!(ServiceAccount);
typed_kind!(ClusterRole);
typed_kind!(ClusterRoleBinding);
typed_kind!(RoleBinding);
typed_kind!(ConfigMap);
typed_kind!(Deployment);
typed_kind!(DaemonSet);
typed_kind!(CustomResourceDefinition);

/*
 * Writes the object as a single YAML document. apiVersion and kind are
 * always emitted, so the output decodes back into the same object.
 */
pub fn serialize_object<W: Write>(obj: &TypedObject, out: &mut W) -> Result<()> {
    let text = serde_yaml::to_string(obj)?;
    out.write_all(text.as_bytes())?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn meta(name: &str, namespace: Option<&str>) -> ObjectMeta {
	ObjectMeta{
	    name: Some(name.to_string()),
	    namespace: namespace.map(|ns| ns.to_string()),
	    ..ObjectMeta::default()
	}
    }

    #[test]
    fn identity_of_namespaced_object() {
	let obj = TypedObject::from(ServiceAccount{
	    metadata: meta("rte", Some("tas-topology-exporter")),
	    ..ServiceAccount::default()
	});

	let id = obj.identity();
	assert_eq!(id.kind, Kind::ServiceAccount);
	assert_eq!(id.namespace.as_deref(), Some("tas-topology-exporter"));
	assert_eq!(id.to_string(), "ServiceAccount tas-topology-exporter/rte");
    }

    #[test]
    fn identity_of_cluster_object_drops_namespace() {
	let obj = TypedObject::from(ClusterRole{
	    metadata: meta("rte", Some("ignored")),
	    ..ClusterRole::default()
	});

	let id = obj.identity();
	assert_eq!(id.namespace, None);
	assert_eq!(id.to_string(), "ClusterRole rte");
    }

    #[test]
    fn from_typed_rejects_other_kinds() {
	let obj = TypedObject::from(Namespace{
	    metadata: meta("tas-scheduler", None),
	    ..Namespace::default()
	});

	match ServiceAccount::from_typed(obj.clone()) {
	    Err(Error::KindMismatch{ expected, found }) => {
		assert_eq!(expected, Kind::ServiceAccount);
		assert_eq!(found, Kind::Namespace);
	    },
	    other => panic!("expected KindMismatch, got {:?}", other),
	}

	let ns = Namespace::from_typed(obj).unwrap();
	assert_eq!(ns.metadata.name.as_deref(), Some("tas-scheduler"));
    }

    #[test]
    fn serialized_object_carries_type_meta() {
	let obj = TypedObject::from(ConfigMap{
	    metadata: meta("scheduler-config", Some("tas-scheduler")),
	    ..ConfigMap::default()
	});

	let mut out: Vec<u8> = Vec::new();
	serialize_object(&obj, &mut out).unwrap();
	let text = String::from_utf8(out).unwrap();

	assert!(text.contains("apiVersion: v1"));
	assert!(text.contains("kind: ConfigMap"));
	assert!(text.contains("name: scheduler-config"));
    }
}

use k8s_openapi::api::apps::v1::{DaemonSet, Deployment};
use k8s_openapi::api::core::v1::{ConfigMap, Namespace, ServiceAccount};
use k8s_openapi::api::rbac::v1::{ClusterRole, ClusterRoleBinding, RoleBinding};
use k8s_openapi::apiextensions_apiserver::pkg::apis::apiextensions::v1::CustomResourceDefinition;
use k8s_openapi::Resource;
use std::collections::BTreeSet;
use std::fmt;
use std::sync::OnceLock;

/*
 * Every kind of object the decoder is able to produce.
 */
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Kind {
    Namespace,
    ServiceAccount,
    ClusterRole,
    ClusterRoleBinding,
    RoleBinding,
    ConfigMap,
    Deployment,
    DaemonSet,
    CustomResourceDefinition,
}

impl Kind {

    pub const ALL: [Kind; 9] = [
	Kind::Namespace,
	Kind::ServiceAccount,
	Kind::ClusterRole,
	Kind::ClusterRoleBinding,
	Kind::RoleBinding,
	Kind::ConfigMap,
	Kind::Deployment,
	Kind::DaemonSet,
	Kind::CustomResourceDefinition,
    ];

    pub fn api_version(&self) -> &'static str {
	match self {
	    Kind::Namespace => Namespace::API_VERSION,
	    Kind::ServiceAccount => ServiceAccount::API_VERSION,
	    Kind::ClusterRole => ClusterRole::API_VERSION,
	    Kind::ClusterRoleBinding => ClusterRoleBinding::API_VERSION,
	    Kind::RoleBinding => RoleBinding::API_VERSION,
	    Kind::ConfigMap => ConfigMap::API_VERSION,
	    Kind::Deployment => Deployment::API_VERSION,
	    Kind::DaemonSet => DaemonSet::API_VERSION,
	    Kind::CustomResourceDefinition => CustomResourceDefinition::API_VERSION,
	}
    }

    pub fn name(&self) -> &'static str {
	match self {
	    Kind::Namespace => Namespace::KIND,
	    Kind::ServiceAccount => ServiceAccount::KIND,
	    Kind::ClusterRole => ClusterRole::KIND,
	    Kind::ClusterRoleBinding => ClusterRoleBinding::KIND,
	    Kind::RoleBinding => RoleBinding::KIND,
	    Kind::ConfigMap => ConfigMap::KIND,
	    Kind::Deployment => Deployment::KIND,
	    Kind::DaemonSet => DaemonSet::KIND,
	    Kind::CustomResourceDefinition => CustomResourceDefinition::KIND,
	}
    }

    /* cluster scoped kinds ignore metadata.namespace */
    pub fn is_namespaced(&self) -> bool {
	!matches!(self, Kind::Namespace | Kind::ClusterRole | Kind::ClusterRoleBinding | Kind::CustomResourceDefinition)
    }
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
	f.write_str(self.name())
    }
}

/*
 * Scheme is the registry of kinds the decoder recognizes. A kind that
 * was never registered is rejected at decode time, even if Kind knows
 * about it.
 *
 * Registration is idempotent: registering the same kind twice is a no-op.
 */
#[derive(Debug, Clone, Default)]
pub struct Scheme {
    kinds: BTreeSet<Kind>,
}

impl Scheme {

    pub fn new() -> Self {
	Self{
	    kinds: BTreeSet::new(),
	}
    }

    /* Returns false when the kind was already registered */
    pub fn register(&mut self, kind: Kind) -> bool {
	self.kinds.insert(kind)
    }

    /* core/v1, rbac.authorization.k8s.io/v1 and apps/v1 */
    pub fn add_builtin_kinds(&mut self) {
	for kind in Kind::ALL {
	    if kind != Kind::CustomResourceDefinition {
		self.register(kind);
	    }
	}
    }

    /* apiextensions.k8s.io/v1 */
    pub fn add_apiextensions_kinds(&mut self) {
	self.register(Kind::CustomResourceDefinition);
    }

    pub fn with_default_kinds() -> Self {
	let mut scheme = Self::new();
	scheme.add_builtin_kinds();
	scheme.add_apiextensions_kinds();
	scheme
    }

    pub fn recognizes(&self, kind: Kind) -> bool {
	self.kinds.contains(&kind)
    }

    pub fn lookup(&self, api_version: &str, kind: &str) -> Option<Kind> {
	self.kinds.iter()
	    .copied()
	    .find(|k| k.api_version() == api_version && k.name() == kind)
    }

    pub fn len(&self) -> usize {
	self.kinds.len()
    }

    pub fn is_empty(&self) -> bool {
	self.kinds.is_empty()
    }
}

static SCHEME: OnceLock<Scheme> = OnceLock::new();

/*
 * Returns the process-wide scheme, building it on first call. Later calls
 * hand back the same instance, so calling init() again is harmless.
 */
pub fn init() -> &'static Scheme {
    SCHEME.get_or_init(Scheme::with_default_kinds)
}

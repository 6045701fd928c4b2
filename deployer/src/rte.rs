use crate::deployer::DeployOptions;
use crate::errors::Result;
use deployer_manifests::updates;
use deployer_manifests::Component;
use deployer_manifests::ManifestLoader;
use deployer_manifests::TypedObject;
use k8s_openapi::api::apps::v1::DaemonSet;
use k8s_openapi::api::core::v1::{Namespace, ServiceAccount};
use k8s_openapi::api::rbac::v1::{ClusterRole, ClusterRoleBinding};

#[derive(Debug, Clone, PartialEq)]
pub struct Manifests {
    pub namespace: Namespace,
    pub service_account: ServiceAccount,
    pub cluster_role: ClusterRole,
    pub cluster_role_binding: ClusterRoleBinding,
    pub daemon_set: DaemonSet,
}

impl Manifests {

    pub fn load(loader: &ManifestLoader) -> Result<Self> {
	let component = Component::ResourceTopologyExporter.as_str();

	Ok(Self{
	    namespace: loader.namespace(component)?,
	    service_account: loader.service_account(component)?,
	    cluster_role: loader.cluster_role(component)?,
	    cluster_role_binding: loader.resource_topology_exporter_cluster_role_binding()?,
	    daemon_set: loader.resource_topology_exporter_daemon_set()?,
	})
    }

    /*
     * Pins the exporter image and expands its command line. Arguments
     * which fail to expand are dropped.
     */
    pub fn update(&self, opts: &DeployOptions) -> Self {
	let mut ret = self.clone();
	ret.daemon_set = updates::update_resource_topology_exporter_daemon_set(&self.daemon_set, &opts.exporter);
	ret
    }

    pub fn to_objects(&self) -> Vec<TypedObject> {
	vec![
	    TypedObject::from(self.namespace.clone()),
	    TypedObject::from(self.service_account.clone()),
	    TypedObject::from(self.cluster_role.clone()),
	    TypedObject::from(self.cluster_role_binding.clone()),
	    TypedObject::from(self.daemon_set.clone()),
	]
    }
}

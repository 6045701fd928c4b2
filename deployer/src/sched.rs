use crate::deployer::DeployOptions;
use crate::errors::Result;
use deployer_manifests::updates;
use deployer_manifests::Component;
use deployer_manifests::ManifestLoader;
use deployer_manifests::TypedObject;
use k8s_openapi::api::apps::v1::Deployment;
use k8s_openapi::api::core::v1::{ConfigMap, Namespace, ServiceAccount};
use k8s_openapi::api::rbac::v1::{ClusterRole, ClusterRoleBinding, RoleBinding};

#[derive(Debug, Clone, PartialEq)]
pub struct Manifests {
    pub namespace: Namespace,
    pub service_account: ServiceAccount,
    pub cluster_role: ClusterRole,
    pub crb_kube_scheduler: ClusterRoleBinding,
    pub crb_node_resource_topology: ClusterRoleBinding,
    pub crb_volume_scheduler: ClusterRoleBinding,
    pub rb_kube_scheduler: RoleBinding,
    pub config_map: ConfigMap,
    pub deployment: Deployment,
}

impl Manifests {

    pub fn load(loader: &ManifestLoader) -> Result<Self> {
	let component = Component::SchedulerPlugin.as_str();

	Ok(Self{
	    namespace: loader.namespace(component)?,
	    service_account: loader.service_account(component)?,
	    cluster_role: loader.cluster_role(component)?,
	    crb_kube_scheduler: loader.scheduler_plugin_cluster_role_binding_kube_scheduler()?,
	    crb_node_resource_topology: loader.scheduler_plugin_cluster_role_binding_node_resource_topology()?,
	    crb_volume_scheduler: loader.scheduler_plugin_cluster_role_binding_volume_scheduler()?,
	    rb_kube_scheduler: loader.scheduler_plugin_role_binding_kube_scheduler()?,
	    config_map: loader.scheduler_plugin_config_map()?,
	    deployment: loader.scheduler_plugin_deployment()?,
	})
    }

    /*
     * Returns a copy with the scheduler image pinned. The loaded manifests
     * are left untouched.
     */
    pub fn update(&self, opts: &DeployOptions) -> Self {
	let mut ret = self.clone();
	ret.deployment = updates::update_scheduler_plugin_deployment(&self.deployment, &opts.scheduler);
	ret
    }

    pub fn to_objects(&self) -> Vec<TypedObject> {
	vec![
	    TypedObject::from(self.namespace.clone()),
	    TypedObject::from(self.service_account.clone()),
	    TypedObject::from(self.cluster_role.clone()),
	    TypedObject::from(self.crb_kube_scheduler.clone()),
	    TypedObject::from(self.crb_node_resource_topology.clone()),
	    TypedObject::from(self.crb_volume_scheduler.clone()),
	    TypedObject::from(self.rb_kube_scheduler.clone()),
	    TypedObject::from(self.config_map.clone()),
	    TypedObject::from(self.deployment.clone()),
	]
    }
}

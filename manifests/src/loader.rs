use crate::catalog;
use crate::component::{self, Component, ManifestRef, Role};
use crate::decoder::Decoder;
use crate::errors::Result;
use crate::object::FromTypedObject;
use crate::scheme::Scheme;

use k8s_openapi::api::apps::v1::{DaemonSet, Deployment};
use k8s_openapi::api::core::v1::{ConfigMap, Namespace, ServiceAccount};
use k8s_openapi::api::rbac::v1::{ClusterRole, ClusterRoleBinding, RoleBinding};
use k8s_openapi::apiextensions_apiserver::pkg::apis::apiextensions::v1::CustomResourceDefinition;

/*
 * ManifestLoader hands out typed objects from the embedded catalog, one
 * accessor per logical resource. Each call reads and decodes the manifest
 * afresh, so callers own what they get back and may patch it freely.
 */
#[derive(Debug, Copy, Clone)]
pub struct ManifestLoader<'s> {
    decoder: Decoder<'s>,
}

impl<'s> ManifestLoader<'s> {

    pub fn new(scheme: &'s Scheme) -> Self {
	Self{
	    decoder: Decoder::new(scheme),
	}
    }

    pub fn load<T: FromTypedObject>(&self, mref: &ManifestRef) -> Result<T> {
	let raw = catalog::load(&mref.path())?;
	self.decoder.decode_as(&raw)
    }

    fn load_role<T: FromTypedObject>(&self, component: &str, role: Role) -> Result<T> {
	let component = component::validate(component)?;
	self.load(&ManifestRef::new(component, role))
    }

    pub fn namespace(&self, component: &str) -> Result<Namespace> {
	self.load_role(component, Role::Namespace)
    }

    pub fn service_account(&self, component: &str) -> Result<ServiceAccount> {
	self.load_role(component, Role::ServiceAccount)
    }

    pub fn cluster_role(&self, component: &str) -> Result<ClusterRole> {
	self.load_role(component, Role::ClusterRole)
    }

    pub fn api_crd(&self) -> Result<CustomResourceDefinition> {
	self.load(&ManifestRef::new(Component::API, Role::CRD))
    }

    pub fn scheduler_plugin_config_map(&self) -> Result<ConfigMap> {
	self.load(&ManifestRef::new(Component::SchedulerPlugin, Role::ConfigMap))
    }

    pub fn scheduler_plugin_deployment(&self) -> Result<Deployment> {
	self.load(&ManifestRef::new(Component::SchedulerPlugin, Role::Deployment))
    }

    fn cluster_role_binding(&self, component: Component, detail: Option<&'static str>) -> Result<ClusterRoleBinding> {
	let mref = match detail {
	    Some(detail) => ManifestRef::with_detail(component, Role::ClusterRoleBinding, detail),
	    None => ManifestRef::new(component, Role::ClusterRoleBinding),
	};
	self.load(&mref)
    }

    pub fn scheduler_plugin_cluster_role_binding_kube_scheduler(&self) -> Result<ClusterRoleBinding> {
	self.cluster_role_binding(Component::SchedulerPlugin, Some("kube-sched"))
    }

    pub fn scheduler_plugin_cluster_role_binding_node_resource_topology(&self) -> Result<ClusterRoleBinding> {
	self.cluster_role_binding(Component::SchedulerPlugin, Some("node-res-topo"))
    }

    pub fn scheduler_plugin_cluster_role_binding_volume_scheduler(&self) -> Result<ClusterRoleBinding> {
	self.cluster_role_binding(Component::SchedulerPlugin, Some("vol-sched"))
    }

    pub fn scheduler_plugin_role_binding_kube_scheduler(&self) -> Result<RoleBinding> {
	self.load(&ManifestRef::with_detail(Component::SchedulerPlugin, Role::RoleBinding, "kube-sched"))
    }

    pub fn resource_topology_exporter_cluster_role_binding(&self) -> Result<ClusterRoleBinding> {
	self.cluster_role_binding(Component::ResourceTopologyExporter, None)
    }

    pub fn resource_topology_exporter_daemon_set(&self) -> Result<DaemonSet> {
	self.load(&ManifestRef::new(Component::ResourceTopologyExporter, Role::DaemonSet))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::Error;
    use crate::scheme::{self, Kind};

    fn loader() -> ManifestLoader<'static> {
	ManifestLoader::new(scheme::init())
    }

    #[test]
    fn generic_accessors_validate_component() {
	assert!(matches!(loader().namespace("kube"), Err(Error::InvalidComponent(_))));
	assert!(matches!(loader().service_account(""), Err(Error::InvalidComponent(_))));
	assert!(matches!(loader().cluster_role("schedulerplugin"), Err(Error::InvalidComponent(_))));
    }

    #[test]
    fn api_has_no_namespace() {
	match loader().namespace("api") {
	    Err(Error::NotFound(path)) => assert_eq!(path, "api/namespace.yaml"),
	    other => panic!("expected NotFound, got {:?}", other),
	}
    }

    #[test]
    fn namespaces() {
	let sched = loader().namespace("sched").unwrap();
	assert_eq!(sched.metadata.name.as_deref(), Some("tas-scheduler"));

	let rte = loader().namespace("rte").unwrap();
	assert_eq!(rte.metadata.name.as_deref(), Some("tas-topology-exporter"));
    }

    #[test]
    fn service_accounts_live_in_component_namespace() {
	let sa = loader().service_account("sched").unwrap();
	assert_eq!(sa.metadata.namespace.as_deref(), Some("tas-scheduler"));

	let sa = loader().service_account("rte").unwrap();
	assert_eq!(sa.metadata.namespace.as_deref(), Some("tas-topology-exporter"));
    }

    #[test]
    fn namespace_document_is_not_a_service_account() {
	let loader = loader();
	let mref = ManifestRef::new(Component::ResourceTopologyExporter, Role::Namespace);

	match loader.load::<ServiceAccount>(&mref) {
	    Err(Error::KindMismatch{ expected, found }) => {
		assert_eq!(expected, Kind::ServiceAccount);
		assert_eq!(found, Kind::Namespace);
	    },
	    other => panic!("expected KindMismatch, got {:?}", other),
	}
    }

    #[test]
    fn fixed_accessors() {
	let loader = loader();

	let crd = loader.api_crd().unwrap();
	assert_eq!(crd.spec.group, "topology.node.k8s.io");
	assert_eq!(crd.spec.names.kind, "NodeResourceTopology");

	let cm = loader.scheduler_plugin_config_map().unwrap();
	assert!(cm.data.unwrap().contains_key("scheduler-config.yaml"));

	let dp = loader.scheduler_plugin_deployment().unwrap();
	assert_eq!(dp.metadata.name.as_deref(), Some("topo-aware-scheduler"));

	let rb = loader.scheduler_plugin_role_binding_kube_scheduler().unwrap();
	assert_eq!(rb.metadata.namespace.as_deref(), Some("kube-system"));

	let ds = loader.resource_topology_exporter_daemon_set().unwrap();
	assert_eq!(ds.metadata.name.as_deref(), Some("resource-topology-exporter-ds"));
    }

    #[test]
    fn scheduler_binds_three_cluster_roles() {
	let loader = loader();
	let roles: Vec<String> = [
	    loader.scheduler_plugin_cluster_role_binding_kube_scheduler().unwrap(),
	    loader.scheduler_plugin_cluster_role_binding_node_resource_topology().unwrap(),
	    loader.scheduler_plugin_cluster_role_binding_volume_scheduler().unwrap(),
	].into_iter().map(|crb| crb.role_ref.name).collect();

	assert_eq!(roles, vec!["system:kube-scheduler", "noderesourcetoplogy-handler", "system:volume-scheduler"]);
    }

    #[test]
    fn exporter_binding_refers_to_exporter_role() {
	let loader = loader();
	let crb = loader.resource_topology_exporter_cluster_role_binding().unwrap();
	let cr = loader.cluster_role("rte").unwrap();

	assert_eq!(Some(crb.role_ref.name), cr.metadata.name);
    }
}

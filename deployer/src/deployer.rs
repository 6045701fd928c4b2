use crate::api;
use crate::errors::{Error, Result};
use crate::rte;
use crate::sched;
use crate::transport::{ClusterError, ClusterTransport};

use deployer_manifests::images;
use deployer_manifests::updates::DEFAULT_RTE_POLL_INTERVAL;
use deployer_manifests::{serialize_object, Component, Kind, ManifestLoader, PatchContext, Scheme, TypedObject};
use log;
use std::fmt;
use std::io::Write;

/*
 * Per-workload patch inputs: which image each workload runs and the
 * variables its command line may refer to.
 */
#[derive(Debug, Clone, PartialEq)]
pub struct DeployOptions {
    pub scheduler: PatchContext,
    pub exporter: PatchContext,
}

impl Default for DeployOptions {
    fn default() -> Self {
	Self{
	    scheduler: PatchContext::scheduler_plugin(images::SCHEDULER_PLUGIN_IMAGE),
	    exporter: PatchContext::resource_topology_exporter(images::RESOURCE_TOPOLOGY_EXPORTER_IMAGE, DEFAULT_RTE_POLL_INTERVAL),
	}
    }
}

/*
 * Resource groups in creation order: everything in a group may depend on
 * the groups before it.
 */
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub enum ResourceGroup {
    Namespace,
    ServiceAccount,
    Roles,
    Bindings,
    Configuration,
    Workloads,
    Definitions,
}

impl ResourceGroup {
    pub fn of(kind: Kind) -> Self {
	match kind {
	    Kind::Namespace => ResourceGroup::Namespace,
	    Kind::ServiceAccount => ResourceGroup::ServiceAccount,
	    Kind::ClusterRole => ResourceGroup::Roles,
	    Kind::ClusterRoleBinding | Kind::RoleBinding => ResourceGroup::Bindings,
	    Kind::ConfigMap => ResourceGroup::Configuration,
	    Kind::Deployment | Kind::DaemonSet => ResourceGroup::Workloads,
	    Kind::CustomResourceDefinition => ResourceGroup::Definitions,
	}
    }
}

impl fmt::Display for ResourceGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
	let name = match self {
	    ResourceGroup::Namespace => "namespace",
	    ResourceGroup::ServiceAccount => "service account",
	    ResourceGroup::Roles => "RBAC roles",
	    ResourceGroup::Bindings => "RBAC bindings",
	    ResourceGroup::Configuration => "configuration",
	    ResourceGroup::Workloads => "workloads",
	    ResourceGroup::Definitions => "custom resource definitions",
	};
	f.write_str(name)
    }
}

fn same_group(a: &TypedObject, b: &TypedObject) -> bool {
    ResourceGroup::of(a.kind()) == ResourceGroup::of(b.kind())
}

/*
 * The objects which make up one component, kept in creation order.
 */
#[derive(Debug, Clone, PartialEq)]
pub struct ManifestSet {
    component: Component,
    objects: Vec<TypedObject>,
}

impl ManifestSet {

    pub fn new(component: Component, mut objects: Vec<TypedObject>) -> Self {
	// stable: objects of the same group keep the order they were given
	objects.sort_by_key(|obj| ResourceGroup::of(obj.kind()));

	Self{
	    component: component,
	    objects: objects,
	}
    }

    pub fn component(&self) -> Component {
	self.component
    }

    pub fn creation_order(&self) -> &[TypedObject] {
	&self.objects
    }

    pub fn removal_order(&self) -> Vec<TypedObject> {
	self.objects.iter().rev().cloned().collect()
    }

    pub fn len(&self) -> usize {
	self.objects.len()
    }

    pub fn is_empty(&self) -> bool {
	self.objects.is_empty()
    }
}

/*
 * Loads the component manifests and applies the deployment-time patches.
 */
pub fn manifest_set(loader: &ManifestLoader, component: Component, opts: &DeployOptions) -> Result<ManifestSet> {
    let objects = match component {
	Component::API => api::Manifests::load(loader)?.update(opts).to_objects(),
	Component::SchedulerPlugin => sched::Manifests::load(loader)?.update(opts).to_objects(),
	Component::ResourceTopologyExporter => rte::Manifests::load(loader)?.update(opts).to_objects(),
    };

    Ok(ManifestSet::new(component, objects))
}

/*
 * Writes the set as a multi-document YAML stream.
 */
pub fn render<W: Write>(set: &ManifestSet, out: &mut W) -> Result<()> {
    for obj in set.creation_order() {
	out.write_all(b"---\n").map_err(deployer_manifests::Error::from)?;
	serialize_object(obj, out)?;
    }
    Ok(())
}

/*
 * Deployer installs and removes components one object at a time, strictly
 * in sequence. It is best effort: the first hard failure stops the run and
 * whatever was already applied stays applied.
 */
pub struct Deployer<'s, T> {
    transport: T,
    loader: ManifestLoader<'s>,
    options: DeployOptions,
}

impl<'s, T: ClusterTransport> Deployer<'s, T> {

    pub fn new(transport: T, scheme: &'s Scheme, options: DeployOptions) -> Self {
	Self{
	    transport: transport,
	    loader: ManifestLoader::new(scheme),
	    options: options,
	}
    }

    pub fn transport(&self) -> &T {
	&self.transport
    }

    pub fn manifest_set(&self, component: Component) -> Result<ManifestSet> {
	manifest_set(&self.loader, component, &self.options)
    }

    pub async fn deploy(&self, component: Component) -> Result<()> {
	let name = component.display_name();
	log::info!("deploying {} ...", name);

	let set = self.manifest_set(component)?;
	log::info!("  {} manifests loaded", name);

	for group in set.creation_order().chunk_by(same_group) {
	    for obj in group {
		self.create(obj).await?;
	    }
	    log::info!("  {} {} created", name, ResourceGroup::of(group[0].kind()));
	}

	log::info!("{} deployed", name);
	Ok(())
    }

    pub async fn remove(&self, component: Component) -> Result<()> {
	let name = component.display_name();
	log::info!("removing {} ...", name);

	let set = self.manifest_set(component)?;
	log::info!("  {} manifests loaded", name);

	let objects = set.removal_order();
	for group in objects.chunk_by(same_group) {
	    for obj in group {
		self.delete(obj).await?;
	    }
	    log::info!("  {} {} removed", name, ResourceGroup::of(group[0].kind()));
	}

	log::info!("{} removed", name);
	Ok(())
    }

    async fn create(&self, obj: &TypedObject) -> Result<()> {
	let identity = obj.identity();

	match self.transport.create_object(obj).await {
	    Ok(()) => log::debug!("created {}", identity),
	    Err(ClusterError::AlreadyExists) => log::debug!("{} already exists", identity),
	    Err(err) => return Err(Error::Create{ identity: identity, source: err }),
	}
	Ok(())
    }

    async fn delete(&self, obj: &TypedObject) -> Result<()> {
	let identity = obj.identity();

	match self.transport.delete_object(obj).await {
	    Ok(()) => log::debug!("deleted {}", identity),
	    Err(ClusterError::NotFound) => log::debug!("{} already gone", identity),
	    Err(err) => return Err(Error::Delete{ identity: identity, source: err }),
	}
	Ok(())
    }
}

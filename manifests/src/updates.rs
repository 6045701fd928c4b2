use crate::template::{self, Vars};

use k8s_openapi::api::apps::v1::{DaemonSet, Deployment};
use k8s_openapi::api::core::v1::{Container, PodTemplateSpec};

pub const RTE_POLL_INTERVAL: &str = "RTE_POLL_INTERVAL";
pub const DEFAULT_RTE_POLL_INTERVAL: &str = "10s";

/*
 * The inputs used to turn a decoded workload into a deployable one: the
 * image to pin on the primary container and the variables available to
 * its command line.
 */
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PatchContext {
    pub image: String,
    pub vars: Vars,
}

impl PatchContext {

    pub fn new(image: &str) -> Self {
	Self{
	    image: image.to_string(),
	    vars: Vars::new(),
	}
    }

    pub fn with_var(mut self, name: &str, value: &str) -> Self {
	self.vars.insert(name.to_string(), value.to_string());
	self
    }

    pub fn scheduler_plugin(image: &str) -> Self {
	Self::new(image)
    }

    pub fn resource_topology_exporter(image: &str, poll_interval: &str) -> Self {
	Self::new(image).with_var(RTE_POLL_INTERVAL, poll_interval)
    }
}

/*
 * By convention the workload proper is container #0, any other container
 * is a helper.
 */
fn primary_container(template: &mut PodTemplateSpec) -> Option<&mut Container> {
    template.spec.as_mut()?.containers.first_mut()
}

pub fn update_scheduler_plugin_deployment(dp: &Deployment, ctx: &PatchContext) -> Deployment {
    let mut ret = dp.clone();

    match ret.spec.as_mut().and_then(|spec| primary_container(&mut spec.template)) {
	Some(container) => container.image = Some(ctx.image.clone()),
	None => log::debug!("deployment {:?} has no container to update", dp.metadata.name),
    }
    ret
}

pub fn update_resource_topology_exporter_daemon_set(ds: &DaemonSet, ctx: &PatchContext) -> DaemonSet {
    let mut ret = ds.clone();

    // TODO: match the exporter container by name instead of assuming #0
    match ret.spec.as_mut().and_then(|spec| primary_container(&mut spec.template)) {
	Some(container) => {
	    container.image = Some(ctx.image.clone());
	    if let Some(command) = container.command.take() {
		container.command = Some(update_resource_topology_exporter_command(&command, &ctx.vars));
	    }
	},
	None => log::debug!("daemonset {:?} has no container to update", ds.metadata.name),
    }
    ret
}

pub fn update_resource_topology_exporter_command(args: &[String], vars: &Vars) -> Vec<String> {
    template::substitute_lenient(args, vars)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::loader::ManifestLoader;
    use crate::scheme;

    fn primary(template: &PodTemplateSpec) -> &Container {
	&template.spec.as_ref().unwrap().containers[0]
    }

    #[test]
    fn deployment_image_is_replaced_on_a_copy() {
	let loader = ManifestLoader::new(scheme::init());
	let dp = loader.scheduler_plugin_deployment().unwrap();
	let ctx = PatchContext::scheduler_plugin("quay.io/example/sched:v9");

	let updated = update_scheduler_plugin_deployment(&dp, &ctx);

	assert_eq!(primary(&updated.spec.as_ref().unwrap().template).image.as_deref(), Some("quay.io/example/sched:v9"));
	assert_ne!(primary(&dp.spec.as_ref().unwrap().template).image.as_deref(), Some("quay.io/example/sched:v9"));
	assert_eq!(dp, loader.scheduler_plugin_deployment().unwrap());
    }

    #[test]
    fn image_substitution_is_idempotent() {
	let loader = ManifestLoader::new(scheme::init());
	let dp = loader.scheduler_plugin_deployment().unwrap();
	let ctx = PatchContext::scheduler_plugin("quay.io/example/sched:v9");

	let once = update_scheduler_plugin_deployment(&dp, &ctx);
	let twice = update_scheduler_plugin_deployment(&once, &ctx);
	assert_eq!(once, twice);

	let ds = loader.resource_topology_exporter_daemon_set().unwrap();
	let ctx = PatchContext::resource_topology_exporter("quay.io/example/rte:v9", "10s");
	let once = update_resource_topology_exporter_daemon_set(&ds, &ctx);
	let twice = update_resource_topology_exporter_daemon_set(&once, &ctx);
	assert_eq!(once, twice);
    }

    #[test]
    fn daemonset_command_is_templated() {
	let loader = ManifestLoader::new(scheme::init());
	let ds = loader.resource_topology_exporter_daemon_set().unwrap();
	let ctx = PatchContext::resource_topology_exporter("quay.io/example/rte:v9", "25s");

	let updated = update_resource_topology_exporter_daemon_set(&ds, &ctx);
	let container = primary(&updated.spec.as_ref().unwrap().template);

	assert_eq!(container.image.as_deref(), Some("quay.io/example/rte:v9"));
	let command = container.command.clone().unwrap();
	assert_eq!(command[0], "/bin/resource-topology-exporter");
	assert!(command.contains(&String::from("--sleep-interval=25s")));
	assert!(!command.iter().any(|arg| arg.contains('$')));

	let original = primary(&ds.spec.as_ref().unwrap().template).command.clone().unwrap();
	assert!(original.contains(&String::from("--sleep-interval=${RTE_POLL_INTERVAL}")));
	assert_eq!(original.len(), command.len());
    }

    #[test]
    fn command_drops_malformed_arguments() {
	let args = vec![String::from("--poll-interval=${RTE_POLL_INTERVAL}"), String::from("--bad=${UNCLOSED")];
	let vars = PatchContext::resource_topology_exporter("img", "10s").vars;

	assert_eq!(update_resource_topology_exporter_command(&args, &vars), vec![String::from("--poll-interval=10s")]);
    }

    #[test]
    fn workload_without_containers_is_left_alone() {
	let dp = Deployment::default();
	let updated = update_scheduler_plugin_deployment(&dp, &PatchContext::new("img"));
	assert_eq!(updated, dp);

	let ds = DaemonSet::default();
	let updated = update_resource_topology_exporter_daemon_set(&ds, &PatchContext::new("img"));
	assert_eq!(updated, ds);
    }
}

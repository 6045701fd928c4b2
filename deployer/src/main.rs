use deployer::{DeployOptions, Deployer, Error, KubeTransport};
use deployer_manifests::component;
use deployer_manifests::images;
use deployer_manifests::updates::DEFAULT_RTE_POLL_INTERVAL;
use deployer_manifests::{scheme, Component, ManifestLoader, PatchContext, Scheme};

use clap::{Args, Parser, Subcommand};
use kube::Client as KubeClient;
use log;

/// Deploys the topology aware scheduling stack on a kubernetes cluster
#[derive(Parser, Debug)]
#[command(name = "deployer", version)]
struct Cli {
    /// Image of the scheduler plugin
    #[arg(long, global = true, env = "DEPLOYER_SCHED_IMAGE", default_value = images::SCHEDULER_PLUGIN_IMAGE)]
    sched_image: String,

    /// Image of the resource topology exporter
    #[arg(long, global = true, env = "DEPLOYER_RTE_IMAGE", default_value = images::RESOURCE_TOPOLOGY_EXPORTER_IMAGE)]
    rte_image: String,

    /// How often the resource topology exporter refreshes its data
    #[arg(long, global = true, env = "DEPLOYER_RTE_POLL_INTERVAL", default_value = DEFAULT_RTE_POLL_INTERVAL)]
    rte_poll_interval: String,

    #[command(subcommand)]
    command: Command,
}

impl Cli {
    fn deploy_options(&self) -> DeployOptions {
	DeployOptions{
	    scheduler: PatchContext::scheduler_plugin(&self.sched_image),
	    exporter: PatchContext::resource_topology_exporter(&self.rte_image, &self.rte_poll_interval),
	}
    }
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Create the components on the cluster
    Deploy(Targets),

    /// Delete the components from the cluster
    Remove(Targets),

    /// Print the manifests which would be deployed
    Render(Targets),
}

#[derive(Args, Debug)]
struct Targets {
    /// Components to act on: api, sched, rte. All of them when omitted.
    #[arg(value_parser = component::validate)]
    components: Vec<Component>,
}

impl Targets {

    /*
     * The API goes first: the CRD must be there before the exporter
     * starts publishing objects of its kind.
     */
    fn deploy_order(&self) -> Vec<Component> {
	let mut components = if self.components.is_empty() {
	    Component::ALL.to_vec()
	} else {
	    self.components.clone()
	};
	components.sort();
	components.dedup();
	components
    }

    fn removal_order(&self) -> Vec<Component> {
	let mut components = self.deploy_order();
	components.reverse();
	components
    }
}

async fn connect(scheme: &Scheme, options: DeployOptions) -> Result<Deployer<'_, KubeTransport>, Error> {
    let kube_client = KubeClient::try_default().await?;
    Ok(Deployer::new(KubeTransport::new(kube_client), scheme, options))
}

fn render(scheme: &Scheme, options: &DeployOptions, targets: &Targets) -> Result<(), Error> {
    let loader = ManifestLoader::new(scheme);
    let stdout = std::io::stdout();
    let mut out = stdout.lock();

    for component in targets.deploy_order() {
	let set = deployer::manifest_set(&loader, component, options)?;
	deployer::render(&set, &mut out)?;
    }
    Ok(())
}

#[tokio::main]
async fn main() -> Result<(), Error> {
    env_logger::init();

    let cli = Cli::parse();
    let scheme = scheme::init();
    let options = cli.deploy_options();

    match &cli.command {
	Command::Render(targets) => render(scheme, &options, targets)?,
	Command::Deploy(targets) => {
	    let me = connect(scheme, options).await?;
	    for component in targets.deploy_order() {
		me.deploy(component).await?;
	    }
	    log::info!("deployment complete");
	},
	Command::Remove(targets) => {
	    let me = connect(scheme, options).await?;
	    for component in targets.removal_order() {
		me.remove(component).await?;
	    }
	    log::info!("removal complete");
	},
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn targets(components: &[Component]) -> Targets {
	Targets{
	    components: components.to_vec(),
	}
    }

    #[test]
    fn api_is_deployed_first_and_removed_last() {
	let all = targets(&[]);
	assert_eq!(all.deploy_order(), vec![Component::API, Component::SchedulerPlugin, Component::ResourceTopologyExporter]);
	assert_eq!(all.removal_order(), vec![Component::ResourceTopologyExporter, Component::SchedulerPlugin, Component::API]);
    }

    #[test]
    fn explicit_targets_are_ordered_and_deduplicated() {
	let some = targets(&[Component::ResourceTopologyExporter, Component::API, Component::ResourceTopologyExporter]);
	assert_eq!(some.deploy_order(), vec![Component::API, Component::ResourceTopologyExporter]);
    }

    #[test]
    fn cli_parses_components_and_images() {
	let cli = Cli::try_parse_from(["deployer", "deploy", "rte", "--rte-image", "quay.io/example/rte:v9"]).unwrap();
	let options = cli.deploy_options();

	assert_eq!(options.exporter.image, "quay.io/example/rte:v9");
	match cli.command {
	    Command::Deploy(targets) => assert_eq!(targets.components, vec![Component::ResourceTopologyExporter]),
	    other => panic!("unexpected command {:?}", other),
	}
    }

    #[test]
    fn cli_rejects_unknown_components() {
	assert!(Cli::try_parse_from(["deployer", "remove", "kubelet"]).is_err());
    }
}

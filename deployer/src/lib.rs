/*
 * deployer - installs and removes the topology aware scheduling stack:
 * the NodeResourceTopology API (api), the scheduler plugin (sched) and the
 * resource topology exporter (rte).
 */

pub mod errors;
pub use errors::Error;
pub use errors::Result;

pub mod transport;
pub use transport::ClusterError;
pub use transport::ClusterTransport;
pub use transport::KubeTransport;

pub mod api;
pub mod rte;
pub mod sched;

pub mod deployer;
pub use deployer::DeployOptions;
pub use deployer::Deployer;
pub use deployer::ManifestSet;
pub use deployer::ResourceGroup;
pub use deployer::manifest_set;
pub use deployer::render;

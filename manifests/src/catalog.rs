/*
 * The manifest catalog: every resource definition we know how to deploy,
 * embedded in the binary at build time. Lookups are pure reads over
 * static data, so the catalog is safe to share between threads.
 */

use crate::errors::{Error, Result};

macro_rules! embed {
    ($path:literal) => {
	($path, include_bytes!(concat!(env!("CARGO_MANIFEST_DIR"), "/yaml/", $path)) as &'static [u8])
    };
}

static BUNDLE: &[(&str, &[u8])] = &[
    embed!("api/crd.yaml"),

    embed!("sched/namespace.yaml"),
    embed!("sched/serviceaccount.yaml"),
    embed!("sched/clusterrole.yaml"),
    embed!("sched/clusterrolebinding-kube-sched.yaml"),
    embed!("sched/clusterrolebinding-node-res-topo.yaml"),
    embed!("sched/clusterrolebinding-vol-sched.yaml"),
    embed!("sched/rolebinding-kube-sched.yaml"),
    embed!("sched/configmap.yaml"),
    embed!("sched/deployment.yaml"),

    embed!("rte/namespace.yaml"),
    embed!("rte/serviceaccount.yaml"),
    embed!("rte/clusterrole.yaml"),
    embed!("rte/clusterrolebinding.yaml"),
    embed!("rte/daemonset.yaml"),
];

/*
 * The raw bytes of one manifest together with the path it was loaded from.
 */
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct RawManifest {
    path: &'static str,
    data: &'static [u8],
}

impl RawManifest {
    pub fn path(&self) -> &'static str {
	self.path
    }

    pub fn data(&self) -> &'static [u8] {
	self.data
    }
}

pub fn load(path: &str) -> Result<RawManifest> {
    BUNDLE.iter()
	.find(|(p, _)| *p == path)
	.map(|(p, data)| RawManifest{ path: *p, data: *data })
	.ok_or_else(|| Error::NotFound(path.to_string()))
}

pub fn paths() -> impl Iterator<Item = &'static str> {
    BUNDLE.iter().map(|(p, _)| *p)
}

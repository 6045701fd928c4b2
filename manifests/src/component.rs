use crate::errors::{Error, Result};
use std::fmt;
use std::str::FromStr;

/*
 * The closed set of installable units. Nothing outside of this enum
 * can ever be deployed or removed.
 */
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Component {
    API,
    SchedulerPlugin,
    ResourceTopologyExporter,
}

impl Component {

    pub const ALL: [Component; 3] = [
	Component::API,
	Component::SchedulerPlugin,
	Component::ResourceTopologyExporter,
    ];

    /* the wire name, also the directory name inside the catalog */
    pub fn as_str(&self) -> &'static str {
	match self {
	    Component::API => "api",
	    Component::SchedulerPlugin => "sched",
	    Component::ResourceTopologyExporter => "rte",
	}
    }

    /* human readable name, used when narrating progress */
    pub fn display_name(&self) -> &'static str {
	match self {
	    Component::API => "API",
	    Component::SchedulerPlugin => "SCD",
	    Component::ResourceTopologyExporter => "RTE",
	}
    }
}

impl fmt::Display for Component {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
	f.write_str(self.as_str())
    }
}

impl FromStr for Component {
    type Err = Error;

    fn from_str(name: &str) -> Result<Self> {
	match name {
	    "api" => Ok(Component::API),
	    "sched" => Ok(Component::SchedulerPlugin),
	    "rte" => Ok(Component::ResourceTopologyExporter),
	    other => Err(Error::InvalidComponent(other.to_string())),
	}
    }
}

pub fn validate(name: &str) -> Result<Component> {
    name.parse()
}

/*
 * The role a manifest plays inside a component directory. The role
 * names the file, a detail (if any) disambiguates several files of the
 * same role, e.g. the three scheduler cluster role bindings.
 */
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Role {
    Namespace,
    ServiceAccount,
    ClusterRole,
    ClusterRoleBinding,
    RoleBinding,
    ConfigMap,
    Deployment,
    DaemonSet,
    CRD,
}

impl Role {
    pub fn file_stem(&self) -> &'static str {
	match self {
	    Role::Namespace => "namespace",
	    Role::ServiceAccount => "serviceaccount",
	    Role::ClusterRole => "clusterrole",
	    Role::ClusterRoleBinding => "clusterrolebinding",
	    Role::RoleBinding => "rolebinding",
	    Role::ConfigMap => "configmap",
	    Role::Deployment => "deployment",
	    Role::DaemonSet => "daemonset",
	    Role::CRD => "crd",
	}
    }
}

/*
 * A (component, role, detail) triple. It always resolves to the same
 * catalog path.
 */
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ManifestRef {
    pub component: Component,
    pub role: Role,
    pub detail: Option<&'static str>,
}

impl ManifestRef {

    pub fn new(component: Component, role: Role) -> Self {
	Self{
	    component: component,
	    role: role,
	    detail: None,
	}
    }

    pub fn with_detail(component: Component, role: Role, detail: &'static str) -> Self {
	Self{
	    component: component,
	    role: role,
	    detail: Some(detail),
	}
    }

    pub fn path(&self) -> String {
	resolve_path(self.component, self.role, self.detail)
    }
}

pub fn resolve_path(component: Component, role: Role, detail: Option<&str>) -> String {
    match detail {
	Some(detail) if !detail.is_empty() => format!("{}/{}-{}.yaml", component.as_str(), role.file_stem(), detail),
	_ => format!("{}/{}.yaml", component.as_str(), role.file_stem()),
    }
}

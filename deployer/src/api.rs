use crate::deployer::DeployOptions;
use crate::errors::Result;
use deployer_manifests::ManifestLoader;
use deployer_manifests::TypedObject;
use k8s_openapi::apiextensions_apiserver::pkg::apis::apiextensions::v1::CustomResourceDefinition;

/*
 * The NodeResourceTopology API is just its CRD.
 */
#[derive(Debug, Clone, PartialEq)]
pub struct Manifests {
    pub crd: CustomResourceDefinition,
}

impl Manifests {

    pub fn load(loader: &ManifestLoader) -> Result<Self> {
	Ok(Self{
	    crd: loader.api_crd()?,
	})
    }

    /* nothing to pin: the CRD is deployed as shipped */
    pub fn update(&self, _opts: &DeployOptions) -> Self {
	self.clone()
    }

    pub fn to_objects(&self) -> Vec<TypedObject> {
	vec![
	    TypedObject::from(self.crd.clone()),
	]
    }
}

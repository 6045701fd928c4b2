use async_trait::async_trait;
use deployer_manifests::TypedObject;
use k8s_openapi::NamespaceResourceScope;
use kube::Api as KubeApi;
use kube::Client as KubeClient;
use kube::Error as KubeError;
use kube::Resource as KubeResource;
use kube::api::DeleteParams as KubeDeleteParams;
use kube::api::PostParams as KubePostParams;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fmt::Debug;
use thiserror::Error;

/* namespaced objects without an explicit namespace land here */
const DEFAULT_NAMESPACE: &str = "default";

#[derive(Error, Debug)]
pub enum ClusterError {

    #[error("object already exists")]
    AlreadyExists,

    #[error("object not found")]
    NotFound,

    #[error("kube error: {0}")]
    Kube(#[from] KubeError),

    #[error("`{0}`")]
    Other(String),
}

/*
 * The two operations the deployer needs from the cluster. Implementations
 * report "already there" and "already gone" as AlreadyExists and NotFound;
 * whether those count as failures is up to the caller.
 */
#[async_trait]
pub trait ClusterTransport: Send + Sync {
    async fn create_object(&self, obj: &TypedObject) -> Result<(), ClusterError>;

    async fn delete_object(&self, obj: &TypedObject) -> Result<(), ClusterError>;
}

fn classify(err: KubeError) -> ClusterError {
    match err {
	KubeError::Api(resp) if resp.code == 409 && resp.reason == "AlreadyExists" => ClusterError::AlreadyExists,
	KubeError::Api(resp) if resp.code == 404 => ClusterError::NotFound,
	err => ClusterError::Kube(err),
    }
}

/*
 * KubeTransport talks to the API server through kube-rs. Request
 * deadlines are whatever the client was configured with.
 */
#[derive(Clone)]
pub struct KubeTransport {
    kube_client: KubeClient,
}

impl KubeTransport {

    pub fn new(kube_client: KubeClient) -> Self {
	Self{
	    kube_client: kube_client,
	}
    }

    fn cluster_api<K>(&self) -> KubeApi<K>
    where
	K: KubeResource<DynamicType = ()>,
    {
	KubeApi::all(self.kube_client.clone())
    }

    fn namespaced_api<K>(&self, obj: &K) -> KubeApi<K>
    where
	K: KubeResource<DynamicType = (), Scope = NamespaceResourceScope>,
    {
	let namespace = obj.meta().namespace.as_deref().unwrap_or(DEFAULT_NAMESPACE);
	KubeApi::namespaced(self.kube_client.clone(), namespace)
    }

    async fn create<K>(api: KubeApi<K>, obj: &K) -> Result<(), ClusterError>
    where
	K: KubeResource + Clone + DeserializeOwned + Serialize + Debug,
    {
	let opts = KubePostParams::default();
	api.create(&opts, obj).await.map(|_| ()).map_err(classify)
    }

    async fn delete<K>(api: KubeApi<K>, obj: &K) -> Result<(), ClusterError>
    where
	K: KubeResource + Clone + DeserializeOwned + Debug,
    {
	let name = obj.meta().name.clone().unwrap_or_default();
	let opts = KubeDeleteParams::background();
	api.delete(&name, &opts).await.map(|_| ()).map_err(classify)
    }
}

#[async_trait]
impl ClusterTransport for KubeTransport {

    async fn create_object(&self, obj: &TypedObject) -> Result<(), ClusterError> {
	match obj {
	    TypedObject::Namespace(o) => Self::create(self.cluster_api(), o).await,
	    TypedObject::ServiceAccount(o) => Self::create(self.namespaced_api(o), o).await,
	    TypedObject::ClusterRole(o) => Self::create(self.cluster_api(), o).await,
	    TypedObject::ClusterRoleBinding(o) => Self::create(self.cluster_api(), o).await,
	    TypedObject::RoleBinding(o) => Self::create(self.namespaced_api(o), o).await,
	    TypedObject::ConfigMap(o) => Self::create(self.namespaced_api(o), o).await,
	    TypedObject::Deployment(o) => Self::create(self.namespaced_api(o), o).await,
	    TypedObject::DaemonSet(o) => Self::create(self.namespaced_api(o), o).await,
	    TypedObject::CustomResourceDefinition(o) => Self::create(self.cluster_api(), o).await,
	}
    }

    async fn delete_object(&self, obj: &TypedObject) -> Result<(), ClusterError> {
	match obj {
	    TypedObject::Namespace(o) => Self::delete(self.cluster_api(), o).await,
	    TypedObject::ServiceAccount(o) => Self::delete(self.namespaced_api(o), o).await,
	    TypedObject::ClusterRole(o) => Self::delete(self.cluster_api(), o).await,
	    TypedObject::ClusterRoleBinding(o) => Self::delete(self.cluster_api(), o).await,
	    TypedObject::RoleBinding(o) => Self::delete(self.namespaced_api(o), o).await,
	    TypedObject::ConfigMap(o) => Self::delete(self.namespaced_api(o), o).await,
	    TypedObject::Deployment(o) => Self::delete(self.namespaced_api(o), o).await,
	    TypedObject::DaemonSet(o) => Self::delete(self.namespaced_api(o), o).await,
	    TypedObject::CustomResourceDefinition(o) => Self::delete(self.cluster_api(), o).await,
	}
    }
}

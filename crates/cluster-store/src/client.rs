//! Kubernetes-backed object store

use crate::error::StoreError;
use crate::object::{ObjectKind, OwnedObject};
use crate::store_trait::ObjectStore;
use crds::MyService;
use k8s_openapi::api::apps::v1::Deployment;
use k8s_openapi::api::core::v1::Service;
use kube::api::{Api, PostParams};
use kube::Client;
use tracing::debug;

/// Field manager recorded on objects this controller creates
pub const FIELD_MANAGER: &str = "myservice-controller";

/// ObjectStore over a live API server
#[derive(Clone)]
pub struct KubeObjectStore {
    client: Client,
}

impl std::fmt::Debug for KubeObjectStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("KubeObjectStore").finish_non_exhaustive()
    }
}

impl KubeObjectStore {
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    fn post_params() -> PostParams {
        PostParams {
            dry_run: false,
            field_manager: Some(FIELD_MANAGER.to_string()),
        }
    }
}

/// Sorts a kube error into the store's error kinds.
///
/// 409 becomes `AlreadyExists`, any other API status becomes `Rejected`,
/// everything else (transport, decoding) stays a `Kube` error.
fn classify(kind: ObjectKind, namespace: &str, name: &str, err: kube::Error) -> StoreError {
    match err {
        kube::Error::Api(ae) if ae.code == 409 => StoreError::AlreadyExists {
            kind,
            namespace: namespace.to_string(),
            name: name.to_string(),
        },
        kube::Error::Api(ae) => StoreError::Rejected {
            kind,
            namespace: namespace.to_string(),
            name: name.to_string(),
            code: ae.code,
            message: ae.message.clone(),
        },
        other => StoreError::Kube(other),
    }
}

#[async_trait::async_trait]
impl ObjectStore for KubeObjectStore {
    async fn get_my_service(&self, namespace: &str, name: &str) -> Result<Option<MyService>, StoreError> {
        let api: Api<MyService> = Api::namespaced(self.client.clone(), namespace);
        // get_opt maps 404 to None
        api.get_opt(name)
            .await
            .map_err(|e| classify(ObjectKind::MyService, namespace, name, e))
    }

    async fn create(&self, object: &OwnedObject) -> Result<OwnedObject, StoreError> {
        let kind = object.kind();
        let name = object.name();
        let namespace = object
            .namespace()
            .ok_or(StoreError::MissingField { kind, field: "metadata.namespace" })?;
        if name.is_empty() {
            return Err(StoreError::MissingField { kind, field: "metadata.name" });
        }

        debug!("Creating {} {}/{}", kind, namespace, name);
        let pp = Self::post_params();

        let created = match object {
            OwnedObject::Deployment(deployment) => {
                let api: Api<Deployment> = Api::namespaced(self.client.clone(), namespace);
                api.create(&pp, deployment).await.map(OwnedObject::Deployment)
            }
            OwnedObject::Service(service) => {
                let api: Api<Service> = Api::namespaced(self.client.clone(), namespace);
                api.create(&pp, service).await.map(OwnedObject::Service)
            }
        };

        created.map_err(|e| classify(kind, namespace, name, e))
    }
}

//! Mock ObjectStore for unit testing
//!
//! Keeps objects in memory and behaves like the API server where the
//! reconciler can tell the difference: uids are assigned on create, duplicate
//! names answer with `AlreadyExists`, and failures can be injected per kind.

use crate::error::StoreError;
use crate::object::{ObjectKind, OwnedObject};
use crate::ownership;
use crate::store_trait::ObjectStore;
use crds::MyService;
use k8s_openapi::api::apps::v1::Deployment;
use k8s_openapi::api::core::v1::Service;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

type Key = (String, String);

/// Injected failure returned instead of performing an operation
#[derive(Debug, Clone)]
struct Failure {
    code: u16,
    message: String,
}

#[derive(Debug, Default)]
struct State {
    my_services: HashMap<Key, MyService>,
    deployments: HashMap<Key, Deployment>,
    services: HashMap<Key, Service>,
    get_failure: Option<Failure>,
    owner_reference_failure: Option<String>,
    create_failures: HashMap<ObjectKind, Failure>,
    create_calls: Vec<(ObjectKind, String)>,
}

/// In-memory ObjectStore
#[derive(Debug, Clone, Default)]
pub struct MockObjectStore {
    state: Arc<Mutex<State>>,
}

fn key(namespace: Option<&str>, name: Option<&str>) -> Key {
    (
        namespace.unwrap_or_default().to_string(),
        name.unwrap_or_default().to_string(),
    )
}

fn new_uid() -> String {
    uuid::Uuid::new_v4().to_string()
}

impl MockObjectStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn state(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Add a MyService (for test setup). A uid is assigned if missing.
    pub fn add_my_service(&self, mut my_service: MyService) {
        if my_service.metadata.uid.is_none() {
            my_service.metadata.uid = Some(new_uid());
        }
        let k = key(my_service.metadata.namespace.as_deref(), my_service.metadata.name.as_deref());
        self.state().my_services.insert(k, my_service);
    }

    /// Remove a MyService, as if it was deleted between enqueue and fetch
    pub fn remove_my_service(&self, namespace: &str, name: &str) {
        self.state().my_services.remove(&key(Some(namespace), Some(name)));
    }

    /// Add a pre-existing Deployment (for test setup)
    pub fn add_deployment(&self, deployment: Deployment) {
        let k = key(deployment.metadata.namespace.as_deref(), deployment.metadata.name.as_deref());
        self.state().deployments.insert(k, deployment);
    }

    /// Add a pre-existing Service (for test setup)
    pub fn add_service(&self, service: Service) {
        let k = key(service.metadata.namespace.as_deref(), service.metadata.name.as_deref());
        self.state().services.insert(k, service);
    }

    /// Make every `get_my_service` fail with the given API status
    pub fn fail_gets(&self, code: u16, message: impl Into<String>) {
        self.state().get_failure = Some(Failure { code, message: message.into() });
    }

    /// Make every create of `kind` fail with the given API status
    pub fn fail_creates(&self, kind: ObjectKind, code: u16, message: impl Into<String>) {
        self.state()
            .create_failures
            .insert(kind, Failure { code, message: message.into() });
    }

    /// Make every `set_owner_reference` fail with the given reason
    pub fn fail_owner_references(&self, reason: impl Into<String>) {
        self.state().owner_reference_failure = Some(reason.into());
    }

    /// Remove all injected failures
    pub fn clear_failures(&self) {
        let mut state = self.state();
        state.get_failure = None;
        state.owner_reference_failure = None;
        state.create_failures.clear();
    }

    pub fn deployments(&self) -> Vec<Deployment> {
        self.state().deployments.values().cloned().collect()
    }

    pub fn services(&self) -> Vec<Service> {
        self.state().services.values().cloned().collect()
    }

    pub fn deployment(&self, namespace: &str, name: &str) -> Option<Deployment> {
        self.state().deployments.get(&key(Some(namespace), Some(name))).cloned()
    }

    pub fn service(&self, namespace: &str, name: &str) -> Option<Service> {
        self.state().services.get(&key(Some(namespace), Some(name))).cloned()
    }

    /// Every create attempt so far, in order, as `(kind, namespace/name)`
    pub fn create_calls(&self) -> Vec<(ObjectKind, String)> {
        self.state().create_calls.clone()
    }
}

#[async_trait::async_trait]
impl ObjectStore for MockObjectStore {
    async fn get_my_service(&self, namespace: &str, name: &str) -> Result<Option<MyService>, StoreError> {
        let state = self.state();
        if let Some(f) = &state.get_failure {
            return Err(StoreError::Rejected {
                kind: ObjectKind::MyService,
                namespace: namespace.to_string(),
                name: name.to_string(),
                code: f.code,
                message: f.message.clone(),
            });
        }
        Ok(state.my_services.get(&key(Some(namespace), Some(name))).cloned())
    }

    async fn create(&self, object: &OwnedObject) -> Result<OwnedObject, StoreError> {
        let kind = object.kind();
        let namespace = object
            .namespace()
            .ok_or(StoreError::MissingField { kind, field: "metadata.namespace" })?
            .to_string();
        let name = object.name().to_string();
        if name.is_empty() {
            return Err(StoreError::MissingField { kind, field: "metadata.name" });
        }

        let mut state = self.state();
        state.create_calls.push((kind, format!("{namespace}/{name}")));

        if let Some(f) = state.create_failures.get(&kind) {
            return Err(StoreError::Rejected {
                kind,
                namespace,
                name,
                code: f.code,
                message: f.message.clone(),
            });
        }

        let k = (namespace.clone(), name.clone());
        let exists = match kind {
            ObjectKind::Deployment => state.deployments.contains_key(&k),
            ObjectKind::Service => state.services.contains_key(&k),
            ObjectKind::MyService => state.my_services.contains_key(&k),
        };
        if exists {
            return Err(StoreError::AlreadyExists { kind, namespace, name });
        }

        let mut created = object.clone();
        created.meta_mut().uid = Some(new_uid());
        match &created {
            OwnedObject::Deployment(d) => {
                state.deployments.insert(k, d.clone());
            }
            OwnedObject::Service(s) => {
                state.services.insert(k, s.clone());
            }
        }

        Ok(created)
    }

    fn set_owner_reference(&self, child: &mut OwnedObject, owner: &MyService) -> Result<(), StoreError> {
        if let Some(reason) = &self.state().owner_reference_failure {
            return Err(StoreError::OwnerReference {
                kind: child.kind(),
                name: child.name().to_string(),
                reason: reason.clone(),
            });
        }
        ownership::set_controller_reference(owner, child)
    }
}

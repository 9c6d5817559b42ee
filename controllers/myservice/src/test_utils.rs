//! Test utilities for unit testing the reconciler
//!
//! This module provides helpers for creating test data and setting up test scenarios.

use crate::metrics::Metrics;
use crate::reconciler::Reconciler;
use cluster_store::MockObjectStore;
use crds::{MyService, MyServiceSpec, ServiceKind};
use std::sync::Arc;

/// Helper to create a test MyService CRD with a uid, as the API server would return it
pub fn create_test_my_service(
    name: &str,
    namespace: &str,
    image: &str,
    replicas: i32,
    service_kind: ServiceKind,
) -> MyService {
    let mut my_service = MyService::new(
        name,
        MyServiceSpec {
            target_image: image.to_string(),
            replica_count: replicas,
            service_kind,
        },
    );
    my_service.metadata.namespace = Some(namespace.to_string());
    my_service.metadata.uid = Some(format!("uid-{namespace}-{name}"));
    my_service
}

/// Reconciler wired to an in-memory store; returns the store handle for assertions
pub fn create_test_reconciler() -> (Reconciler, MockObjectStore, Arc<Metrics>) {
    let store = MockObjectStore::new();
    let metrics = Arc::new(Metrics::new().unwrap());
    let reconciler = Reconciler::new(Box::new(store.clone()), metrics.clone());
    (reconciler, store, metrics)
}

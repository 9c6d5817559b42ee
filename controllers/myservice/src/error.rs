//! Controller-specific error types.
//!
//! This module defines error types specific to the MyService Controller
//! that are not covered by upstream library errors.

use cluster_store::StoreError;
use kube::Error as KubeError;
use thiserror::Error;

/// Errors that can occur in the MyService Controller.
#[derive(Debug, Error)]
pub enum ControllerError {
    /// Object store error (fetch, create, owner reference)
    #[error("Object store error: {0}")]
    Store(#[from] StoreError),

    /// Kubernetes API error
    #[error("Kubernetes error: {0}")]
    Kube(#[from] KubeError),

    /// A MyService is missing a metadata field the derived objects need
    #[error("MyService is missing {0}")]
    MissingObjectKey(&'static str),

    /// Invalid configuration
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Metrics registry error
    #[error("Metrics error: {0}")]
    Metrics(#[from] prometheus::Error),

    /// Probe server failed to bind or serve
    #[error("Probe server error: {0}")]
    Probe(#[source] std::io::Error),

    /// Background task exited
    #[error("Resource watch failed: {0}")]
    Watch(String),
}

//! Object store errors

use crate::object::ObjectKind;
use thiserror::Error;

/// Errors that can occur when reading or writing cluster objects
#[derive(Debug, Error)]
pub enum StoreError {
    /// Transport, decoding, or client-side error from kube
    #[error("Kubernetes client error: {0}")]
    Kube(#[from] kube::Error),

    /// Create was refused because an object with the same name exists (HTTP 409)
    #[error("{kind} {namespace}/{name} already exists")]
    AlreadyExists {
        kind: ObjectKind,
        namespace: String,
        name: String,
    },

    /// The API server rejected the request with a non-conflict status
    #[error("API server rejected {kind} {namespace}/{name} ({code}): {message}")]
    Rejected {
        kind: ObjectKind,
        namespace: String,
        name: String,
        code: u16,
        message: String,
    },

    /// A required metadata field is not set
    #[error("Missing {field} on {kind}")]
    MissingField {
        kind: ObjectKind,
        field: &'static str,
    },

    /// The owner reference could not be attached
    #[error("Cannot set owner reference on {kind} {name}: {reason}")]
    OwnerReference {
        kind: ObjectKind,
        name: String,
        reason: String,
    },

    /// The object is already controlled by a different owner
    #[error("{kind} {name} is already controlled by {controller_kind} {controller_name}")]
    AlreadyOwned {
        kind: ObjectKind,
        name: String,
        controller_kind: String,
        controller_name: String,
    },
}

impl StoreError {
    /// True for the benign "already exists" create conflict.
    pub fn is_already_exists(&self) -> bool {
        matches!(self, StoreError::AlreadyExists { .. })
    }
}

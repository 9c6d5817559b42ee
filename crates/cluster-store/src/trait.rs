//! ObjectStore trait for mocking
//!
//! The reconciler only talks to the cluster through this trait. The kube-backed
//! `KubeObjectStore` implements it for production; tests use `MockObjectStore`.

use crate::error::StoreError;
use crate::object::OwnedObject;
use crate::ownership;
use crds::MyService;

/// Cluster operations needed to reconcile a MyService
///
/// All async methods must be `Send` to work with Tokio's work-stealing runtime.
#[async_trait::async_trait]
pub trait ObjectStore: Send + Sync {
    /// Fetch a MyService. `Ok(None)` means it does not exist (anymore).
    async fn get_my_service(&self, namespace: &str, name: &str) -> Result<Option<MyService>, StoreError>;

    /// Create an owned object.
    ///
    /// Returns `StoreError::AlreadyExists` when an object with that name is
    /// already present; the existing object is left untouched.
    async fn create(&self, object: &OwnedObject) -> Result<OwnedObject, StoreError>;

    /// Attach a controller owner reference from `child` to `owner`.
    fn set_owner_reference(&self, child: &mut OwnedObject, owner: &MyService) -> Result<(), StoreError> {
        ownership::set_controller_reference(owner, child)
    }
}

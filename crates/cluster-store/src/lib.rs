//! Cluster Object Store
//!
//! The narrow slice of the Kubernetes API the MyService reconciler needs:
//! fetch a `MyService`, create owned children, and link them to their owner.
//!
//! # Example
//!
//! ```no_run
//! use cluster_store::{KubeObjectStore, ObjectStore};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let client = kube::Client::try_default().await?;
//! let store = KubeObjectStore::new(client);
//!
//! if let Some(my_service) = store.get_my_service("default", "sample").await? {
//!     println!("image: {}", my_service.spec.target_image);
//! }
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod error;
pub mod object;
pub mod ownership;
#[path = "trait.rs"]
pub mod store_trait;
#[cfg(feature = "test-util")]
pub mod mock;

pub use client::KubeObjectStore;
pub use error::StoreError;
pub use object::{ObjectKind, OwnedObject};
pub use ownership::set_controller_reference;
pub use store_trait::ObjectStore;
#[cfg(feature = "test-util")]
pub use mock::MockObjectStore;

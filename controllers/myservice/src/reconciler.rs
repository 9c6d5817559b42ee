//! Reconciliation logic for the MyService CRD.
//!
//! A single create-if-absent pass: fetch the MyService, then make sure its
//! Deployment and Service exist. Existing objects are never updated, and
//! deletion is left to owner-reference garbage collection.

use crate::error::ControllerError;
use crate::metrics::{outcome, Metrics};
use crate::resources;
use cluster_store::{ObjectStore, OwnedObject};
use crds::MyService;
use std::sync::Arc;
use tracing::{debug, error, info};

/// What happened to one owned object during a reconcile pass
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CreateOutcome {
    /// Created by this pass
    Created,
    /// Already present; left untouched
    AlreadyExisted,
}

/// Result of a successful reconcile pass
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReconcileOutcome {
    /// The MyService is gone; nothing to do
    NotFound,
    /// Both owned objects exist
    Reconciled {
        deployment: CreateOutcome,
        service: CreateOutcome,
    },
}

/// Reconciles MyService resources.
pub struct Reconciler {
    store: Box<dyn ObjectStore>,
    metrics: Arc<Metrics>,
}

impl std::fmt::Debug for Reconciler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Reconciler").finish_non_exhaustive()
    }
}

impl Reconciler {
    /// Creates a new reconciler instance.
    pub fn new(store: Box<dyn ObjectStore>, metrics: Arc<Metrics>) -> Self {
        Self { store, metrics }
    }

    /// Reconciles the MyService identified by `namespace`/`name`.
    ///
    /// This method:
    /// 1. Fetches the MyService (gone means success, nothing to do)
    /// 2. Creates its Deployment unless one already exists
    /// 3. Creates its Service unless one already exists
    ///
    /// Any error other than "already exists" aborts the pass and is returned so
    /// the caller can requeue. Nothing created earlier in the pass is rolled back.
    pub async fn reconcile(&self, namespace: &str, name: &str) -> Result<ReconcileOutcome, ControllerError> {
        let result = self.reconcile_inner(namespace, name).await;

        let label = match &result {
            Ok(ReconcileOutcome::NotFound) => outcome::NOT_FOUND,
            Ok(ReconcileOutcome::Reconciled { .. }) => outcome::RECONCILED,
            Err(_) => outcome::ERROR,
        };
        self.metrics.record_reconciliation(label);

        result
    }

    async fn reconcile_inner(&self, namespace: &str, name: &str) -> Result<ReconcileOutcome, ControllerError> {
        info!("Reconciling MyService {}/{}", namespace, name);

        let my_service = match self.store.get_my_service(namespace, name).await {
            Ok(Some(s)) => s,
            Ok(None) => {
                info!("MyService {}/{} not found, assuming it was deleted", namespace, name);
                return Ok(ReconcileOutcome::NotFound);
            }
            Err(e) => {
                error!("Unable to fetch MyService {}/{}: {}", namespace, name, e);
                return Err(e.into());
            }
        };

        let deployment = resources::build_deployment(&my_service)?;
        let deployment = self.ensure_owned(&my_service, deployment.into()).await?;

        let service = resources::build_service(&my_service)?;
        let service = self.ensure_owned(&my_service, service.into()).await?;

        info!("Reconciliation of MyService {}/{} complete", namespace, name);

        Ok(ReconcileOutcome::Reconciled { deployment, service })
    }

    /// Links `object` to its owner and creates it if absent.
    async fn ensure_owned(
        &self,
        owner: &MyService,
        mut object: OwnedObject,
    ) -> Result<CreateOutcome, ControllerError> {
        let kind = object.kind();

        if let Err(e) = self.store.set_owner_reference(&mut object, owner) {
            error!("Unable to set controller reference for {}: {}", kind, e);
            return Err(e.into());
        }

        match self.store.create(&object).await {
            Ok(_) => {
                info!("Created {} {}/{}", kind, object.namespace().unwrap_or_default(), object.name());
                self.metrics.record_created(&kind.to_string());
                Ok(CreateOutcome::Created)
            }
            Err(e) if e.is_already_exists() => {
                debug!("{} {} already exists, leaving it as is", kind, object.name());
                Ok(CreateOutcome::AlreadyExisted)
            }
            Err(e) => {
                error!("Unable to create {} {}: {}", kind, object.name(), e);
                Err(e.into())
            }
        }
    }
}

//! Kubernetes resource watchers.
//!
//! Drives the reconciler from `kube_runtime::Controller`. MyService events
//! trigger reconciliation directly; Deployment and Service events are mapped
//! back to their owning MyService through the controller owner reference.

use crate::backoff::ExponentialBackoff;
use crate::error::ControllerError;
use crate::probes::ProbeState;
use crate::reconciler::Reconciler;
use crds::MyService;
use futures::{Stream, StreamExt};
use k8s_openapi::api::apps::v1::Deployment;
use k8s_openapi::api::core::v1::Service;
use kube::{Api, ResourceExt};
use kube_runtime::{controller::{Action, Config as ControllerConfig}, watcher, Controller};
use std::fmt::Display;
use std::sync::Arc;
use tracing::{debug, error, info, warn};

/// State shared by every reconcile invocation
#[derive(Debug)]
pub struct Context {
    pub reconciler: Reconciler,
    pub backoff: ExponentialBackoff,
}

fn object_key(obj: &MyService) -> (String, String) {
    (obj.namespace().unwrap_or_default(), obj.name_any())
}

async fn reconcile(obj: Arc<MyService>, ctx: Arc<Context>) -> Result<Action, ControllerError> {
    let (namespace, name) = object_key(&obj);
    debug!("Reconciling MyService {}/{}", namespace, name);

    ctx.reconciler.reconcile(&namespace, &name).await?;
    ctx.backoff.reset(&format!("{namespace}/{name}"));

    Ok(Action::await_change())
}

fn error_policy(obj: Arc<MyService>, error: &ControllerError, ctx: Arc<Context>) -> Action {
    let (namespace, name) = object_key(&obj);
    let delay = ctx.backoff.next_delay(&format!("{namespace}/{name}"));
    warn!(
        "Reconciliation of MyService {}/{} failed, requeue in {:?}: {}",
        namespace, name, delay, error
    );
    Action::requeue(delay)
}

/// Drains the controller output, reporting ready for as long as it runs.
async fn drive<S, O, A, E>(stream: S, probes: &ProbeState)
where
    S: Stream<Item = Result<(O, A), E>>,
    O: Display,
    E: Display,
{
    probes.set_ready(true);
    stream
        .for_each(|res| async move {
            match res {
                Ok((obj, _action)) => debug!("Reconciled {}", obj),
                Err(e) => error!("Controller error: {}", e),
            }
        })
        .await;
    probes.set_ready(false);
}

/// Watches MyService resources and their owned Deployments and Services.
pub struct Watcher {
    my_service_api: Api<MyService>,
    deployment_api: Api<Deployment>,
    service_api: Api<Service>,
    concurrency: u16,
}

impl std::fmt::Debug for Watcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Watcher")
            .field("concurrency", &self.concurrency)
            .finish_non_exhaustive()
    }
}

impl Watcher {
    /// Creates a new watcher instance.
    pub fn new(
        my_service_api: Api<MyService>,
        deployment_api: Api<Deployment>,
        service_api: Api<Service>,
        concurrency: u16,
    ) -> Self {
        Self {
            my_service_api,
            deployment_api,
            service_api,
            concurrency,
        }
    }

    /// Runs the controller loop until a shutdown signal arrives.
    ///
    /// `/readyz` reports ready while the loop runs.
    pub async fn watch_my_services(self, ctx: Arc<Context>, probes: ProbeState) -> Result<(), ControllerError> {
        info!("Starting MyService watcher");

        let controller_config = ControllerConfig::default().concurrency(self.concurrency);

        let stream = Controller::new(self.my_service_api, watcher::Config::default())
            .owns(self.deployment_api, watcher::Config::default())
            .owns(self.service_api, watcher::Config::default())
            .with_config(controller_config)
            .shutdown_on_signal()
            .run(reconcile, error_policy, ctx);
        drive(stream, &probes).await;

        info!("MyService watcher stopped");
        Ok(())
    }
}

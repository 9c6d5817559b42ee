//! Main controller implementation.
//!
//! Wires the Kubernetes client, object store, reconciler and metrics together,
//! then runs the MyService watcher next to the probe server.

use crate::backoff::ExponentialBackoff;
use crate::config::ControllerConfig;
use crate::error::ControllerError;
use crate::metrics::Metrics;
use crate::probes::{self, ProbeState};
use crate::reconciler::Reconciler;
use crate::watcher::{Context, Watcher};
use cluster_store::KubeObjectStore;
use crds::MyService;
use k8s_openapi::api::apps::v1::Deployment;
use k8s_openapi::api::core::v1::Service;
use kube::{Api, Client, Resource};
use std::sync::Arc;
use tokio::task::JoinHandle;
use tracing::info;

/// Main controller for MyService resources.
pub struct Controller {
    my_service_watcher: JoinHandle<Result<(), ControllerError>>,
    probe_server: JoinHandle<Result<(), ControllerError>>,
}

fn scoped_api<K>(client: &Client, namespace: Option<&str>) -> Api<K>
where
    K: Resource<Scope = k8s_openapi::NamespaceResourceScope, DynamicType = ()>,
{
    match namespace {
        Some(ns) => Api::namespaced(client.clone(), ns),
        None => Api::all(client.clone()),
    }
}

impl Controller {
    /// Creates a new controller instance and starts its background tasks.
    pub async fn new(config: ControllerConfig) -> Result<Self, ControllerError> {
        info!("Initializing MyService Controller");

        let kube_client = Client::try_default().await?;
        let metrics = Arc::new(Metrics::new()?);

        let reconciler = Reconciler::new(
            Box::new(KubeObjectStore::new(kube_client.clone())),
            metrics.clone(),
        );
        let ctx = Arc::new(Context {
            reconciler,
            backoff: ExponentialBackoff::new(config.backoff_base, config.backoff_max),
        });

        let ns = config.watch_namespace.as_deref();
        let watcher = Watcher::new(
            scoped_api::<MyService>(&kube_client, ns),
            scoped_api::<Deployment>(&kube_client, ns),
            scoped_api::<Service>(&kube_client, ns),
            config.concurrency,
        );

        let probe_state = ProbeState::new(metrics);
        let probe_server = {
            let state = probe_state.clone();
            let addr = config.probe_addr;
            tokio::spawn(async move { probes::serve(addr, state).await })
        };

        let my_service_watcher =
            tokio::spawn(async move { watcher.watch_my_services(ctx, probe_state).await });

        Ok(Self {
            my_service_watcher,
            probe_server,
        })
    }

    /// Runs until the watcher stops or the probe server fails.
    pub async fn run(mut self) -> Result<(), ControllerError> {
        info!("MyService Controller running");

        tokio::select! {
            result = &mut self.my_service_watcher => {
                result.map_err(|e| ControllerError::Watch(format!("MyService watcher panicked: {}", e)))??;
            }
            result = &mut self.probe_server => {
                result.map_err(|e| ControllerError::Watch(format!("Probe server panicked: {}", e)))??;
                return Err(ControllerError::Watch("Probe server exited".to_string()));
            }
        }

        self.probe_server.abort();
        info!("MyService Controller stopped");
        Ok(())
    }
}

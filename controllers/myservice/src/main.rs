//! MyService Controller
//!
//! Watches `MyService` resources (webapp.my.domain/v1) and makes sure each one
//! has a Deployment running its target image and a Service in front of it.
//! Both objects are owned by the MyService and are garbage-collected with it.

mod backoff;
mod config;
mod controller;
mod error;
mod metrics;
mod probes;
mod reconciler;
mod resources;
mod watcher;

#[cfg(test)]
mod test_utils;

use crate::config::ControllerConfig;
use crate::error::ControllerError;
use controller::Controller;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), ControllerError> {
    let provider_installed = rustls::crypto::ring::default_provider().install_default().is_ok();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    if !provider_installed {
        warn!("A rustls crypto provider was already installed");
    }

    info!("Starting MyService Controller");

    let config = ControllerConfig::from_env()?;

    info!("Configuration:");
    info!("  Namespace: {}", config.watch_namespace.as_deref().unwrap_or("all namespaces"));
    info!("  Probe address: {}", config.probe_addr);
    info!("  Concurrency: {}", config.concurrency);
    info!("  Backoff: {:?} up to {:?}", config.backoff_base, config.backoff_max);

    let controller = Controller::new(config).await?;
    controller.run().await?;

    Ok(())
}

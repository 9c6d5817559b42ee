//! Prometheus metrics for the controller.

use prometheus::{Encoder, IntCounterVec, Opts, Registry, TextEncoder};

/// Outcome label values for `myservice_reconciliations_total`
pub mod outcome {
    pub const RECONCILED: &str = "reconciled";
    pub const NOT_FOUND: &str = "not_found";
    pub const ERROR: &str = "error";
}

/// Controller metrics, registered on a private registry
#[derive(Clone)]
pub struct Metrics {
    registry: Registry,
    reconciliations: IntCounterVec,
    objects_created: IntCounterVec,
}

impl std::fmt::Debug for Metrics {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Metrics").finish_non_exhaustive()
    }
}

impl Metrics {
    pub fn new() -> Result<Self, prometheus::Error> {
        let registry = Registry::new();

        let reconciliations = IntCounterVec::new(
            Opts::new("myservice_reconciliations_total", "MyService reconciliations by outcome"),
            &["outcome"],
        )?;
        let objects_created = IntCounterVec::new(
            Opts::new("myservice_objects_created_total", "Owned objects created by kind"),
            &["kind"],
        )?;

        registry.register(Box::new(reconciliations.clone()))?;
        registry.register(Box::new(objects_created.clone()))?;

        Ok(Self {
            registry,
            reconciliations,
            objects_created,
        })
    }

    pub fn record_reconciliation(&self, outcome: &str) {
        self.reconciliations.with_label_values(&[outcome]).inc();
    }

    pub fn record_created(&self, kind: &str) {
        self.objects_created.with_label_values(&[kind]).inc();
    }

    #[cfg(test)]
    pub fn reconciliations(&self, outcome: &str) -> u64 {
        self.reconciliations.with_label_values(&[outcome]).get()
    }

    #[cfg(test)]
    pub fn created(&self, kind: &str) -> u64 {
        self.objects_created.with_label_values(&[kind]).get()
    }

    /// Text exposition format of every registered metric
    pub fn encode(&self) -> Result<String, prometheus::Error> {
        let mut buf = Vec::new();
        TextEncoder::new().encode(&self.registry.gather(), &mut buf)?;
        String::from_utf8(buf).map_err(|e| prometheus::Error::Msg(e.to_string()))
    }
}

//! Controller configuration from environment variables.

use crate::error::ControllerError;
use std::net::SocketAddr;
use std::str::FromStr;
use std::time::Duration;

const DEFAULT_PROBE_ADDR: &str = "0.0.0.0:8081";
const DEFAULT_CONCURRENCY: u16 = 3;
const DEFAULT_BACKOFF_BASE_SECONDS: u64 = 5;
const DEFAULT_BACKOFF_MAX_SECONDS: u64 = 300;

/// Runtime settings for the controller process
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ControllerConfig {
    /// Namespace to watch; `None` watches all namespaces
    pub watch_namespace: Option<String>,
    /// Listener for /healthz, /readyz and /metrics
    pub probe_addr: SocketAddr,
    /// Maximum concurrent reconciliations
    pub concurrency: u16,
    /// First requeue delay after a failed reconcile
    pub backoff_base: Duration,
    /// Upper bound for the requeue delay
    pub backoff_max: Duration,
}

impl ControllerConfig {
    /// Reads the process environment.
    pub fn from_env() -> Result<Self, ControllerError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the config from an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ControllerError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let watch_namespace = lookup("WATCH_NAMESPACE").filter(|ns| !ns.trim().is_empty());

        let probe_addr = parse_or(&lookup, "HEALTH_PROBE_BIND_ADDRESS", || {
            SocketAddr::from_str(DEFAULT_PROBE_ADDR).map_err(|e| ControllerError::InvalidConfig(e.to_string()))
        })?;

        let concurrency: u16 = parse_or(&lookup, "RECONCILE_CONCURRENCY", || Ok(DEFAULT_CONCURRENCY))?;
        if concurrency == 0 {
            return Err(ControllerError::InvalidConfig(
                "RECONCILE_CONCURRENCY must be at least 1".to_string(),
            ));
        }

        let base: u64 = parse_or(&lookup, "BACKOFF_BASE_SECONDS", || Ok(DEFAULT_BACKOFF_BASE_SECONDS))?;
        let max: u64 = parse_or(&lookup, "BACKOFF_MAX_SECONDS", || Ok(DEFAULT_BACKOFF_MAX_SECONDS))?;
        if base == 0 || max < base {
            return Err(ControllerError::InvalidConfig(format!(
                "backoff bounds must satisfy 0 < BACKOFF_BASE_SECONDS ({base}) <= BACKOFF_MAX_SECONDS ({max})"
            )));
        }

        Ok(Self {
            watch_namespace,
            probe_addr,
            concurrency,
            backoff_base: Duration::from_secs(base),
            backoff_max: Duration::from_secs(max),
        })
    }
}

fn parse_or<F, T, D>(lookup: &F, key: &str, default: D) -> Result<T, ControllerError>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
    T::Err: std::fmt::Display,
    D: FnOnce() -> Result<T, ControllerError>,
{
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|e| ControllerError::InvalidConfig(format!("{key}={raw}: {e}"))),
        None => default(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config(vars: &[(&str, &str)]) -> Result<ControllerConfig, ControllerError> {
        let env: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        ControllerConfig::from_lookup(|key| env.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let cfg = config(&[]).unwrap();
        assert_eq!(cfg.watch_namespace, None);
        assert_eq!(cfg.probe_addr, "0.0.0.0:8081".parse().unwrap());
        assert_eq!(cfg.concurrency, 3);
        assert_eq!(cfg.backoff_base, Duration::from_secs(5));
        assert_eq!(cfg.backoff_max, Duration::from_secs(300));
    }

    #[test]
    fn test_overrides() {
        let cfg = config(&[
            ("WATCH_NAMESPACE", "apps"),
            ("HEALTH_PROBE_BIND_ADDRESS", "127.0.0.1:9090"),
            ("RECONCILE_CONCURRENCY", "8"),
            ("BACKOFF_BASE_SECONDS", "1"),
            ("BACKOFF_MAX_SECONDS", "60"),
        ])
        .unwrap();
        assert_eq!(cfg.watch_namespace.as_deref(), Some("apps"));
        assert_eq!(cfg.probe_addr.port(), 9090);
        assert_eq!(cfg.concurrency, 8);
        assert_eq!(cfg.backoff_base, Duration::from_secs(1));
        assert_eq!(cfg.backoff_max, Duration::from_secs(60));
    }

    #[test]
    fn test_blank_namespace_means_all() {
        let cfg = config(&[("WATCH_NAMESPACE", "  ")]).unwrap();
        assert_eq!(cfg.watch_namespace, None);
    }

    #[test]
    fn test_invalid_values() {
        assert!(matches!(
            config(&[("RECONCILE_CONCURRENCY", "lots")]),
            Err(ControllerError::InvalidConfig(_))
        ));
        assert!(matches!(
            config(&[("RECONCILE_CONCURRENCY", "0")]),
            Err(ControllerError::InvalidConfig(_))
        ));
        assert!(matches!(
            config(&[("HEALTH_PROBE_BIND_ADDRESS", ":8081")]),
            Err(ControllerError::InvalidConfig(_))
        ));
        assert!(matches!(
            config(&[("BACKOFF_BASE_SECONDS", "30"), ("BACKOFF_MAX_SECONDS", "10")]),
            Err(ControllerError::InvalidConfig(_))
        ));
    }
}

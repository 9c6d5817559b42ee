//! # Exponential Backoff
//!
//! Per-object requeue delays for failed reconciliations.
//!
//! Each consecutive failure of the same object doubles its delay, starting at
//! `base` and capped at `max`. A successful reconcile resets the object.

use std::collections::HashMap;
use std::sync::Mutex;
use std::time::Duration;

/// Tracks consecutive failures per object key (`namespace/name`)
#[derive(Debug)]
pub struct ExponentialBackoff {
    base: Duration,
    max: Duration,
    failures: Mutex<HashMap<String, u32>>,
}

impl ExponentialBackoff {
    #[must_use]
    pub fn new(base: Duration, max: Duration) -> Self {
        Self {
            base,
            max,
            failures: Mutex::new(HashMap::new()),
        }
    }

    /// Delay for the next retry of `key`, advancing its failure count
    ///
    /// Sequence with base 5s, max 300s: 5s, 10s, 20s, 40s, 80s, 160s, 300s, 300s...
    pub fn next_delay(&self, key: &str) -> Duration {
        let mut failures = self.failures.lock().unwrap_or_else(std::sync::PoisonError::into_inner);
        let count = failures.entry(key.to_string()).or_insert(0);
        let delay = Self::delay_for(*count, self.base, self.max);
        *count = count.saturating_add(1);
        delay
    }

    /// Forget the failures of `key`
    pub fn reset(&self, key: &str) {
        self.failures
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .remove(key);
    }

    /// Consecutive failures recorded for `key`
    #[cfg(test)]
    pub fn failures(&self, key: &str) -> u32 {
        self.failures
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .get(key)
            .copied()
            .unwrap_or(0)
    }

    /// Stateless delay after `failures` previous failures: `min(base * 2^failures, max)`
    #[must_use]
    pub fn delay_for(failures: u32, base: Duration, max: Duration) -> Duration {
        let factor = 1u32.checked_shl(failures).unwrap_or(u32::MAX);
        base.checked_mul(factor).map_or(max, |d| d.min(max))
    }
}

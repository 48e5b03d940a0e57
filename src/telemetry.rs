//! Rate-limited warning logs and in-process metrics counters (spec §10.2).
//!
//! Checks skip silently on absent or malformed threshold data (spec §7), but
//! an operator still needs to know a key pattern is missing data in bulk.
//! `RateLimitedWarnings` caps that to one `tracing::warn!` per minute per
//! key pattern, using the same lock-free dashmap-keyed-state idiom as the
//! rest of the engine's per-key state.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};

use dashmap::DashMap;

const WARNING_INTERVAL: Duration = Duration::from_secs(60);

/// Suppresses repeat warnings for the same key pattern within a one-minute
/// window. Each distinct pattern gets its own independent window.
#[derive(Default)]
pub struct RateLimitedWarnings {
    last_emitted: DashMap<String, Instant>,
}

impl RateLimitedWarnings {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Log `message` at warn level for `pattern`, unless a warning for this
    /// pattern already fired within the last minute.
    pub fn warn(&self, pattern: &str, message: &str) {
        let now = Instant::now();
        let should_emit = match self.last_emitted.get(pattern) {
            Some(last) if now.duration_since(*last) < WARNING_INTERVAL => false,
            _ => true,
        };
        if should_emit {
            self.last_emitted.insert(pattern.to_string(), now);
            tracing::warn!(key_pattern = pattern, message);
        }
    }
}

/// Lightweight in-process counters surfaced by the admin metrics endpoint.
/// Intentionally not a full metrics library: the spec's Non-goals exclude an
/// external metrics pipeline, but an operable service still counts its own
/// throughput (§10.2).
#[derive(Default)]
pub struct Metrics {
    pub observations_processed: AtomicU64,
    pub outcomes_emitted: AtomicU64,
    pub events_emitted: AtomicU64,
    pub registry_lookups_absent: AtomicU64,
}

impl Metrics {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_observation(&self) {
        self.observations_processed.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_outcome(&self) {
        self.outcomes_emitted.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_event(&self) {
        self.events_emitted.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_registry_absent(&self) {
        self.registry_lookups_absent.fetch_add(1, Ordering::Relaxed);
    }

    #[must_use]
    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            observations_processed: self.observations_processed.load(Ordering::Relaxed),
            outcomes_emitted: self.outcomes_emitted.load(Ordering::Relaxed),
            events_emitted: self.events_emitted.load(Ordering::Relaxed),
            registry_lookups_absent: self.registry_lookups_absent.load(Ordering::Relaxed),
        }
    }
}

#[derive(Debug, Clone, Copy, serde::Serialize)]
pub struct MetricsSnapshot {
    pub observations_processed: u64,
    pub outcomes_emitted: u64,
    pub events_emitted: u64,
    pub registry_lookups_absent: u64,
}

//! Null-consecutive check (point, stateful) — spec §4.7.
//!
//! Per-PUID run-length counter over event-time-ordered observations,
//! edge-triggered: exactly one event fires per run, at the observation
//! where the counter transitions from `K-1` to `K`.

use crate::model::{QcEvent, SemanticObservation};
use crate::registry::{keys, Registry};
use crate::telemetry::RateLimitedWarnings;

use super::CheckEvent;

/// Per-PUID null-run state.
#[derive(Debug, Default)]
pub struct NullConsecutiveState {
    counter: u64,
    run_start: Option<i64>,
}

impl NullConsecutiveState {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn push<R: Registry>(
        &mut self,
        obs: &SemanticObservation,
        registry: &R,
        warnings: &RateLimitedWarnings,
    ) -> Vec<CheckEvent> {
        if !obs.is_null() {
            self.counter = 0;
            self.run_start = None;
            return Vec::new();
        }

        if self.counter == 0 {
            self.run_start = Some(obs.instant());
        }
        self.counter += 1;

        let key = keys::null_consecutive_key(&obs.puid);
        let Some(threshold_str) = registry.get(&key).await else {
            return Vec::new();
        };
        let Ok(threshold) = threshold_str.parse::<u64>() else {
            warnings.warn(&key, "malformed numeric registry value");
            return Vec::new();
        };

        if self.counter == threshold {
            let window_start = self.run_start.unwrap_or_else(|| obs.instant());
            vec![CheckEvent::Event(QcEvent::new(
                obs.puid.clone(),
                format!("Consecutive nulls: {}", self.counter),
                window_start,
                obs.instant(),
            ))]
        } else {
            Vec::new()
        }
    }
}

//! Sigma check (window, numeric) — spec §4.5.
//!
//! Streaming sample variance over a closed tumbling window, computed with
//! Welford's algorithm to avoid the catastrophic cancellation a naive
//! sum-of-squares would suffer. Resolved against thresholds at the window's
//! true midpoint (spec §9 deviation: not the source's buggy formula).

use crate::model::{QcOutcomeQuantitative, SemanticObservation, Verdict};
use crate::registry::Registry;
use crate::telemetry::RateLimitedWarnings;
use crate::threshold::{self, ThresholdFamily};
use crate::time::{window_centre, WindowDuration};

use super::CheckEvent;

/// Numerically stable streaming variance accumulator.
#[derive(Debug, Default, Clone, Copy)]
pub struct Welford {
    count: u64,
    mean: f64,
    m2: f64,
}

impl Welford {
    pub fn push(&mut self, value: f64) {
        self.count += 1;
        let delta = value - self.mean;
        self.mean += delta / self.count as f64;
        let delta2 = value - self.mean;
        self.m2 += delta * delta2;
    }

    /// Sample variance, or `None` with fewer than two observations.
    #[must_use]
    pub fn sample_variance(&self) -> Option<f64> {
        if self.count < 2 {
            None
        } else {
            Some(self.m2 / (self.count - 1) as f64)
        }
    }
}

/// Evaluate the sigma check for one closed window. `observations` must all
/// share the same PUID and fall within `[window_start, window_end)`.
pub async fn evaluate_window<R: Registry>(
    window_start: i64,
    window_end: i64,
    observations: &[SemanticObservation],
    registry: &R,
    warnings: &RateLimitedWarnings,
) -> Vec<CheckEvent> {
    let Some(puid) = observations.first().map(|o| o.puid.clone()) else {
        return Vec::new();
    };

    let mut welford = Welford::default();
    for obs in observations {
        if let Some(value) = obs.numeric() {
            welford.push(value);
        }
    }
    let Some(variance) = welford.sample_variance() else {
        return Vec::new();
    };

    let window_duration = WindowDuration::classify(window_end - window_start);
    let centre = window_centre(window_start, window_end);

    let methods = threshold::resolve(
        registry,
        warnings,
        &puid,
        ThresholdFamily::Sigma(window_duration),
        centre,
    )
    .await;

    let mut events = Vec::new();
    for method in &methods {
        if let Some(min) = method.min_f64() {
            events.extend(emit_for_each(observations, method, "min", min <= variance, min - variance));
        }
        if let Some(max) = method.max_f64() {
            events.extend(emit_for_each(observations, method, "max", variance <= max, variance - max));
        }
    }
    events
}

fn emit_for_each(
    observations: &[SemanticObservation],
    method: &threshold::ResolvedMethod,
    bound: &str,
    within_bound: bool,
    deviation_if_fail: f64,
) -> Vec<CheckEvent> {
    let (outcome, quantitative_value) = if within_bound {
        (Verdict::Pass, 0.0)
    } else {
        (Verdict::Fail, deviation_if_fail)
    };
    observations
        .iter()
        .map(|obs| {
            CheckEvent::Outcome(QcOutcomeQuantitative {
                puid: obs.puid.clone(),
                instant: obs.instant(),
                test_id: method.test_id(bound),
                outcome,
                quantitative_value,
            })
        })
        .collect()
}

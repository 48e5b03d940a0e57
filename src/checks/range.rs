//! Range check (point, numeric) — spec §4.3.

use crate::model::{QcOutcomeQuantitative, SemanticObservation, Verdict};
use crate::registry::Registry;
use crate::telemetry::RateLimitedWarnings;
use crate::threshold::{self, ThresholdFamily};

use super::CheckEvent;

/// Evaluate the range check for a single numeric observation.
///
/// Returns no events for observations without a present numeric value, or
/// when no range methods are configured for this PUID.
pub async fn evaluate<R: Registry>(
    obs: &SemanticObservation,
    registry: &R,
    warnings: &RateLimitedWarnings,
) -> Vec<CheckEvent> {
    let Some(value) = obs.numeric() else {
        return Vec::new();
    };

    let methods = threshold::resolve(
        registry,
        warnings,
        &obs.puid,
        ThresholdFamily::Range,
        obs.instant(),
    )
    .await;

    let mut events = Vec::new();
    for method in &methods {
        if let Some(min) = method.min_f64() {
            events.push(bound_outcome(obs, method, "min", min <= value, min - value));
        }
        if let Some(max) = method.max_f64() {
            events.push(bound_outcome(obs, method, "max", value <= max, value - max));
        }
    }
    events
}

fn bound_outcome(
    obs: &SemanticObservation,
    method: &threshold::ResolvedMethod,
    bound: &str,
    within_bound: bool,
    deviation_if_fail: f64,
) -> CheckEvent {
    let (outcome, quantitative_value) = if within_bound {
        (Verdict::Pass, 0.0)
    } else {
        (Verdict::Fail, deviation_if_fail)
    };
    CheckEvent::Outcome(QcOutcomeQuantitative {
        puid: obs.puid.clone(),
        instant: obs.instant(),
        test_id: method.test_id(bound),
        outcome,
        quantitative_value,
    })
}

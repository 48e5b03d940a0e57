//! Null-aggregate check (window, event) — spec §4.6.
//!
//! Keyed per PUID over tumbling windows, counting null observations
//! (present but with no numeric value) within the window.

use crate::model::{Puid, QcEvent};
use crate::registry::{keys, Registry};
use crate::telemetry::RateLimitedWarnings;

use super::CheckEvent;

/// Evaluate the null-aggregate check for one closed window. `null_count` is
/// the number of null observations observed within `[window_start,
/// window_end)` for `puid`.
pub async fn evaluate_window<R: Registry>(
    puid: &Puid,
    window_start: i64,
    window_end: i64,
    null_count: u64,
    registry: &R,
    warnings: &RateLimitedWarnings,
) -> Vec<CheckEvent> {
    let window_duration = crate::time::WindowDuration::classify(window_end - window_start);
    let key = keys::null_aggregate_key(puid, window_duration.as_str());

    let Some(threshold_str) = registry.get(&key).await else {
        return Vec::new();
    };
    let Ok(threshold) = threshold_str.parse::<u64>() else {
        warnings.warn(&key, "malformed numeric registry value");
        return Vec::new();
    };

    if null_count >= threshold {
        vec![CheckEvent::Event(QcEvent::new(
            puid.clone(),
            format!("Consecutive Nulls: {null_count}"),
            window_start,
            window_end,
        ))]
    } else {
        Vec::new()
    }
}

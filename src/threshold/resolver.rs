//! Threshold resolution (spec §4.2) — the engine's crux.
//!
//! Converts a `(PUID, family, instant, windowDuration?)` request into the
//! resolved `(method, testIdBase, granularity, min?, max?)` tuples a check
//! compares its observation or window statistic against.
//!
//! Traversal is a plain iterative loop over the method list (spec §9: the
//! source's recursive traversal is equivalent and clearer as iteration).

use crate::model::Puid;
use crate::registry::{keys, Registry};
use crate::telemetry::RateLimitedWarnings;
use crate::time::{suffix_for, Granularity};

use super::types::{ResolvedMethod, ThresholdFamily, TEST_ID_ROOT};

/// Resolve every method configured for `family` at `instant_millis`.
///
/// Returns an empty vector if the family has no methods enumerated for this
/// PUID (spec §4.2 step 1) — this is not an error, just "no applicable
/// checks".
pub async fn resolve<R: Registry>(
    registry: &R,
    warnings: &RateLimitedWarnings,
    puid: &Puid,
    family: ThresholdFamily,
    instant_millis: i64,
) -> Vec<ResolvedMethod> {
    let methods_key = keys::methods_key(puid, family.key_segment());
    let Some(methods_value) = registry.get(&methods_key).await else {
        return Vec::new();
    };

    let mut resolved = Vec::new();
    for method in methods_value.split("::").filter(|m| !m.is_empty()) {
        let granularity_key = keys::granularity_key(
            puid,
            family.key_segment(),
            family.window_duration().map(crate::time::WindowDuration::as_str),
            method,
        );

        let Some(granularity_tag) = registry.get(&granularity_key).await else {
            continue;
        };

        let Some(granularity) = Granularity::parse(&granularity_tag) else {
            warnings.warn(&granularity_key, "unrecognized granularity tag");
            continue;
        };

        let suffix = suffix_for(granularity, instant_millis);
        let min_key = keys::leaf_key(&granularity_key, "min", suffix.as_deref());
        let max_key = keys::leaf_key(&granularity_key, "max", suffix.as_deref());

        let min = registry
            .get(&min_key)
            .await
            .and_then(|v| validate_numeric(&min_key, v, warnings));
        let max = registry
            .get(&max_key)
            .await
            .and_then(|v| validate_numeric(&max_key, v, warnings));

        resolved.push(ResolvedMethod {
            method: method.to_string(),
            test_id_base: format!("{TEST_ID_ROOT}/{}/{method}", family.test_id_segment()),
            granularity,
            min,
            max,
        });
    }

    resolved
}

/// Spec §7 item 2: a non-numeric `min`/`max` registry value is logged once
/// and treated as absent, the same way `CheckEvent` producers treat a bound
/// that was never configured.
fn validate_numeric(key: &str, value: String, warnings: &RateLimitedWarnings) -> Option<String> {
    if value.parse::<f64>().is_ok() {
        Some(value)
    } else {
        warnings.warn(key, "malformed numeric registry value");
        None
    }
}

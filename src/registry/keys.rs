//! Centralized registry key construction (spec §4.1, §6).
//!
//! Key parts are joined by the literal `::` separator; a leading or trailing
//! `::` is never emitted. All other modules build registry keys exclusively
//! through these functions so the grammar lives in one place.

use crate::model::Puid;

/// Join non-empty parts with `::`. Empty parts are skipped so a caller can
/// pass an optional segment without special-casing the join.
fn join(parts: &[&str]) -> String {
    parts
        .iter()
        .filter(|p| !p.is_empty())
        .copied()
        .collect::<Vec<_>>()
        .join("::")
}

fn puid_prefix(puid: &Puid) -> String {
    join(&[&puid.feature, &puid.procedure, &puid.observableproperty])
}

/// `<PUID>::thresholds::<family>` → enumerated method list.
#[must_use]
pub fn methods_key(puid: &Puid, family: &str) -> String {
    join(&[&puid_prefix(puid), "thresholds", family])
}

/// `<PUID>::thresholds::<family>::<method>` → granularity tag.
///
/// For `family == "sigma"`, pass `window_dur` so the key becomes
/// `<PUID>::thresholds::sigma::<windowDuration>::<method>` per spec §4.2.
#[must_use]
pub fn granularity_key(puid: &Puid, family: &str, window_dur: Option<&str>, method: &str) -> String {
    match window_dur {
        Some(wd) => join(&[&puid_prefix(puid), "thresholds", family, wd, method]),
        None => join(&[&puid_prefix(puid), "thresholds", family, method]),
    }
}

/// `<baseKey>::min[::<suffix>]` / `<baseKey>::max[::<suffix>]`.
#[must_use]
pub fn leaf_key(base_key: &str, bound: &str, suffix: Option<&str>) -> String {
    match suffix {
        Some(s) => format!("{base_key}::{bound}::{s}"),
        None => format!("{base_key}::{bound}"),
    }
}

/// `<PUID>::thresholds::null::aggregate::<windowDuration>`.
#[must_use]
pub fn null_aggregate_key(puid: &Puid, window_dur: &str) -> String {
    join(&[&puid_prefix(puid), "thresholds", "null", "aggregate", window_dur])
}

/// `<PUID>::thresholds::null::consecutive`.
#[must_use]
pub fn null_consecutive_key(puid: &Puid) -> String {
    join(&[&puid_prefix(puid), "thresholds", "null", "consecutive"])
}

/// `<feature>::meta::identity` → enumerated identity check names.
#[must_use]
pub fn meta_identity_names_key(feature: &str) -> String {
    join(&[feature, "meta", "identity"])
}

/// `<feature>::meta::identity::<name>` → enumerated affected PUID triples.
#[must_use]
pub fn meta_identity_set_key(feature: &str, name: &str) -> String {
    join(&[feature, "meta", "identity", name])
}

/// `<feature>::meta::value` → enumerated value check names.
#[must_use]
pub fn meta_value_names_key(feature: &str) -> String {
    join(&[feature, "meta", "value"])
}

#[cfg(test)]
mod tests {
    use super::*;

    fn puid() -> Puid {
        Puid::new("A", "B", "C")
    }

    #[test]
    fn methods_key_has_no_stray_separators() {
        assert_eq!(methods_key(&puid(), "range"), "A::B::C::thresholds::range");
    }

    #[test]
    fn granularity_key_without_window_duration() {
        assert_eq!(
            granularity_key(&puid(), "range", None, "m1"),
            "A::B::C::thresholds::range::m1"
        );
    }

    #[test]
    fn granularity_key_with_window_duration_for_sigma() {
        assert_eq!(
            granularity_key(&puid(), "sigma", Some("1h"), "m1"),
            "A::B::C::thresholds::sigma::1h::m1"
        );
    }

    #[test]
    fn leaf_key_single_has_no_suffix() {
        assert_eq!(
            leaf_key("A::B::C::thresholds::range::m1", "max", None),
            "A::B::C::thresholds::range::m1::max"
        );
    }

    #[test]
    fn leaf_key_with_suffix() {
        assert_eq!(
            leaf_key("A::B::C::thresholds::range::m1", "max", Some("2024-03")),
            "A::B::C::thresholds::range::m1::max::2024-03"
        );
    }

    #[test]
    fn meta_keys() {
        assert_eq!(meta_identity_names_key("F"), "F::meta::identity");
        assert_eq!(
            meta_identity_set_key("F", "notcleaned"),
            "F::meta::identity::notcleaned"
        );
        assert_eq!(meta_value_names_key("F"), "F::meta::value");
    }

    #[test]
    fn null_keys() {
        assert_eq!(
            null_aggregate_key(&puid(), "1h"),
            "A::B::C::thresholds::null::aggregate::1h"
        );
        assert_eq!(
            null_consecutive_key(&puid()),
            "A::B::C::thresholds::null::consecutive"
        );
    }
}

//! Metadata identity and value checks (point) — spec §4.8.

use crate::model::{QcOutcomeQuantitative, SemanticObservation, Verdict};
use crate::registry::{keys, Registry};
use crate::threshold::TEST_ID_ROOT;

use super::CheckEvent;

/// Evaluate every active identity check against `obs`. Emits one outcome
/// per identity name registered for the observation's feature, regardless
/// of whether the PUID is in the affected set (fail) or not (pass).
pub async fn evaluate_identity<R: Registry>(
    obs: &SemanticObservation,
    registry: &R,
) -> Vec<CheckEvent> {
    let names_key = keys::meta_identity_names_key(&obs.puid.feature);
    let Some(names_value) = registry.get(&names_key).await else {
        return Vec::new();
    };

    let mut events = Vec::new();
    for name in names_value.split("::").filter(|n| !n.is_empty()) {
        let set_key = keys::meta_identity_set_key(&obs.puid.feature, name);
        let Some(set_value) = registry.get(&set_key).await else {
            continue;
        };

        let affected = set_value.split("::").any(|triple| {
            let mut parts = triple.splitn(3, ',');
            let (Some(f), Some(p), Some(o)) = (parts.next(), parts.next(), parts.next()) else {
                return false;
            };
            f == obs.puid.feature && p == obs.puid.procedure && o == obs.puid.observableproperty
        });

        let (outcome, quantitative_value) = if affected {
            (Verdict::Fail, 1.0)
        } else {
            (Verdict::Pass, 0.0)
        };

        events.push(CheckEvent::Outcome(QcOutcomeQuantitative {
            puid: obs.puid.clone(),
            instant: obs.instant(),
            test_id: format!("{TEST_ID_ROOT}/meta/identity/{name}"),
            outcome,
            quantitative_value,
        }));
    }
    events
}

/// Evaluate every active value check against `obs`.
///
/// Per spec §4.8, the subject of comparison is an associated system reading
/// (e.g. battery voltage), not the observation's own value; that reading is
/// not yet wired into the pipeline, so this always reports a passing
/// outcome with zero deviation — active failure modes are future work.
pub async fn evaluate_value<R: Registry>(
    obs: &SemanticObservation,
    registry: &R,
) -> Vec<CheckEvent> {
    let names_key = keys::meta_value_names_key(&obs.puid.feature);
    let Some(names_value) = registry.get(&names_key).await else {
        return Vec::new();
    };

    let mut events = Vec::new();
    for name in names_value.split("::").filter(|n| !n.is_empty()) {
        let methods_key = format!("{name}::thresholds::range");
        let Some(methods_value) = registry.get(&methods_key).await else {
            continue;
        };
        for method in methods_value.split("::").filter(|m| !m.is_empty()) {
            events.push(CheckEvent::Outcome(QcOutcomeQuantitative {
                puid: obs.puid.clone(),
                instant: obs.instant(),
                test_id: format!("{TEST_ID_ROOT}/meta/value/{name}/{method}"),
                outcome: Verdict::Pass,
                quantitative_value: 0.0,
            }));
        }
    }
    events
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use crate::model::{ObservationType, Puid};
    use crate::registry::InMemoryRegistry;

    use super::*;

    fn obs() -> SemanticObservation {
        SemanticObservation {
            puid: Puid::new("F", "P", "O"),
            phenomenon_time_start: 0,
            phenomenon_time_end: 0,
            observation_type: ObservationType::Numerical,
            numeric_value: Some(1.0),
            categoric_value: None,
            quality: 0,
            accuracy: 0,
            status: String::new(),
            processing: String::new(),
            uncertml: String::new(),
            comment: String::new(),
            location: String::new(),
            parameters: String::new(),
        }
    }

    #[tokio::test]
    async fn identity_fails_for_enumerated_puid() {
        let registry = InMemoryRegistry::new(HashMap::from([
            ("F::meta::identity".to_string(), "notcleaned".to_string()),
            (
                "F::meta::identity::notcleaned".to_string(),
                "F,P,O".to_string(),
            ),
        ]));
        let events = evaluate_identity(&obs(), &registry).await;
        assert_eq!(events.len(), 1);
        let CheckEvent::Outcome(o) = &events[0] else {
            panic!("expected outcome")
        };
        assert_eq!(o.outcome, Verdict::Fail);
        assert_eq!(o.test_id, "http://placeholder.catalogue.ceh.ac.uk/qc/meta/identity/notcleaned");
    }

    #[tokio::test]
    async fn identity_passes_for_unenumerated_puid() {
        let registry = InMemoryRegistry::new(HashMap::from([
            ("F::meta::identity".to_string(), "notcleaned".to_string()),
            (
                "F::meta::identity::notcleaned".to_string(),
                "X,Y,Z".to_string(),
            ),
        ]));
        let events = evaluate_identity(&obs(), &registry).await;
        assert_eq!(events.len(), 1);
        let CheckEvent::Outcome(o) = &events[0] else {
            panic!("expected outcome")
        };
        assert_eq!(o.outcome, Verdict::Pass);
    }

    #[tokio::test]
    async fn value_check_always_passes_today() {
        let registry = InMemoryRegistry::new(HashMap::from([
            ("F::meta::value".to_string(), "battery".to_string()),
            ("battery::thresholds::range".to_string(), "m1".to_string()),
        ]));
        let events = evaluate_value(&obs(), &registry).await;
        assert_eq!(events.len(), 1);
        let CheckEvent::Outcome(o) = &events[0] else {
            panic!("expected outcome")
        };
        assert_eq!(o.outcome, Verdict::Pass);
        assert_eq!(o.quantitative_value, 0.0);
    }
}

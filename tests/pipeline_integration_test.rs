//! End-to-end pipeline integration tests.
//!
//! Drives `pipeline::process_observation` over sequences of observations
//! against an in-memory registry, matching the worked scenarios in the
//! engine's spec (range fail-high, null-consecutive edge-trigger, delta
//! spike, sigma window closure). No backing store required.
//!
//! Run with: `cargo test --test pipeline_integration_test`

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;

use sensorqc_engine::emit::Sink;
use sensorqc_engine::model::{
    ObservationType, Puid, QcEvent, QcOutcomeQuantitative, SemanticObservation, Verdict,
};
use sensorqc_engine::pipeline::{self, PartitionStore};
use sensorqc_engine::registry::InMemoryRegistry;
use sensorqc_engine::telemetry::{Metrics, RateLimitedWarnings};

/// Captures every emitted outcome/event for assertion.
#[derive(Default)]
struct RecordingSink {
    outcomes: Mutex<Vec<QcOutcomeQuantitative>>,
    events: Mutex<Vec<QcEvent>>,
}

#[async_trait]
impl Sink for RecordingSink {
    async fn emit_outcome(&self, outcome: QcOutcomeQuantitative) {
        self.outcomes.lock().unwrap().push(outcome);
    }

    async fn emit_event(&self, event: QcEvent) {
        self.events.lock().unwrap().push(event);
    }
}

fn numeric_obs(puid: &Puid, instant: i64, value: f64) -> SemanticObservation {
    SemanticObservation {
        puid: puid.clone(),
        phenomenon_time_start: instant,
        phenomenon_time_end: instant,
        observation_type: ObservationType::Numerical,
        numeric_value: Some(value),
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

fn null_obs(puid: &Puid, instant: i64) -> SemanticObservation {
    SemanticObservation {
        numeric_value: None,
        ..numeric_obs(puid, instant, 0.0)
    }
}

#[tokio::test]
async fn range_fail_high_matches_spec_scenario_one() {
    let puid = Puid::new("A", "B", "C");
    let registry = InMemoryRegistry::new(HashMap::from([
        ("A::B::C::thresholds::range".to_string(), "m1".to_string()),
        ("A::B::C::thresholds::range::m1".to_string(), "single".to_string()),
        ("A::B::C::thresholds::range::m1::max".to_string(), "100".to_string()),
        ("A::B::C::thresholds::range::m1::min".to_string(), "0".to_string()),
    ]));
    let sink = RecordingSink::default();
    let warnings = RateLimitedWarnings::new();
    let metrics = Metrics::new();
    let partitions = PartitionStore::new(3);

    pipeline::process_observation(
        numeric_obs(&puid, 1_000_000, 120.0),
        &registry,
        &sink,
        &warnings,
        &metrics,
        &partitions,
    )
    .await;

    let outcomes = sink.outcomes.lock().unwrap();
    let max_outcome = outcomes
        .iter()
        .find(|o| o.test_id.ends_with("/max"))
        .expect("max outcome emitted");
    assert_eq!(max_outcome.outcome, Verdict::Fail);
    assert_eq!(max_outcome.quantitative_value, 20.0);

    let min_outcome = outcomes
        .iter()
        .find(|o| o.test_id.ends_with("/min"))
        .expect("min outcome emitted");
    assert_eq!(min_outcome.outcome, Verdict::Pass);
    assert_eq!(min_outcome.quantitative_value, 0.0);
}

#[tokio::test]
async fn range_missing_registry_emits_nothing() {
    let puid = Puid::new("A", "B", "C");
    let registry = InMemoryRegistry::empty();
    let sink = RecordingSink::default();
    let warnings = RateLimitedWarnings::new();
    let metrics = Metrics::new();
    let partitions = PartitionStore::new(3);

    pipeline::process_observation(
        numeric_obs(&puid, 1_000_000, 50.0),
        &registry,
        &sink,
        &warnings,
        &metrics,
        &partitions,
    )
    .await;

    assert!(sink.outcomes.lock().unwrap().is_empty());
    assert!(sink.events.lock().unwrap().is_empty());
}

#[tokio::test]
async fn null_consecutive_fires_once_at_threshold_matching_spec_scenario_four() {
    let puid = Puid::new("A", "B", "C");
    let registry = InMemoryRegistry::new(HashMap::from([(
        "A::B::C::thresholds::null::consecutive".to_string(),
        "3".to_string(),
    )]));
    let sink = RecordingSink::default();
    let warnings = RateLimitedWarnings::new();
    let metrics = Metrics::new();
    let partitions = PartitionStore::new(3);

    let sequence = [
        numeric_obs(&puid, 0, 1.0),
        null_obs(&puid, 1),
        null_obs(&puid, 2),
        null_obs(&puid, 3),
        null_obs(&puid, 4),
        numeric_obs(&puid, 5, 1.0),
    ];

    for obs in sequence {
        pipeline::process_observation(obs, &registry, &sink, &warnings, &metrics, &partitions)
            .await;
    }

    let events = sink.events.lock().unwrap();
    let null_run_events: Vec<_> = events
        .iter()
        .filter(|e| e.event_description.starts_with("Consecutive nulls"))
        .collect();
    assert_eq!(null_run_events.len(), 1);
    assert_eq!(null_run_events[0].event_description, "Consecutive nulls: 3");
}

#[tokio::test]
async fn delta_spike_matches_spec_scenario_six() {
    let puid = Puid::new("A", "B", "C");
    let registry = InMemoryRegistry::new(HashMap::from([
        ("A::B::C::thresholds::delta::spike".to_string(), "m1".to_string()),
        (
            "A::B::C::thresholds::delta::spike::m1".to_string(),
            "single".to_string(),
        ),
        (
            "A::B::C::thresholds::delta::spike::m1::max".to_string(),
            "10".to_string(),
        ),
    ]));
    let sink = RecordingSink::default();
    let warnings = RateLimitedWarnings::new();
    let metrics = Metrics::new();
    // Reorder depth 1 so every push advances immediately, in arrival order.
    let partitions = PartitionStore::new(1);

    for obs in [
        numeric_obs(&puid, 0, 10.0),
        numeric_obs(&puid, 1, 50.0),
        numeric_obs(&puid, 2, 10.0),
        numeric_obs(&puid, 3, 10.0),
    ] {
        pipeline::process_observation(obs, &registry, &sink, &warnings, &metrics, &partitions)
            .await;
    }

    let outcomes = sink.outcomes.lock().unwrap();
    let spike = outcomes
        .iter()
        .find(|o| o.test_id.contains("spike"))
        .expect("spike outcome emitted");
    assert_eq!(spike.outcome, Verdict::Fail);
    assert_eq!(spike.quantitative_value, 70.0);
    assert_eq!(spike.instant, 1);
}

#[tokio::test]
async fn sigma_window_closure_emits_one_outcome_per_observation() {
    let puid = Puid::new("A", "B", "C");
    const ONE_HOUR_MS: i64 = 3_600_000;
    let registry = InMemoryRegistry::new(HashMap::from([
        ("A::B::C::thresholds::sigma".to_string(), "m1".to_string()),
        (
            "A::B::C::thresholds::sigma::1h::m1".to_string(),
            "single".to_string(),
        ),
        (
            "A::B::C::thresholds::sigma::1h::m1::max".to_string(),
            "0".to_string(),
        ),
    ]));
    let sink = RecordingSink::default();
    let warnings = RateLimitedWarnings::new();
    let metrics = Metrics::new();
    let partitions = PartitionStore::new(3);

    // Two observations within the first 1h bucket, then one in the next
    // bucket to close the first window and trigger evaluation.
    for obs in [
        numeric_obs(&puid, 0, 1.0),
        numeric_obs(&puid, 1, 2.0),
        numeric_obs(&puid, ONE_HOUR_MS, 3.0),
    ] {
        pipeline::process_observation(obs, &registry, &sink, &warnings, &metrics, &partitions)
            .await;
    }

    let outcomes = sink.outcomes.lock().unwrap();
    let sigma_outcomes: Vec<_> = outcomes.iter().filter(|o| o.test_id.contains("sigma")).collect();
    // The closed window held exactly the first two observations.
    assert_eq!(sigma_outcomes.len(), 2);
    assert!(sigma_outcomes.iter().all(|o| o.outcome == Verdict::Fail));
}

#[tokio::test]
async fn meta_identity_fails_for_enumerated_puid() {
    let puid = Puid::new("F", "P", "O");
    let registry = InMemoryRegistry::new(HashMap::from([
        ("F::meta::identity".to_string(), "notcleaned".to_string()),
        (
            "F::meta::identity::notcleaned".to_string(),
            "F,P,O".to_string(),
        ),
    ]));
    let sink = RecordingSink::default();
    let warnings = RateLimitedWarnings::new();
    let metrics = Metrics::new();
    let partitions = PartitionStore::new(3);

    pipeline::process_observation(
        numeric_obs(&puid, 0, 1.0),
        &registry,
        &sink,
        &warnings,
        &metrics,
        &partitions,
    )
    .await;

    let outcomes = sink.outcomes.lock().unwrap();
    let identity = outcomes
        .iter()
        .find(|o| o.test_id.contains("meta/identity"))
        .expect("identity outcome emitted");
    assert_eq!(identity.outcome, Verdict::Fail);
}

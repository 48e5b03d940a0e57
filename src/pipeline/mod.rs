//! Pipeline: fans each incoming observation out to the stateless point
//! checks directly, and to the keyed stateful/windowed checks through
//! per-PUID state (spec §3 data flow, §5 concurrency model).

mod state;
pub mod window;

pub use state::PartitionStore;

use crate::checks::{self, CheckEvent};
use crate::emit::Sink;
use crate::model::SemanticObservation;
use crate::registry::Registry;
use crate::telemetry::{Metrics, RateLimitedWarnings};

/// Process one observation through every applicable check and emit the
/// resulting outcomes/events to `sink`. Never fails: a check that cannot
/// resolve its thresholds simply produces no events (spec §7).
pub async fn process_observation<R, S>(
    obs: SemanticObservation,
    registry: &R,
    sink: &S,
    warnings: &RateLimitedWarnings,
    metrics: &Metrics,
    partitions: &PartitionStore,
) where
    R: Registry,
    S: Sink,
{
    metrics.record_observation();

    let mut events = Vec::new();
    events.extend(checks::range::evaluate(&obs, registry, warnings).await);
    events.extend(checks::meta::evaluate_identity(&obs, registry).await);
    events.extend(checks::meta::evaluate_value(&obs, registry).await);

    let puid = obs.puid.clone();
    let keyed_events = partitions
        .with_state(&puid, |state| {
            let obs = obs.clone();
            let fut: futures::future::BoxFuture<'_, Vec<CheckEvent>> = Box::pin(async move {
                let mut events = Vec::new();

                events.extend(state.delta.push(obs.clone(), registry, warnings).await);
                events.extend(state.null_consecutive.push(&obs, registry, warnings).await);

                for closed in state.sigma_windows.push(obs.clone()) {
                    events.extend(
                        checks::sigma::evaluate_window(
                            closed.start,
                            closed.end,
                            &closed.observations,
                            registry,
                            warnings,
                        )
                        .await,
                    );
                }

                if obs.is_null() {
                    for closed in state.null_windows.push(obs.clone()) {
                        let null_count = closed.observations.len() as u64;
                        events.extend(
                            checks::null_aggregate::evaluate_window(
                                &obs.puid,
                                closed.start,
                                closed.end,
                                null_count,
                                registry,
                                warnings,
                            )
                            .await,
                        );
                    }
                }

                events
            });
            fut
        })
        .await;
    events.extend(keyed_events);

    for event in events {
        match event {
            CheckEvent::Outcome(outcome) => {
                metrics.record_outcome();
                sink.emit_outcome(outcome).await;
            }
            CheckEvent::Event(qc_event) => {
                metrics.record_event();
                sink.emit_event(qc_event).await;
            }
        }
    }
}

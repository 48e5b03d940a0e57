//! Delta checks (point, numeric, ordered) — spec §4.4.
//!
//! Per-PUID state over the last few numeric observations. Out-of-order
//! arrivals are absorbed by a bounded reorder buffer (default depth 3):
//! observations are held and sorted by `phenomenonTimeStart`, then advanced
//! oldest-first once the buffer is full. An observation that arrives so
//! late it would immediately be the oldest entry in an already-full buffer
//! is dropped rather than advanced (spec §4.4: "displaced beyond the
//! buffer").

use std::collections::VecDeque;

use crate::model::{QcOutcomeQuantitative, SemanticObservation, Verdict};
use crate::registry::Registry;
use crate::telemetry::RateLimitedWarnings;
use crate::threshold::{self, ThresholdFamily};

use super::CheckEvent;

/// Per-PUID delta-check state. Lives for the lifetime of one keyed
/// partition; not shared across PUIDs.
pub struct DeltaState {
    pending: VecDeque<SemanticObservation>,
    history: VecDeque<SemanticObservation>,
    capacity: usize,
}

impl DeltaState {
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        Self {
            pending: VecDeque::new(),
            history: VecDeque::new(),
            capacity,
        }
    }

    /// Feed one observation through the reorder buffer and evaluate step
    /// and spike for whatever became newly advanceable. Non-numeric
    /// observations are not delta-eligible and produce no events here.
    pub async fn push<R: Registry>(
        &mut self,
        obs: SemanticObservation,
        registry: &R,
        warnings: &RateLimitedWarnings,
    ) -> Vec<CheckEvent> {
        if obs.numeric().is_none() {
            return Vec::new();
        }

        let pos = self
            .pending
            .iter()
            .position(|o| o.instant() > obs.instant())
            .unwrap_or(self.pending.len());
        self.pending.insert(pos, obs);

        let mut events = Vec::new();
        if self.pending.len() > self.capacity {
            if pos == 0 {
                // Arrived older than everything already buffered at
                // capacity: dropped, never advanced.
                self.pending.pop_front();
            } else {
                let advanced = self.pending.pop_front().expect("just checked len > capacity");
                events.extend(self.advance(advanced, registry, warnings).await);
            }
        }
        events
    }

    async fn advance<R: Registry>(
        &mut self,
        obs: SemanticObservation,
        registry: &R,
        warnings: &RateLimitedWarnings,
    ) -> Vec<CheckEvent> {
        self.history.push_back(obs);
        if self.history.len() > 3 {
            self.history.pop_front();
        }

        let mut events = Vec::new();
        events.extend(self.evaluate_step(registry, warnings).await);
        events.extend(self.evaluate_spike(registry, warnings).await);
        events
    }

    async fn evaluate_step<R: Registry>(
        &self,
        registry: &R,
        warnings: &RateLimitedWarnings,
    ) -> Vec<CheckEvent> {
        let len = self.history.len();
        if len < 2 {
            return Vec::new();
        }
        let prev = &self.history[len - 2];
        let curr = &self.history[len - 1];
        let Some(p) = prev.numeric() else { return Vec::new() };
        let Some(c) = curr.numeric() else { return Vec::new() };
        let diff = (c - p).abs();

        let methods = threshold::resolve(
            registry,
            warnings,
            &curr.puid,
            ThresholdFamily::DeltaStep,
            curr.instant(),
        )
        .await;

        methods
            .iter()
            .filter_map(|m| m.max_f64().map(|max| (m, max)))
            .map(|(m, max)| magnitude_outcome(curr, m, diff, max))
            .collect()
    }

    async fn evaluate_spike<R: Registry>(
        &self,
        registry: &R,
        warnings: &RateLimitedWarnings,
    ) -> Vec<CheckEvent> {
        let len = self.history.len();
        if len < 3 {
            return Vec::new();
        }
        let prev = &self.history[len - 3];
        let curr = &self.history[len - 2];
        let next = &self.history[len - 1];
        let (Some(p), Some(c), Some(n)) = (prev.numeric(), curr.numeric(), next.numeric()) else {
            return Vec::new();
        };
        let diff = (2.0 * c - p - n).abs();

        let methods = threshold::resolve(
            registry,
            warnings,
            &curr.puid,
            ThresholdFamily::DeltaSpike,
            curr.instant(),
        )
        .await;

        methods
            .iter()
            .filter_map(|m| m.max_f64().map(|max| (m, max)))
            .map(|(m, max)| magnitude_outcome(curr, m, diff, max))
            .collect()
    }
}

fn magnitude_outcome(
    obs: &SemanticObservation,
    method: &threshold::ResolvedMethod,
    magnitude: f64,
    max: f64,
) -> CheckEvent {
    let (outcome, quantitative_value) = if magnitude > max {
        (Verdict::Fail, magnitude - max)
    } else {
        (Verdict::Pass, 0.0)
    };
    CheckEvent::Outcome(QcOutcomeQuantitative {
        puid: obs.puid.clone(),
        instant: obs.instant(),
        test_id: method.test_id("max"),
        outcome,
        quantitative_value,
    })
}

//! Semantic Observation Model
//!
//! The canonical in-flight record each operator consumes and produces, plus
//! the QC outcome/event records the check operators emit. See spec §3.

use serde::{Deserialize, Serialize};

/// Sentinel value on the wire that signals a null numeric observation.
pub const NOT_A_VALUE: &str = "NotAValue";

/// Procedure Unique IDentifier — the (feature, procedure, observableproperty)
/// triple used to key every registry lookup and stream partition.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Puid {
    pub feature: String,
    pub procedure: String,
    pub observableproperty: String,
}

impl Puid {
    #[must_use]
    pub fn new(
        feature: impl Into<String>,
        procedure: impl Into<String>,
        observableproperty: impl Into<String>,
    ) -> Self {
        Self {
            feature: feature.into(),
            procedure: procedure.into(),
            observableproperty: observableproperty.into(),
        }
    }
}

impl std::fmt::Display for Puid {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}::{}::{}",
            self.feature, self.procedure, self.observableproperty
        )
    }
}

/// Observation payload kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ObservationType {
    Numerical,
    Categorical,
}

/// The canonical, immutable in-flight record.
///
/// A numeric observation whose wire value equals [`NOT_A_VALUE`] is
/// represented here as `numeric_value: None` — a "null observation". Null
/// observations still flow through metadata and null-tracking checks; they
/// are skipped by every numeric check (range, delta, sigma).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SemanticObservation {
    pub puid: Puid,

    /// Epoch milliseconds, UTC.
    pub phenomenon_time_start: i64,
    /// Epoch milliseconds, UTC.
    pub phenomenon_time_end: i64,

    pub observation_type: ObservationType,
    pub numeric_value: Option<f64>,
    pub categoric_value: Option<String>,

    /// Opaque processing trail. Preserved and forwarded unchanged; the core
    /// never inspects these fields.
    pub quality: i32,
    pub accuracy: i32,
    pub status: String,
    pub processing: String,
    pub uncertml: String,
    pub comment: String,
    pub location: String,
    pub parameters: String,
}

impl SemanticObservation {
    /// Year of `phenomenon_time_start`, UTC.
    #[must_use]
    pub fn year(&self) -> i32 {
        crate::time::millis_to_utc(self.phenomenon_time_start).year()
    }

    /// Month (1-12) of `phenomenon_time_start`, UTC.
    #[must_use]
    pub fn month(&self) -> u32 {
        crate::time::millis_to_utc(self.phenomenon_time_start).month()
    }

    /// A null observation: well-formed, but with no numeric payload.
    #[must_use]
    pub fn is_null(&self) -> bool {
        self.observation_type == ObservationType::Numerical && self.numeric_value.is_none()
    }

    /// `true` if this is a numeric observation with a present value —
    /// the only kind eligible for numeric checks (range, delta, sigma).
    #[must_use]
    pub fn numeric(&self) -> Option<f64> {
        if self.observation_type == ObservationType::Numerical {
            self.numeric_value
        } else {
            None
        }
    }

    /// The instant checks should use when resolving thresholds for this
    /// observation: `phenomenon_time_start`, which spec §3 guarantees lies
    /// within `[phenomenonTimeStart, phenomenonTimeEnd]` by construction.
    #[must_use]
    pub fn instant(&self) -> i64 {
        self.phenomenon_time_start
    }
}

use chrono::Datelike as _;

/// Pass/fail verdict of a quantitative QC outcome.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Verdict {
    Pass,
    Fail,
}

impl Verdict {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pass => "pass",
            Self::Fail => "fail",
        }
    }
}

/// A per-observation quantitative pass/fail record against a specific test.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QcOutcomeQuantitative {
    pub puid: Puid,
    /// Epoch milliseconds, UTC. Lies within the originating observation's
    /// `[phenomenonTimeStart, phenomenonTimeEnd]` (spec §3 invariant).
    pub instant: i64,
    pub test_id: String,
    pub outcome: Verdict,
    /// Signed deviation from the violated bound; zero for `pass`.
    pub quantitative_value: f64,
}

/// A window-scoped anomaly record not attributable to a single observation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QcEvent {
    pub puid: Puid,
    pub event_description: String,
    /// Epoch milliseconds, UTC. `window_start <= window_end` always holds.
    pub window_start: i64,
    pub window_end: i64,
}

impl QcEvent {
    /// Construct a window event, asserting the spec §3 ordering invariant.
    #[must_use]
    pub fn new(puid: Puid, event_description: String, window_start: i64, window_end: i64) -> Self {
        debug_assert!(
            window_start <= window_end,
            "window_start must not exceed window_end"
        );
        Self {
            puid,
            event_description,
            window_start,
            window_end,
        }
    }
}

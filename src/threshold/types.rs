//! Types shared between the threshold resolver and the checks that consume
//! its output (spec §4.2).

use crate::time::{Granularity, WindowDuration};

/// Root of every emitted test identifier (spec §6).
pub const TEST_ID_ROOT: &str = "http://placeholder.catalogue.ceh.ac.uk/qc";

/// The families the resolver knows how to look up. Sigma carries the window
/// duration bucket because its registry keys and test ids are bucketed by it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ThresholdFamily {
    Range,
    DeltaStep,
    DeltaSpike,
    Sigma(WindowDuration),
}

impl ThresholdFamily {
    /// Colon-joined family segment used in registry keys.
    #[must_use]
    pub fn key_segment(self) -> &'static str {
        match self {
            Self::Range => "range",
            Self::DeltaStep => "delta::step",
            Self::DeltaSpike => "delta::spike",
            Self::Sigma(_) => "sigma",
        }
    }

    /// `Some(windowDuration)` only for the sigma family, where the
    /// granularity lookup is additionally keyed by window duration.
    #[must_use]
    pub fn window_duration(self) -> Option<WindowDuration> {
        match self {
            Self::Sigma(wd) => Some(wd),
            _ => None,
        }
    }

    /// Slash-joined family segment used in emitted test ids.
    #[must_use]
    pub fn test_id_segment(self) -> String {
        match self {
            Self::Range => "range".to_string(),
            Self::DeltaStep => "delta/step".to_string(),
            Self::DeltaSpike => "delta/spike".to_string(),
            Self::Sigma(wd) => format!("sigma/{}", wd.as_str()),
        }
    }
}

/// A single resolved threshold method, independent of which bound(s) were
/// actually present in the registry.
#[derive(Debug, Clone)]
pub struct ResolvedMethod {
    pub method: String,
    /// Everything before the trailing `/min` or `/max` of the test id.
    pub test_id_base: String,
    pub granularity: Granularity,
    pub min: Option<String>,
    pub max: Option<String>,
}

impl ResolvedMethod {
    #[must_use]
    pub fn test_id(&self, bound: &str) -> String {
        format!("{}/{bound}", self.test_id_base)
    }

    /// Parse `min` as a float, or `None` if absent or malformed.
    #[must_use]
    pub fn min_f64(&self) -> Option<f64> {
        self.min.as_deref().and_then(|s| s.parse().ok())
    }

    /// Parse `max` as a float, or `None` if absent or malformed.
    #[must_use]
    pub fn max_f64(&self) -> Option<f64> {
        self.max.as_deref().and_then(|s| s.parse().ok())
    }
}

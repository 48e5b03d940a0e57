//! Outcome/event emission boundary.
//!
//! No retry and no exactly-once delivery guarantee (out of scope, spec §1
//! non-goals); a sink is a best-effort sideways write, same as the logging
//! sink below.

use async_trait::async_trait;
use tracing::info;

use crate::model::{QcEvent, QcOutcomeQuantitative};

/// Destination for emitted QC outcomes and events.
#[async_trait]
pub trait Sink: Send + Sync {
    async fn emit_outcome(&self, outcome: QcOutcomeQuantitative);
    async fn emit_event(&self, event: QcEvent);
}

/// Structured-log sink: every outcome and event is logged at info level.
/// Suitable as the default sink and as a drop-in audit trail alongside a
/// real downstream sink.
#[derive(Debug, Default, Clone, Copy)]
pub struct LoggingSink;

#[async_trait]
impl Sink for LoggingSink {
    async fn emit_outcome(&self, outcome: QcOutcomeQuantitative) {
        info!(
            puid = %outcome.puid,
            instant = outcome.instant,
            test_id = %outcome.test_id,
            outcome = outcome.outcome.as_str(),
            quantitative_value = outcome.quantitative_value,
            "qc outcome"
        );
    }

    async fn emit_event(&self, event: QcEvent) {
        info!(
            puid = %event.puid,
            description = %event.event_description,
            window_start = event.window_start,
            window_end = event.window_end,
            "qc event"
        );
    }
}

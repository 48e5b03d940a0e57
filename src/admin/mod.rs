//! Admin/health HTTP surface (spec §10.3): liveness, readiness, and a
//! metrics snapshot. Deliberately thin compared to a full observability
//! stack — the spec's non-goals exclude an external metrics pipeline, but
//! an operable service still needs something an orchestrator can probe.

use std::sync::Arc;

use axum::extract::State;
use axum::routing::get;
use axum::{Json, Router};
use serde::Serialize;
use tower_http::trace::TraceLayer;

use crate::registry::Registry;
use crate::telemetry::{Metrics, MetricsSnapshot};

/// Shared state for the admin router.
pub struct AdminState<R> {
    pub registry: Arc<R>,
    pub metrics: Arc<Metrics>,
}

impl<R> Clone for AdminState<R> {
    fn clone(&self) -> Self {
        Self {
            registry: Arc::clone(&self.registry),
            metrics: Arc::clone(&self.metrics),
        }
    }
}

#[derive(Debug, Serialize)]
struct ReadinessResponse {
    ready: bool,
}

/// Build the admin router. Mounted standalone, not nested under the main
/// application router, since this engine has no other public HTTP surface.
pub fn router<R>(state: AdminState<R>) -> Router
where
    R: Registry + 'static,
{
    Router::new()
        .route("/healthz", get(liveness))
        .route("/readyz", get(readiness::<R>))
        .route("/metrics", get(metrics::<R>))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn liveness() -> &'static str {
    "ok"
}

/// Ready iff a registry lookup succeeds at all — absence of the probed key
/// is expected and still counts as reachable; only a backend that never
/// responds indicates not-ready. We cannot distinguish those cases through
/// the total `Registry::get` contract, so readiness here simply confirms
/// the call completes.
async fn readiness<R: Registry>(State(state): State<AdminState<R>>) -> Json<ReadinessResponse> {
    let _ = state.registry.get("__readiness_probe__").await;
    Json(ReadinessResponse { ready: true })
}

async fn metrics<R: Registry>(State(state): State<AdminState<R>>) -> Json<MetricsSnapshot> {
    Json(state.metrics.snapshot())
}

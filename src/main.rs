//! `SensorQC` Engine - Main Entry Point
//!
//! Streaming quality-control evaluation engine for environmental sensor
//! observations.

use anyhow::Result;
use std::sync::Arc;
use tracing::info;

use sensorqc_engine::admin;
use sensorqc_engine::config::Config;
use sensorqc_engine::emit::LoggingSink;
use sensorqc_engine::ingest;
use sensorqc_engine::pipeline::{self, PartitionStore};
use sensorqc_engine::registry::{CachedRegistry, RedisRegistry};
use sensorqc_engine::telemetry::{Metrics, RateLimitedWarnings};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "sensorqc_engine=debug".into()),
        )
        .json()
        .init();

    // Load configuration
    dotenvy::dotenv().ok();
    let config = Config::from_env()?;

    info!(
        version = env!("CARGO_PKG_VERSION"),
        "Starting SensorQC Engine"
    );

    // Connect to the registry backend and wrap it with a bounded, TTL-bounded
    // local cache (spec §5: "a local cache with TTL at most 60 seconds").
    let backend =
        RedisRegistry::connect(&config.registry_url, config.registry_timeout_ms).await?;
    info!(url = %config.registry_url, "Registry backend connected");
    let registry = Arc::new(CachedRegistry::new(
        backend,
        config.registry_cache_capacity,
        config.registry_cache_ttl_secs,
    ));

    let sink = Arc::new(LoggingSink);
    let metrics = Arc::new(Metrics::new());
    let warnings = Arc::new(RateLimitedWarnings::new());
    let partitions = Arc::new(PartitionStore::new(config.delta_reorder_buffer_depth));

    // Admin/health surface (liveness, readiness, metrics snapshot).
    let admin_state = admin::AdminState {
        registry: Arc::clone(&registry),
        metrics: Arc::clone(&metrics),
    };
    let admin_router = admin::router(admin_state);
    let listener = tokio::net::TcpListener::bind(&config.bind_address).await?;
    info!(address = %config.bind_address, "Admin surface listening");

    let shutdown_signal = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install CTRL+C signal handler");
        info!("Received shutdown signal, cleaning up...");
    };

    let admin_server = axum::serve(listener, admin_router).with_graceful_shutdown(shutdown_signal);

    // Raw CSV ingestion and delivery transport are external collaborators
    // (spec §1 non-goals); here the observation stream is read from stdin,
    // one well-formed record at a time, and fanned through the evaluation
    // engine sequentially. A production deployment would replace this
    // ingestion loop with a message-bus consumer without touching the
    // pipeline itself.
    let ingestion = async {
        let observations = ingest::read_all(std::io::stdin());
        info!(count = observations.len(), "Ingested observation batch");
        for obs in observations {
            pipeline::process_observation(
                obs,
                registry.as_ref(),
                sink.as_ref(),
                &warnings,
                &metrics,
                &partitions,
            )
            .await;
        }
        info!(
            partitions = partitions.partition_count(),
            "Finished evaluating observation batch"
        );
    };

    tokio::select! {
        result = admin_server => {
            result?;
        }
        () = ingestion => {
            info!("Observation stream exhausted");
        }
    }

    info!("Engine shutdown complete");

    Ok(())
}

//! Engine Configuration
//!
//! Loads configuration from environment variables.

use anyhow::{Context, Result};
use std::env;

/// Engine configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    /// Admin/health surface bind address (e.g., "0.0.0.0:8081").
    pub bind_address: String,

    /// Registry backend (key-value store) connection URL.
    pub registry_url: String,

    /// Per-call registry lookup timeout, in milliseconds (§5, default 2s).
    pub registry_timeout_ms: u64,

    /// Local registry cache capacity (max distinct keys held at once).
    pub registry_cache_capacity: u64,

    /// Local registry cache entry TTL, in seconds (§5: "TTL ≤ 60s").
    pub registry_cache_ttl_secs: u64,

    /// Reorder-buffer depth for delta checks (§4.4, default 3).
    pub delta_reorder_buffer_depth: usize,

    /// Logging verbosity / `tracing_subscriber::EnvFilter` directive.
    pub log_filter: String,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self> {
        Ok(Self {
            bind_address: env::var("BIND_ADDRESS").unwrap_or_else(|_| "0.0.0.0:8081".into()),
            registry_url: env::var("REGISTRY_URL").context("REGISTRY_URL must be set")?,
            registry_timeout_ms: env::var("REGISTRY_TIMEOUT_MS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(2_000),
            registry_cache_capacity: env::var("REGISTRY_CACHE_CAPACITY")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(10_000),
            registry_cache_ttl_secs: env::var("REGISTRY_CACHE_TTL_SECS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(60),
            delta_reorder_buffer_depth: env::var("DELTA_REORDER_BUFFER_DEPTH")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(3),
            log_filter: env::var("RUST_LOG").unwrap_or_else(|_| "sensorqc_engine=debug".into()),
        })
    }

    /// Create a default configuration for testing.
    #[must_use]
    pub fn default_for_test() -> Self {
        Self {
            bind_address: "127.0.0.1:8081".into(),
            registry_url: "redis://localhost:6379".into(),
            registry_timeout_ms: 2_000,
            registry_cache_capacity: 10_000,
            registry_cache_ttl_secs: 60,
            delta_reorder_buffer_depth: 3,
            log_filter: "sensorqc_engine=debug".into(),
        }
    }
}

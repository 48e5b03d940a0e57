//! Registry client contract and backends (spec §4.1).
//!
//! `get` is total: a missing key, a malformed value, or a transient backend
//! failure are all indistinguishable to the caller and resolve to `None`.
//! Checks that depend on an absent threshold are skipped, never failed.

use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;
use fred::prelude::*;

use super::error::RegistryError;

/// Read-only key-value lookup used to resolve QC thresholds and metadata.
#[async_trait]
pub trait Registry: Send + Sync {
    /// Fetch the raw string value for `key`, or `None` if absent, malformed,
    /// or unreachable. Never returns an error to the caller.
    async fn get(&self, key: &str) -> Option<String>;
}

/// Redis-backed registry, built on `fred`.
pub struct RedisRegistry {
    client: RedisClient,
    /// Per-call lookup timeout (spec §5, default 2s); a call that does not
    /// resolve in time is treated as absent, same as any other failure mode.
    timeout: Duration,
}

impl RedisRegistry {
    /// Connect to the registry backend at `url`, with `timeout_ms` applied
    /// to every subsequent `get`.
    pub async fn connect(url: &str, timeout_ms: u64) -> Result<Self, RegistryError> {
        let config = RedisConfig::from_url(url)
            .map_err(|e| RegistryError::ConnectionFailed(e.to_string()))?;
        let client = RedisClient::new(config, None, None, None);
        client.connect();
        client
            .wait_for_connect()
            .await
            .map_err(|e| RegistryError::ConnectionFailed(e.to_string()))?;
        Ok(Self {
            client,
            timeout: Duration::from_millis(timeout_ms),
        })
    }

    /// `true` if the underlying connection is currently usable.
    #[must_use]
    pub fn is_connected(&self) -> bool {
        self.client.is_connected()
    }
}

#[async_trait]
impl Registry for RedisRegistry {
    async fn get(&self, key: &str) -> Option<String> {
        let fetch = self.client.get::<Option<String>, _>(key);
        match tokio::time::timeout(self.timeout, fetch).await {
            Ok(Ok(value)) => value,
            Ok(Err(e)) => {
                // Rate of occurrence is bounded by the caller's own
                // per-key-pattern warning budget (§10.2); log here only at
                // debug to avoid double-logging the same failure.
                tracing::debug!(key, error = %e, "registry get failed, treating as absent");
                None
            }
            Err(_) => {
                tracing::debug!(key, timeout_ms = self.timeout.as_millis(), "registry get timed out, treating as absent");
                None
            }
        }
    }
}

/// In-memory fake for tests, behind the same [`Registry`] trait as
/// production. Holds a fixed key-value map; never mutates itself.
#[derive(Debug, Default, Clone)]
pub struct InMemoryRegistry {
    values: HashMap<String, String>,
}

impl InMemoryRegistry {
    #[must_use]
    pub fn new(values: HashMap<String, String>) -> Self {
        Self { values }
    }

    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }
}

impl FromIterator<(String, String)> for InMemoryRegistry {
    fn from_iter<T: IntoIterator<Item = (String, String)>>(iter: T) -> Self {
        Self {
            values: iter.into_iter().collect(),
        }
    }
}

#[async_trait]
impl Registry for InMemoryRegistry {
    async fn get(&self, key: &str) -> Option<String> {
        self.values.get(key).cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn in_memory_registry_returns_present_value() {
        let reg = InMemoryRegistry::new(HashMap::from([("a::b".to_string(), "1.0".to_string())]));
        assert_eq!(reg.get("a::b").await, Some("1.0".to_string()));
    }

    #[tokio::test]
    async fn in_memory_registry_returns_none_for_absent_key() {
        let reg = InMemoryRegistry::empty();
        assert_eq!(reg.get("missing").await, None);
    }
}

//! Bounded, TTL-bounded local cache in front of a [`Registry`] backend
//! (spec §5: "a local cache with TTL at most 60 seconds").
//!
//! Grounded on the generation-counter pattern in the moderation filter
//! cache: entries carry the generation they were inserted under, and
//! `invalidate` bumps the counter so an in-flight fetch started before an
//! invalidation can never clobber it. Expiry here is time-based rather than
//! event-based, since thresholds have no invalidation signal of their own.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use dashmap::DashMap;

use super::client::Registry;

struct CachedValue {
    value: Option<String>,
    inserted_at: Instant,
    generation: u64,
}

/// Wraps any [`Registry`] with a bounded, time-expiring read-through cache.
pub struct CachedRegistry<R: Registry> {
    inner: R,
    entries: DashMap<String, CachedValue>,
    capacity: u64,
    ttl: Duration,
    generation: Arc<AtomicU64>,
}

impl<R: Registry> CachedRegistry<R> {
    #[must_use]
    pub fn new(inner: R, capacity: u64, ttl_secs: u64) -> Self {
        Self {
            inner,
            entries: DashMap::new(),
            capacity,
            ttl: Duration::from_secs(ttl_secs),
            generation: Arc::new(AtomicU64::new(0)),
        }
    }

    /// Drop every cached entry and make any fetch already in flight ineligible
    /// to populate the cache with stale data.
    pub fn invalidate_all(&self) {
        self.generation.fetch_add(1, Ordering::Release);
        self.entries.clear();
    }

    fn is_fresh(&self, entry: &CachedValue) -> bool {
        entry.generation == self.generation.load(Ordering::Acquire)
            && entry.inserted_at.elapsed() < self.ttl
    }
}

#[async_trait]
impl<R: Registry> Registry for CachedRegistry<R> {
    async fn get(&self, key: &str) -> Option<String> {
        if let Some(entry) = self.entries.get(key) {
            if self.is_fresh(&entry) {
                return entry.value.clone();
            }
        }

        let generation_before = self.generation.load(Ordering::Acquire);
        let value = self.inner.get(key).await;

        if self.generation.load(Ordering::Acquire) == generation_before {
            if self.entries.len() as u64 >= self.capacity && !self.entries.contains_key(key) {
                // At capacity: skip caching this miss rather than evict;
                // the entry simply falls through to the backend next time.
                return value;
            }
            self.entries.insert(
                key.to_string(),
                CachedValue {
                    value: value.clone(),
                    inserted_at: Instant::now(),
                    generation: generation_before,
                },
            );
        }

        value
    }
}

//! Per-PUID operator state store.
//!
//! One entry per partition key, accessed through `DashMap` for lock-free
//! concurrent access across partitions — the same pattern as the
//! generation-counted caches elsewhere in this engine. Spec §5 states there
//! is no shared mutable state *between* partitions; within a partition, a
//! `tokio::sync::Mutex` serializes the (rare, already-ordered) concurrent
//! access.

use std::sync::Arc;

use dashmap::DashMap;
use tokio::sync::Mutex;

use crate::checks::delta::DeltaState;
use crate::checks::null_consecutive::NullConsecutiveState;
use crate::model::Puid;

use super::window::TripleWindow;

/// All per-PUID state the windowed and stateful point checks need.
pub struct PuidState {
    pub delta: DeltaState,
    pub null_consecutive: NullConsecutiveState,
    pub sigma_windows: TripleWindow,
    pub null_windows: TripleWindow,
}

impl PuidState {
    fn new(delta_reorder_depth: usize) -> Self {
        Self {
            delta: DeltaState::new(delta_reorder_depth),
            null_consecutive: NullConsecutiveState::new(),
            sigma_windows: TripleWindow::new(),
            null_windows: TripleWindow::new(),
        }
    }
}

/// Keyed store of per-PUID operator state.
pub struct PartitionStore {
    states: DashMap<Puid, Arc<Mutex<PuidState>>>,
    delta_reorder_depth: usize,
}

impl PartitionStore {
    #[must_use]
    pub fn new(delta_reorder_depth: usize) -> Self {
        Self {
            states: DashMap::new(),
            delta_reorder_depth,
        }
    }

    /// Run `f` with exclusive access to `puid`'s state, creating it on
    /// first use.
    ///
    /// The `DashMap` entry is only held long enough to clone out the
    /// per-PUID `Arc`, so this shard's internal lock is released before we
    /// await the mutex — otherwise every other PUID hashing to the same
    /// shard would block on `entry()` for as long as `f` takes to run,
    /// including any registry I/O inside it.
    pub async fn with_state<F, T>(&self, puid: &Puid, f: F) -> T
    where
        F: for<'a> FnOnce(&'a mut PuidState) -> futures::future::BoxFuture<'a, T>,
    {
        let state = {
            let entry = self
                .states
                .entry(puid.clone())
                .or_insert_with(|| Arc::new(Mutex::new(PuidState::new(self.delta_reorder_depth))));
            Arc::clone(entry.value())
        };
        let mut guard = state.lock().await;
        f(&mut guard).await
    }

    #[must_use]
    pub fn partition_count(&self) -> usize {
        self.states.len()
    }
}

//! Double-buffered snapshots.
//!
//! The writer bakes into the spare buffer while readers keep using the
//! current one, then the two are swapped. Readers hold `Arc` clones, so a
//! swap never invalidates a snapshot someone is still looking at; if a
//! reader still holds the spare when the next bake comes around, a fresh
//! buffer is allocated instead of waiting.

use std::sync::Arc;

use tracing::debug;

use crate::export::ImmutableHierarchy;
use crate::node_store::NodeStore;

/// Current and spare snapshot of one store.
#[derive(Debug, Default)]
pub struct SnapshotBuffers {
    current: Arc<ImmutableHierarchy>,
    spare: Option<Arc<ImmutableHierarchy>>,
    bakes: u64,
}

impl SnapshotBuffers {
    /// Creates buffers with nothing baked yet.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the current snapshot.
    ///
    /// Empty until the first [`bake`](Self::bake).
    #[must_use]
    pub fn current(&self) -> Arc<ImmutableHierarchy> {
        Arc::clone(&self.current)
    }

    /// Returns the number of bakes that produced a new snapshot.
    #[must_use]
    pub fn bake_count(&self) -> u64 {
        self.bakes
    }

    /// Bakes `store` into the spare buffer and makes it current.
    ///
    /// Returns the current snapshot unchanged when it already reflects the
    /// store.
    pub fn bake(&mut self, store: &NodeStore) -> Arc<ImmutableHierarchy> {
        if self.current.is_current(store) {
            return self.current();
        }

        let mut spare = self.spare.take().unwrap_or_default();
        if Arc::get_mut(&mut spare).is_none() {
            debug!("spare snapshot still shared, allocating a new one");
            spare = Arc::default();
        }
        if let Some(target) = Arc::get_mut(&mut spare) {
            store.export_immutable(target, Some(&self.current));
        }

        self.spare = Some(std::mem::replace(&mut self.current, spare));
        self.bakes += 1;
        self.current()
    }
}

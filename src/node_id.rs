//! Lightweight unique identifier for nodes within a [`Graph`](crate::Graph).
//!
//! Each node created by the construction API is assigned a `NodeId` from a
//! process-wide counter. These are opaque handles--only the runner inspects
//! them directly, as the memoization key for shared sub-graphs.
//!
//! They’re small, `Copy`, and hashable, so they can be used efficiently as keys
//! in maps or sets when traversing a graph.

use std::sync::atomic::{AtomicU64, Ordering};

/// Unique numeric identifier for a node in a graph.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub struct NodeId(u64);

impl NodeId {
    /// Allocate the next identifier (used internally by the builders).
    pub(crate) fn fresh() -> Self {
        static NEXT: AtomicU64 = AtomicU64::new(0);
        Self(NEXT.fetch_add(1, Ordering::Relaxed))
    }

    /// Return the underlying numeric value.
    ///
    /// Useful mainly for debugging or serialization.
    pub fn raw(&self) -> u64 {
        self.0
    }
}

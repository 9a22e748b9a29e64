//! Best-first frontier with visited-set deduplication.
//!
//! Both collections are `BTreeSet`s (not `BinaryHeap`/`HashSet`): the open
//! list must be listed in rank order for every trace step, and ordered
//! iteration keeps serialized output deterministic.

use std::collections::BTreeSet;

use fifteen_kernel::board::grid::GridKey;

use crate::node::{FrontierKey, StateId};

/// Ranked open list plus the set of every configuration ever generated.
#[derive(Debug, Default)]
pub struct Frontier {
    open: BTreeSet<FrontierKey>,
    visited: BTreeSet<GridKey>,
    high_water: usize,
}

impl Frontier {
    /// Create a new empty frontier.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a configuration as discovered.
    ///
    /// Returns `false` if it was already visited. A key enters the set once,
    /// at first discovery, whether or not the state is later enqueued.
    pub fn mark_visited(&mut self, key: GridKey) -> bool {
        self.visited.insert(key)
    }

    #[must_use]
    pub fn is_visited(&self, key: GridKey) -> bool {
        self.visited.contains(&key)
    }

    /// Schedule a state for expansion.
    pub fn push(&mut self, key: FrontierKey) {
        self.open.insert(key);
        self.high_water = self.high_water.max(self.open.len());
    }

    /// Remove and return the best-ranked entry.
    pub fn pop(&mut self) -> Option<FrontierKey> {
        self.open.pop_first()
    }

    /// Open state ids in rank order.
    #[must_use]
    pub fn ids(&self) -> Vec<StateId> {
        self.open.iter().map(|k| k.id).collect()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.open.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.open.is_empty()
    }

    /// Number of distinct configurations discovered.
    #[must_use]
    pub fn visited_count(&self) -> usize {
        self.visited.len()
    }

    /// Largest open-list size observed.
    #[must_use]
    pub fn high_water(&self) -> usize {
        self.high_water
    }
}

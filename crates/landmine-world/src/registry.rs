//! Shared list of landmines spotted by the detectors.

use landmine_core::EntityId;
use std::collections::{HashSet, VecDeque};

/// Insertion-ordered set of detected landmines.
///
/// Detectors append, the destroyer reads the oldest entry and removes it once
/// the landmine is gone. An id is never present twice.
#[derive(Debug, Clone, Default)]
pub struct DetectionRegistry {
    order: VecDeque<EntityId>,
    members: HashSet<EntityId>,
}

impl DetectionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a landmine; returns false if it was already registered
    pub fn register(&mut self, id: EntityId) -> bool {
        if !self.members.insert(id) {
            return false;
        }
        self.order.push_back(id);
        true
    }

    pub fn contains(&self, id: EntityId) -> bool {
        self.members.contains(&id)
    }

    /// Oldest registered landmine
    pub fn first(&self) -> Option<EntityId> {
        self.order.front().copied()
    }

    /// Drop a landmine from the registry; returns false if it was absent
    pub fn remove(&mut self, id: EntityId) -> bool {
        if !self.members.remove(&id) {
            return false;
        }
        self.order.retain(|entry| *entry != id);
        true
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = EntityId> + '_ {
        self.order.iter().copied()
    }
}

//! Tag index - maps resident blocks to the slot holding them.

use std::collections::HashMap;

use crate::common::{SlotId, Tag};

/// Maps each resident [`Tag`] to its [`SlotId`].
///
/// Holds exactly the slots that are DIRTY, CLEAN or HIDDEN. Inserting a tag
/// that is already present, or removing one that is absent, means the
/// simulator lost track of a slot and panics.
#[derive(Debug, Default)]
pub struct TagIndex {
    map: HashMap<Tag, SlotId>,
}

impl TagIndex {
    /// Create an empty index sized for `capacity` slots.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            map: HashMap::with_capacity(capacity),
        }
    }

    /// Slot holding `tag`, if resident.
    #[inline]
    pub fn get(&self, tag: Tag) -> Option<SlotId> {
        self.map.get(&tag).copied()
    }

    /// True if `tag` is resident.
    #[inline]
    pub fn contains(&self, tag: Tag) -> bool {
        self.map.contains_key(&tag)
    }

    /// Register `tag` as held by `slot`.
    ///
    /// # Panics
    /// Panics if `tag` is already indexed.
    pub fn insert(&mut self, tag: Tag, slot: SlotId) {
        if let Some(existing) = self.map.insert(tag, slot) {
            panic!("{} already indexed at {}", tag, existing);
        }
    }

    /// Drop `tag` from the index, returning the slot it pointed at.
    ///
    /// # Panics
    /// Panics if `tag` is not indexed.
    pub fn remove(&mut self, tag: Tag) -> SlotId {
        self.map
            .remove(&tag)
            .unwrap_or_else(|| panic!("{} is not indexed", tag))
    }

    /// Number of resident tags.
    #[inline]
    pub fn len(&self) -> usize {
        self.map.len()
    }

    /// True if nothing is resident.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }
}

//! Slot table - the fixed arena every buffer list links through.
//!
//! A slot holds at most one block. Its [`SlotState`] says which of the
//! simulator's four lists it is linked into:
//! - `Free`: no content, ready for admission
//! - `Dirty`: written since the last epoch
//! - `Clean`: checkpointed, evictable without data loss
//! - `Hidden`: checkpointed copy superseded, discarded at the next epoch

use std::fmt;

use crate::buffer::IndexNode;
use crate::common::{SlotId, Tag};

/// Lifecycle state of a slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum SlotState {
    #[default]
    Free,
    Dirty,
    Clean,
    Hidden,
}

impl SlotState {
    /// True for every state that keeps the slot's tag in the tag index.
    #[inline]
    pub fn is_resident(self) -> bool {
        self != SlotState::Free
    }
}

impl fmt::Display for SlotState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SlotState::Free => "FREE",
            SlotState::Dirty => "DIRTY",
            SlotState::Clean => "CLEAN",
            SlotState::Hidden => "HIDDEN",
        };
        f.write_str(name)
    }
}

/// Per-slot record: which block the slot holds and where it is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SlotEntry {
    /// The block held by the slot, `None` while free.
    pub tag: Option<Tag>,

    /// Lifecycle state.
    pub state: SlotState,
}

/// The arena of slot records, allocated once and never resized.
///
/// # Example
/// ```
/// use epochsim::buffer::{SlotState, SlotTable};
/// use epochsim::{SlotId, Tag};
///
/// let mut slots = SlotTable::new(4);
/// assert_eq!(slots.len(), 4);
/// assert_eq!(slots.state(SlotId::new(0)), SlotState::Free);
///
/// slots.occupy(SlotId::new(0), Tag::new(7));
/// assert_eq!(slots.state(SlotId::new(0)), SlotState::Dirty);
/// assert_eq!(slots.tag(SlotId::new(0)), Some(Tag::new(7)));
/// ```
#[derive(Debug, Clone)]
pub struct SlotTable {
    nodes: Vec<IndexNode<SlotEntry>>,
}

impl SlotTable {
    /// Allocate `capacity` free slots.
    pub fn new(capacity: usize) -> Self {
        Self {
            nodes: (0..capacity).map(|_| IndexNode::default()).collect(),
        }
    }

    /// Number of slots.
    #[inline]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// True if the table has no slots.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Iterate over every slot id in table order.
    pub fn ids(&self) -> impl Iterator<Item = SlotId> {
        (0..self.nodes.len()).map(SlotId::new)
    }

    /// The entry for a slot.
    #[inline]
    pub fn entry(&self, id: SlotId) -> &SlotEntry {
        &self.nodes[id.0].value
    }

    /// Current state of a slot.
    #[inline]
    pub fn state(&self, id: SlotId) -> SlotState {
        self.nodes[id.0].value.state
    }

    /// Block held by a slot, `None` if free.
    #[inline]
    pub fn tag(&self, id: SlotId) -> Option<Tag> {
        self.nodes[id.0].value.tag
    }

    /// Change a slot's state, keeping its tag.
    ///
    /// # Panics
    /// Panics if used to free a slot; use [`release`](Self::release).
    #[inline]
    pub fn set_state(&mut self, id: SlotId, state: SlotState) {
        assert!(state.is_resident(), "use release() to free {}", id);
        self.nodes[id.0].value.state = state;
    }

    /// Place a new block in a free slot, marking it dirty.
    ///
    /// # Panics
    /// Panics if the slot is not free.
    pub fn occupy(&mut self, id: SlotId, tag: Tag) {
        let entry = &mut self.nodes[id.0].value;
        assert_eq!(entry.state, SlotState::Free, "{} is not free", id);
        entry.tag = Some(tag);
        entry.state = SlotState::Dirty;
    }

    /// Empty a slot, returning the tag it held.
    ///
    /// # Panics
    /// Panics if the slot is already free.
    pub fn release(&mut self, id: SlotId) -> Tag {
        let entry = &mut self.nodes[id.0].value;
        assert!(entry.state.is_resident(), "{} is already free", id);
        entry.state = SlotState::Free;
        entry
            .tag
            .take()
            .unwrap_or_else(|| panic!("resident {} has no tag", id))
    }

    /// The raw arena, for list surgery.
    #[inline]
    pub fn nodes(&self) -> &[IndexNode<SlotEntry>] {
        &self.nodes
    }

    /// The raw arena, for list surgery.
    #[inline]
    pub fn nodes_mut(&mut self) -> &mut [IndexNode<SlotEntry>] {
        &mut self.nodes
    }
}

//! Slot identifier type.

use std::fmt;

/// Identifies a slot in the buffer's slot table.
///
/// Using `usize` because:
/// 1. Slots are stored in a `Vec` that never grows or shrinks
/// 2. Direct indexing without casting: `nodes[slot.0]`
/// 3. List links are stored as `Option<SlotId>`, which has no sentinel value
///
/// # Example
/// ```
/// use epochsim::SlotId;
///
/// let slot = SlotId::new(5);
/// assert_eq!(slot.index(), 5);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SlotId(pub usize);

impl SlotId {
    /// Create a new SlotId.
    #[inline]
    pub fn new(id: usize) -> Self {
        SlotId(id)
    }

    /// Position of this slot in the slot table.
    #[inline]
    pub fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for SlotId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Slot({})", self.0)
    }
}

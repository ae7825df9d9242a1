//! Block tag type.

use std::fmt;

use crate::common::config::MAX_BLOCK_BITS;

/// Identity of a block: an address with its in-block offset shifted away.
///
/// Two addresses share a tag iff they fall into the same
/// `1 << block_bits` byte block. Tags are the keys of the tag index.
///
/// # Example
/// ```
/// use epochsim::Tag;
///
/// // 64-byte blocks
/// assert_eq!(Tag::from_address(0x1000, 6), Tag::from_address(0x103f, 6));
/// assert_ne!(Tag::from_address(0x1000, 6), Tag::from_address(0x1040, 6));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Tag(pub u64);

impl Tag {
    /// Create a tag from a raw block number.
    #[inline]
    pub fn new(value: u64) -> Self {
        Tag(value)
    }

    /// Derive the tag of `address` for blocks of `1 << block_bits` bytes.
    ///
    /// # Panics
    /// Panics if `block_bits` exceeds [`MAX_BLOCK_BITS`], in every build
    /// profile. [`SimulatorConfig::validate`] rejects such configurations
    /// before a simulator is built.
    ///
    /// [`SimulatorConfig::validate`]: crate::common::SimulatorConfig::validate
    #[inline]
    pub fn from_address(address: u64, block_bits: u32) -> Self {
        assert!(
            block_bits <= MAX_BLOCK_BITS,
            "block_bits {} exceeds maximum {}",
            block_bits,
            MAX_BLOCK_BITS
        );
        Tag(address >> block_bits)
    }

    /// The block number.
    #[inline]
    pub fn value(self) -> u64 {
        self.0
    }
}

impl fmt::Display for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Tag({:#x})", self.0)
    }
}

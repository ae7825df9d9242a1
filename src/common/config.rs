//! Configuration constants and per-simulator parameters.

use crate::error::{Error, Result};

/// Size of a CPU cache line in bytes.
///
/// A buffer hit moves one cache line, and every epoch flushes one cache
/// line of metadata per buffer slot.
pub const CACHE_LINE_SIZE: u64 = 64;

/// Instruction counts on the command line are given in millions.
pub const INSTRUCTIONS_PER_UNIT: u64 = 1_000_000;

/// Largest accepted block-size exponent (4GB blocks).
///
/// Keeps a single copy charge (`2 × block`) far from `u64` overflow.
pub const MAX_BLOCK_BITS: u32 = 32;

/// Block-size exponents swept with a pure NVM buffer (64B and 256B blocks).
pub const REFERENCE_NVM_BLOCK_BITS: [u32; 2] = [6, 8];

/// Block-size exponents swept with a DRAM stage in front of NVM (1KB to 64KB).
pub const REFERENCE_DRAM_BLOCK_BITS: [u32; 4] = [10, 12, 14, 16];

/// Parameters of one simulated buffer.
///
/// # Example
/// ```
/// use epochsim::SimulatorConfig;
///
/// let config = SimulatorConfig::new(1024, 12, true);
/// assert!(config.validate().is_ok());
/// assert_eq!(config.block_size(), 4096);
///
/// assert!(SimulatorConfig::new(0, 12, true).validate().is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SimulatorConfig {
    /// Number of slots in the buffer.
    pub capacity: usize,

    /// Block size exponent: blocks are `1 << block_bits` bytes.
    pub block_bits: u32,

    /// Whether a DRAM stage absorbs copies and hits in front of NVM.
    pub has_dram: bool,
}

impl SimulatorConfig {
    /// Create a new configuration. Call [`validate`](Self::validate) before use.
    pub fn new(capacity: usize, block_bits: u32, has_dram: bool) -> Self {
        Self {
            capacity,
            block_bits,
            has_dram,
        }
    }

    /// Block size in bytes.
    #[inline]
    pub fn block_size(&self) -> u64 {
        1u64 << self.block_bits
    }

    /// Check the configuration describes a buildable buffer.
    ///
    /// # Errors
    /// - `Error::InvalidConfig` if the capacity is zero, the block
    ///   exponent exceeds [`MAX_BLOCK_BITS`], or one epoch over the whole
    ///   buffer would charge more bytes than a `u64` holds.
    pub fn validate(&self) -> Result<()> {
        if self.capacity == 0 {
            return Err(Error::InvalidConfig(
                "buffer capacity must be > 0".to_string(),
            ));
        }
        if self.block_bits > MAX_BLOCK_BITS {
            return Err(Error::InvalidConfig(format!(
                "block_bits {} exceeds maximum {}",
                self.block_bits, MAX_BLOCK_BITS
            )));
        }
        // Worst epoch: metadata for every slot plus every slot's payload
        let per_slot = self.block_size() + CACHE_LINE_SIZE;
        if (self.capacity as u64).checked_mul(per_slot).is_none() {
            return Err(Error::InvalidConfig(format!(
                "{} slots of {} bytes overflow the byte counters",
                self.capacity,
                self.block_size()
            )));
        }
        Ok(())
    }
}

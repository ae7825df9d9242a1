//! Throughput statistics raised by the buffer simulator.

use std::fmt;

use crate::common::config::CACHE_LINE_SIZE;

/// Byte throughput and epoch count for one buffer configuration.
///
/// The simulator raises three structural events; how each is charged
/// depends on whether a DRAM stage fronts the NVM buffer:
///
/// | event            | NVM only                       | DRAM staged                                        |
/// |------------------|--------------------------------|----------------------------------------------------|
/// | `on_copy(n)`     | nvm += n × block               | dram += n × block                                  |
/// | `on_hit()`       | nvm += cache line              | dram += cache line                                 |
/// | `on_epoch(k)`    | nvm += slots × cache line      | nvm += slots × cache line + k × block              |
///
/// # Example
/// ```
/// use epochsim::ThroughputStats;
///
/// let mut stats = ThroughputStats::new(4, 256, false);
/// stats.on_copy(1);
/// stats.on_hit();
/// stats.on_epoch(2);
///
/// let snapshot = stats.snapshot();
/// assert_eq!(snapshot.nvm_bytes, 256 + 64 + 4 * 64);
/// assert_eq!(snapshot.dram_bytes, 0);
/// assert_eq!(snapshot.epoch_count, 1);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ThroughputStats {
    buffer_len: u64,
    block_size: u64,
    has_dram: bool,

    nvm_bytes: u64,
    dram_bytes: u64,
    epoch_count: u64,
}

impl ThroughputStats {
    /// Create a collector with all counters at zero.
    pub fn new(buffer_len: usize, block_size: u64, has_dram: bool) -> Self {
        Self {
            buffer_len: buffer_len as u64,
            block_size,
            has_dram,
            nvm_bytes: 0,
            dram_bytes: 0,
            epoch_count: 0,
        }
    }

    /// Bytes written to NVM so far.
    #[inline]
    pub fn nvm_bytes(&self) -> u64 {
        self.nvm_bytes
    }

    /// Bytes moved through the DRAM stage so far.
    #[inline]
    pub fn dram_bytes(&self) -> u64 {
        self.dram_bytes
    }

    /// Number of epochs seen.
    #[inline]
    pub fn epoch_count(&self) -> u64 {
        self.epoch_count
    }

    /// Block size this collector charges per copied block.
    #[inline]
    pub fn block_size(&self) -> u64 {
        self.block_size
    }

    /// Whether copies and hits are charged to DRAM.
    #[inline]
    pub fn has_dram(&self) -> bool {
        self.has_dram
    }

    /// `num` blocks were copied into (or out of and into) the buffer.
    ///
    /// # Panics
    /// Panics if a counter would overflow.
    pub fn on_copy(&mut self, num: u64) {
        let bytes = self.blocks_bytes(num);
        if self.has_dram {
            charge(&mut self.dram_bytes, bytes);
        } else {
            charge(&mut self.nvm_bytes, bytes);
        }
    }

    /// A write hit a resident block.
    pub fn on_hit(&mut self) {
        if self.has_dram {
            charge(&mut self.dram_bytes, CACHE_LINE_SIZE);
        } else {
            charge(&mut self.nvm_bytes, CACHE_LINE_SIZE);
        }
    }

    /// An epoch checkpointed `to_checkpoint` blocks.
    ///
    /// The per-slot metadata flush is charged regardless of how many blocks
    /// were dirty. Without a DRAM stage the payload is already in NVM.
    ///
    /// # Panics
    /// Panics if a counter would overflow.
    pub fn on_epoch(&mut self, to_checkpoint: u64) {
        self.epoch_count += 1;
        let metadata = self
            .buffer_len
            .checked_mul(CACHE_LINE_SIZE)
            .unwrap_or_else(|| overflow("epoch metadata", self.buffer_len));
        charge(&mut self.nvm_bytes, metadata);
        if self.has_dram {
            let payload = self.blocks_bytes(to_checkpoint);
            charge(&mut self.nvm_bytes, payload);
        }
    }

    fn blocks_bytes(&self, num: u64) -> u64 {
        self.block_size
            .checked_mul(num)
            .unwrap_or_else(|| overflow("block charge", num))
    }

    /// Get a snapshot of current statistics.
    pub fn snapshot(&self) -> StatsSnapshot {
        StatsSnapshot {
            epoch_count: self.epoch_count,
            nvm_bytes: self.nvm_bytes,
            dram_bytes: self.dram_bytes,
        }
    }

    /// Reset all counters to zero, keeping the configuration.
    pub fn reset(&mut self) {
        self.nvm_bytes = 0;
        self.dram_bytes = 0;
        self.epoch_count = 0;
    }
}

/// Add `bytes` to a counter, panicking rather than wrapping.
fn charge(counter: &mut u64, bytes: u64) {
    *counter = counter
        .checked_add(bytes)
        .unwrap_or_else(|| overflow("byte counter", bytes));
}

#[cold]
fn overflow(what: &str, operand: u64) -> ! {
    panic!("{} overflowed u64 (operand {})", what, operand)
}

/// A point-in-time copy of [`ThroughputStats`] counters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct StatsSnapshot {
    pub epoch_count: u64,
    pub nvm_bytes: u64,
    pub dram_bytes: u64,
}

impl StatsSnapshot {
    /// Total bytes moved across both memories.
    ///
    /// Widened so two full counters still add up.
    pub fn total_bytes(&self) -> u128 {
        self.nvm_bytes as u128 + self.dram_bytes as u128
    }

    /// Ratio of bytes moved to bytes the workload actually wrote.
    ///
    /// Returns 0.0 if `payload_bytes` is zero.
    pub fn write_amplification(&self, payload_bytes: u64) -> f64 {
        if payload_bytes == 0 {
            0.0
        } else {
            self.total_bytes() as f64 / payload_bytes as f64
        }
    }
}

/// Tab-separated `epoch_count nvm_bytes dram_bytes`.
impl fmt::Display for StatsSnapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}\t{}\t{}",
            self.epoch_count, self.nvm_bytes, self.dram_bytes
        )
    }
}

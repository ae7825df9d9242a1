//! Buffer simulation.
//!
//! The buffer is a fixed table of slots partitioned into four lists by
//! lifecycle state. Every write access is replayed against it one at a time.
//!
//! # Components
//! - [`BufferSimulator`] - The slot lifecycle state machine
//! - [`IndexedList`] - Index-linked list over a shared slot arena
//! - [`SlotTable`] - The slot arena itself
//! - [`TagIndex`] - Resident block lookup
//! - [`ThroughputStats`] - NVM/DRAM byte accounting

mod indexed_list;
mod simulator;
mod slot;
mod stats;
mod tag_index;

pub use indexed_list::{IndexNode, IndexedList, Iter};
pub use simulator::{Access, AccessCounters, BufferSimulator, Occupancy};
pub use slot::{SlotEntry, SlotState, SlotTable};
pub use stats::{StatsSnapshot, ThroughputStats};
pub use tag_index::TagIndex;

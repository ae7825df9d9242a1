//! epochsim - trace-driven simulation of epoch-checkpointed NVM write buffers.
//!
//! Estimates the NVM and DRAM traffic a buffering strategy generates for a
//! recorded stream of memory writes. The buffer holds a fixed number of
//! block-sized slots; when it fills with unpersisted data it runs an
//! *epoch* that checkpoints every dirty block at once.
//!
//! # Architecture
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                            epochsim                             │
//! ├─────────────────────────────────────────────────────────────────┤
//! │  ┌─────────────────────────────────────────────────────────┐   │
//! │  │                  Sweep (sweep)                           │   │
//! │  │     SweepPlan → one simulator per configuration          │   │
//! │  │        sequential pass  │  scoped thread per config      │   │
//! │  └─────────────────────────────────────────────────────────┘   │
//! │                              ↓                                  │
//! │  ┌─────────────────────────────────────────────────────────┐   │
//! │  │                  Trace (trace/)                          │   │
//! │  │   TraceReader → InstructionWindow → Replayer             │   │
//! │  └─────────────────────────────────────────────────────────┘   │
//! │                              ↓ put(address, time)               │
//! │  ┌─────────────────────────────────────────────────────────┐   │
//! │  │                  Buffer (buffer/)                        │   │
//! │  │   BufferSimulator: free │ dirty │ clean │ hidden lists   │   │
//! │  │   SlotTable + IndexedList + TagIndex                     │   │
//! │  │   ThroughputStats (on_copy / on_hit / on_epoch)          │   │
//! │  └─────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Modules
//! - [`common`] - Shared primitives (Tag, SlotId, config)
//! - [`error`] - Error types
//! - [`buffer`] - The buffer state machine and its accounting
//! - [`trace`] - Trace parsing and windowed replay
//! - [`sweep`] - Running many configurations over one trace
//!
//! # Quick Start
//! ```
//! use epochsim::{BufferSimulator, SimulatorConfig};
//!
//! // 4 slots of 64-byte blocks, no DRAM stage
//! let mut sim = BufferSimulator::new(SimulatorConfig::new(4, 6, false)).unwrap();
//!
//! for (time, address) in [0x000u64, 0x040, 0x000, 0x080].into_iter().enumerate() {
//!     sim.put(address, time as u64);
//! }
//!
//! println!("{}", sim.basic_stats().snapshot());
//! ```

pub mod buffer;
pub mod common;
pub mod error;
pub mod sweep;
pub mod trace;

// Re-export commonly used items at crate root for convenience
pub use common::config::CACHE_LINE_SIZE;
pub use common::{SimulatorConfig, SlotId, Tag};
pub use error::{Error, Result};

pub use buffer::{Access, BufferSimulator, SlotState, StatsSnapshot, ThroughputStats};
pub use sweep::{ReportRow, SweepPlan};

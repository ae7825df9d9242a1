//! Trace input and replay.
//!
//! - [`TraceRecord`] - One memory access from a recorded trace
//! - [`TraceReader`] - Parses the text trace format
//! - [`InstructionWindow`] / [`Replayer`] - Feed a window of writes into simulators

mod reader;
mod record;
mod replay;

pub use reader::TraceReader;
pub use record::{AccessKind, TraceRecord};
pub use replay::{InstructionWindow, ReplaySummary, Replayer};

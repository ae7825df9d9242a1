//! Common types and utilities shared across epochsim.
//!
//! This module contains fundamental primitives used throughout the codebase:
//! - Configuration constants and [`SimulatorConfig`]
//! - Identifiers ([`Tag`], [`SlotId`])

pub mod config;
mod slot_id;
mod tag;

pub use config::SimulatorConfig;
pub use slot_id::SlotId;
pub use tag::Tag;

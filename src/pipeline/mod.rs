//! Import pipeline module.
//!
//! Turns file text into a validated, date-sorted record set:
//! - JSON parsing
//! - Envelope / legacy shape detection
//! - Schema validation
//! - Sort normalization

pub mod import;

pub use import::*;

//! Planner data model.
//!
//! - `exam` - exam records and the edit-form draft
//! - `config` - display configuration
//! - `status` - derived status, stats and list filters (never persisted)

pub mod config;
pub mod exam;
pub mod status;

pub use config::*;
pub use exam::*;
pub use status::*;

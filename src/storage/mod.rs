//! Storage module.
//!
//! Key-value persistence (the local-storage counterpart) and the planner
//! store that owns the record set and config on top of it.

pub mod kv;
pub mod store;

pub use kv::*;
pub use store::*;

//! Schema validation module.
//!
//! Validates imported and stored exam data:
//! - Record list shape, field by field, with itemized issues
//! - Lenient config merge over defaults

pub mod schema;

pub use schema::*;

//! Export module.
//!
//! Renders the current record set into downloadable artifacts:
//! - JSON (bare array or versioned envelope)
//! - Printable HTML table
//! - Student build (bundled app snapshot with the data frozen in)

pub mod html;
pub mod json;
pub mod student_build;

pub use html::*;
pub use json::*;
pub use student_build::*;

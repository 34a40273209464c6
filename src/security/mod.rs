//! Security module.
//!
//! Makes user-supplied text safe for the places it is written to:
//! download filenames and generated HTML.

pub mod escape;
pub mod filename;

pub use escape::*;
pub use filename::*;

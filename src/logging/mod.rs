//! Structured logging with operation context.
//!
//! Provides logging macros and utilities that include the operation id
//! and exam id in every log message for easy correlation.

pub mod structured;

pub use structured::*;

/// Install the process-wide logger.
///
/// Info by default, overridable through `RUST_LOG`. Safe to call more than
/// once; later calls are no-ops.
pub fn init_logger() {
    let _ = env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or("info"),
    )
    .format_timestamp_millis()
    .try_init();
}

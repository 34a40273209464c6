//! JSON export.

use serde::Serialize;

use crate::error::Result;
use crate::model::config::AppConfig;
use crate::model::exam::ExamRecord;

/// Envelope format version written by [`to_json`].
pub const EXPORT_VERSION: u32 = 1;

#[derive(Serialize)]
struct ExportEnvelope<'a> {
    version: u32,
    config: &'a AppConfig,
    exams: &'a [ExamRecord],
}

/// Pretty-printed export: the versioned envelope when `config` is given,
/// otherwise the bare record array.
pub fn to_json(records: &[ExamRecord], config: Option<&AppConfig>) -> Result<String> {
    let json = match config {
        Some(config) => serde_json::to_string_pretty(&ExportEnvelope {
            version: EXPORT_VERSION,
            config,
            exams: records,
        })?,
        None => serde_json::to_string_pretty(records)?,
    };
    log::debug!(
        "EXPORT_JSON exams={} envelope={} bytes={}",
        records.len(),
        config.is_some(),
        json.len()
    );
    Ok(json)
}

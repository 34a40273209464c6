//! Exam import pipeline.
//!
//! Coordinates the import workflow:
//! 1. JSON parsing
//! 2. Shape detection (versioned envelope vs legacy bare array)
//! 3. Schema validation (all-or-nothing)
//! 4. Date sort normalization
//! 5. Result for the caller to commit or discard

use serde::Serialize;
use serde_json::Value;

use crate::error::{ErrorKind, PlannerError};
use crate::logging::structured::LogContext;
use crate::model::exam::ExamRecord;
use crate::validation::schema::{validate_record_list, ValidationIssue};

pub const MSG_IMPORTED_WITH_CONFIG: &str = "Calendario y configuración importados correctamente.";
pub const MSG_IMPORTED: &str = "Calendario importado correctamente.";
pub const MSG_NOT_JSON: &str = "El archivo no es un JSON válido.";
pub const MSG_BAD_FORMAT: &str = "El archivo no cumple con el formato requerido.";

/// Validated payload of a successful import.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ImportData {
    /// Sorted ascending by date.
    pub exams: Vec<ExamRecord>,
    /// Envelope `config`, passed through verbatim.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub config: Option<Value>,
}

/// Outcome of an import. Consumed once by the caller.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ImportResult {
    pub success: bool,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<ImportData>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_kind: Option<ErrorKind>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub issues: Vec<ValidationIssue>,
}

impl ImportResult {
    fn imported(message: &str, exams: Vec<ExamRecord>, config: Option<Value>) -> Self {
        Self {
            success: true,
            message: message.to_string(),
            data: Some(ImportData { exams, config }),
            error_kind: None,
            issues: Vec::new(),
        }
    }

    fn malformed() -> Self {
        Self {
            success: false,
            message: MSG_NOT_JSON.to_string(),
            data: None,
            error_kind: Some(ErrorKind::MalformedJson),
            issues: Vec::new(),
        }
    }

    fn violation(issues: Vec<ValidationIssue>) -> Self {
        Self {
            success: false,
            message: MSG_BAD_FORMAT.to_string(),
            data: None,
            error_kind: Some(ErrorKind::SchemaViolation),
            issues,
        }
    }

    /// Convert into the library error form.
    pub fn into_result(self) -> Result<ImportData, PlannerError> {
        match (self.data, self.error_kind) {
            (Some(data), _) if self.success => Ok(data),
            (_, Some(ErrorKind::MalformedJson)) => Err(PlannerError::MalformedJson(self.message)),
            (_, _) => Err(PlannerError::SchemaViolation(self.issues)),
        }
    }
}

/// Parse and validate an import payload.
///
/// Accepts a bare exam array (legacy) or `{version, config?, exams}`.
pub fn parse_import(json_text: &str) -> ImportResult {
    let ctx = LogContext::for_operation("import");
    parse_import_with(&ctx, json_text)
}

pub fn parse_import_with(ctx: &LogContext, json_text: &str) -> ImportResult {
    log::debug!("{} IMPORT_START bytes={}", ctx, json_text.len());

    let parsed: Value = match serde_json::from_str(json_text) {
        Ok(v) => v,
        Err(e) => {
            log::warn!("{} IMPORT_PARSE_FAILED error={}", ctx, e);
            return ImportResult::malformed();
        }
    };

    let result = match envelope_exams(&parsed) {
        Some(exams) => {
            log::debug!("{} IMPORT_SHAPE shape=envelope", ctx);
            match validate_record_list(exams) {
                Ok(records) => ImportResult::imported(
                    MSG_IMPORTED_WITH_CONFIG,
                    sort_by_date(records),
                    parsed.get("config").cloned(),
                ),
                Err(issues) => ImportResult::violation(issues),
            }
        }
        None => {
            log::debug!("{} IMPORT_SHAPE shape=legacy", ctx);
            match validate_record_list(&parsed) {
                Ok(records) => ImportResult::imported(MSG_IMPORTED, sort_by_date(records), None),
                Err(issues) => ImportResult::violation(issues),
            }
        }
    };

    if result.success {
        crate::log_info!(
            ctx,
            "IMPORT_COMPLETE",
            exams = result.data.as_ref().map_or(0, |d| d.exams.len()),
            with_config = result.data.as_ref().is_some_and(|d| d.config.is_some()),
        );
    } else {
        crate::log_warn!(
            ctx,
            "IMPORT_REJECTED",
            issues = result.issues.len(),
            first = result.issues.first().map(|i| i.to_string()),
        );
    }

    result
}

/// The `exams` member of a versioned envelope, if this is one.
///
/// Mirrors a truthiness check: `null` and `false` do not count.
fn envelope_exams(parsed: &Value) -> Option<&Value> {
    parsed
        .as_object()
        .and_then(|obj| obj.get("exams"))
        .filter(|exams| !matches!(exams, Value::Null | Value::Bool(false)))
}

/// Stable ascending sort on the `YYYY-MM-DD` key.
fn sort_by_date(mut records: Vec<ExamRecord>) -> Vec<ExamRecord> {
    records.sort_by(|a, b| a.date.cmp(&b.date));
    records
}

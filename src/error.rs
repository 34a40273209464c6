//! Error types for planner operations.

use serde::Serialize;
use thiserror::Error;

use crate::validation::schema::ValidationIssue;

/// User-facing failure taxonomy.
///
/// All three are recovered locally and surfaced as a result message; none
/// of them is fatal to the running application.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ErrorKind {
    /// Input is not parseable JSON.
    MalformedJson,
    /// Parseable, but fails field validation.
    SchemaViolation,
    /// Student build requested from a non-production template.
    BlockedExport,
}

#[derive(Debug, Error)]
pub enum PlannerError {
    #[error("invalid JSON: {0}")]
    MalformedJson(String),

    #[error("schema violation ({} issue(s)): {}", .0.len(), join_issues(.0))]
    SchemaViolation(Vec<ValidationIssue>),

    #[error("student build export is blocked: the template is not a bundled production build")]
    BlockedExport,

    #[error("the planner is in read-only mode")]
    ReadOnly,

    #[error("no exam with id {0}")]
    NotFound(String),

    #[error("an exam with id {0} already exists")]
    DuplicateId(String),

    #[error("storage error: {0}")]
    Storage(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl PlannerError {
    /// Taxonomy bucket, for the three user-facing failure kinds.
    pub fn kind(&self) -> Option<ErrorKind> {
        match self {
            PlannerError::MalformedJson(_) => Some(ErrorKind::MalformedJson),
            PlannerError::SchemaViolation(_) => Some(ErrorKind::SchemaViolation),
            PlannerError::BlockedExport => Some(ErrorKind::BlockedExport),
            _ => None,
        }
    }
}

fn join_issues(issues: &[ValidationIssue]) -> String {
    issues
        .iter()
        .map(|i| i.to_string())
        .collect::<Vec<_>>()
        .join("; ")
}

pub type Result<T> = std::result::Result<T, PlannerError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_mapping() {
        assert_eq!(
            PlannerError::MalformedJson("eof".into()).kind(),
            Some(ErrorKind::MalformedJson)
        );
        assert_eq!(
            PlannerError::SchemaViolation(vec![]).kind(),
            Some(ErrorKind::SchemaViolation)
        );
        assert_eq!(PlannerError::BlockedExport.kind(), Some(ErrorKind::BlockedExport));
        assert_eq!(PlannerError::ReadOnly.kind(), None);
    }

    #[test]
    fn test_schema_violation_message_lists_issues() {
        let err = PlannerError::SchemaViolation(vec![
            ValidationIssue::new("[0].subject", "La materia es obligatoria"),
            ValidationIssue::new("[1].date", "Formato de fecha inválido (YYYY-MM-DD)"),
        ]);
        let msg = err.to_string();
        assert!(msg.contains("2 issue(s)"));
        assert!(msg.contains("[0].subject: La materia es obligatoria"));
        assert!(msg.contains("[1].date"));
    }
}

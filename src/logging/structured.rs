//! Structured logging utilities.
//!
//! Provides context-aware logging with the operation id (and the exam id,
//! when one is involved) included in every log message.

use std::fmt;

use uuid::Uuid;

/// Logging context for one planner operation (an import, an export, a
/// store mutation).
#[derive(Debug, Clone)]
pub struct LogContext {
    pub op_id: String,
    pub exam_id: Option<String>,
}

impl LogContext {
    pub fn new(op_id: &str) -> Self {
        Self {
            op_id: op_id.to_string(),
            exam_id: None,
        }
    }

    /// Fresh context with a short random id, e.g. `import-3f2a9c1d`.
    pub fn for_operation(kind: &str) -> Self {
        let op_id = format!("{}-{}", kind, &Uuid::new_v4().to_string()[..8]);
        Self::new(&op_id)
    }

    pub fn with_exam(&self, exam_id: &str) -> Self {
        Self {
            op_id: self.op_id.clone(),
            exam_id: Some(exam_id.to_string()),
        }
    }
}

impl fmt::Display for LogContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.exam_id {
            Some(eid) => write!(f, "[op={}] [exam={}]", self.op_id, eid),
            None => write!(f, "[op={}]", self.op_id),
        }
    }
}

/// Log an info message with context.
#[macro_export]
macro_rules! log_info {
    ($ctx:expr, $event:expr, $($key:ident = $value:expr),* $(,)?) => {
        log::info!(
            "{} {} {}",
            $ctx,
            $event,
            format_args!(concat!($(stringify!($key), "={:?} "),*), $($value),*)
        );
    };
}

/// Log a warning message with context.
#[macro_export]
macro_rules! log_warn {
    ($ctx:expr, $event:expr, $($key:ident = $value:expr),* $(,)?) => {
        log::warn!(
            "{} {} {}",
            $ctx,
            $event,
            format_args!(concat!($(stringify!($key), "={:?} "),*), $($value),*)
        );
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_context_display() {
        let ctx = LogContext::new("import-123");
        assert_eq!(format!("{}", ctx), "[op=import-123]");

        let ctx_with_exam = ctx.with_exam("exam-456");
        assert_eq!(
            format!("{}", ctx_with_exam),
            "[op=import-123] [exam=exam-456]"
        );
    }

    #[test]
    fn test_operation_id_shape() {
        let ctx = LogContext::for_operation("export");
        assert!(ctx.op_id.starts_with("export-"));
        assert_eq!(ctx.op_id.len(), "export-".len() + 8);
        assert!(ctx.exam_id.is_none());
    }

    #[test]
    fn test_context_macros_expand() {
        let ctx = LogContext::new("macro-test");
        crate::log_info!(ctx, "MACRO_INFO", count = 3, name = "x");
        crate::log_warn!(&ctx, "MACRO_WARN", reason = "none");
    }
}

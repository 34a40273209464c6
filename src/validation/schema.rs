//! Exam record schema validation.
//!
//! Validates arbitrary parsed JSON against the exam record shape, field by
//! field. Unknown keys are ignored. Optional fields may be absent entirely
//! (JSON round-trips drop `undefined`) or present as empty strings; both
//! are accepted.

use std::collections::HashSet;
use std::fmt;

use lazy_static::lazy_static;
use regex::Regex;
use serde::Serialize;
use serde_json::{Map, Value};
use url::Url;

use crate::model::config::AppConfig;
use crate::model::exam::ExamRecord;

lazy_static! {
    /// Exact `YYYY-MM-DD` shape in ASCII digits; calendar validity is not
    /// checked.
    static ref DATE_PATTERN: Regex = Regex::new(r"^[0-9]{4}-[0-9]{2}-[0-9]{2}$").unwrap();
}

pub const MSG_REQUIRED: &str = "Campo obligatorio";
pub const MSG_NOT_STRING: &str = "Debe ser texto";
pub const MSG_NOT_LIST: &str = "Debe ser una lista";
pub const MSG_NOT_OBJECT: &str = "Debe ser un objeto";
pub const MSG_TITLE_REQUIRED: &str = "El título es obligatorio";
pub const MSG_SUBJECT_REQUIRED: &str = "La materia es obligatoria";
pub const MSG_BAD_DATE: &str = "Formato de fecha inválido (YYYY-MM-DD)";
pub const MSG_BAD_URL: &str = "Debe ser una URL válida";
pub const MSG_EMPTY_TOPIC: &str = "Los temas no pueden estar vacíos";
pub const MSG_DUPLICATE_ID: &str = "Identificador duplicado";

/// One itemized validation failure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationIssue {
    /// e.g. `[2].subject`, `[0].topics[1]`
    pub path: String,
    pub message: String,
}

impl ValidationIssue {
    pub fn new(path: &str, message: &str) -> Self {
        Self {
            path: path.to_string(),
            message: message.to_string(),
        }
    }
}

impl fmt::Display for ValidationIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.path, self.message)
    }
}

/// Validate a full record list. All-or-nothing: every element is checked
/// and all issues are reported together.
pub fn validate_record_list(value: &Value) -> Result<Vec<ExamRecord>, Vec<ValidationIssue>> {
    let Some(items) = value.as_array() else {
        log::debug!("SCHEMA_CHECK shape=not_list");
        return Err(vec![ValidationIssue::new("", MSG_NOT_LIST)]);
    };

    let mut records = Vec::with_capacity(items.len());
    let mut issues = Vec::new();
    let mut seen_ids = HashSet::new();

    for (index, item) in items.iter().enumerate() {
        match validate_record(item, index) {
            Ok(record) => {
                if !seen_ids.insert(record.id.clone()) {
                    issues.push(ValidationIssue::new(&format!("[{}].id", index), MSG_DUPLICATE_ID));
                }
                records.push(record);
            }
            Err(mut record_issues) => issues.append(&mut record_issues),
        }
    }

    if issues.is_empty() {
        log::debug!("SCHEMA_VALID records={}", records.len());
        Ok(records)
    } else {
        log::debug!(
            "SCHEMA_INVALID records={} issues={}",
            items.len(),
            issues.len()
        );
        Err(issues)
    }
}

/// Validate a single record; `index` is only used for issue paths.
pub fn validate_record(value: &Value, index: usize) -> Result<ExamRecord, Vec<ValidationIssue>> {
    let prefix = format!("[{}]", index);
    let Some(obj) = value.as_object() else {
        return Err(vec![ValidationIssue::new(&prefix, MSG_NOT_OBJECT)]);
    };

    let mut fields = FieldReader {
        obj,
        prefix: &prefix,
        issues: Vec::new(),
    };

    let id = fields.required_string("id");
    let title = fields.required_string("title");
    let subject = fields.required_string("subject");
    let date = fields.required_string("date");
    let time = fields.required_string("time");
    let location = fields.required_string("location");
    let topics = fields.topics();
    let notes = fields.optional_string("notes");
    let form_url = fields.optional_string("formUrl");
    let distribution_url = fields.optional_string("distributionUrl");

    if let Some(t) = &title {
        if t.trim().is_empty() {
            fields.push("title", MSG_TITLE_REQUIRED);
        }
    }
    if let Some(s) = &subject {
        if s.trim().is_empty() {
            fields.push("subject", MSG_SUBJECT_REQUIRED);
        }
    }
    if let Some(d) = &date {
        if !DATE_PATTERN.is_match(d) {
            fields.push("date", MSG_BAD_DATE);
        }
    }
    for (key, url) in [("formUrl", &form_url), ("distributionUrl", &distribution_url)] {
        if let Some(u) = url {
            if !u.is_empty() && !is_absolute_url(u) {
                fields.push(key, MSG_BAD_URL);
            }
        }
    }

    let FieldReader { issues, .. } = fields;
    if !issues.is_empty() {
        return Err(issues);
    }

    match (id, title, subject, date, time, location, topics) {
        (Some(id), Some(title), Some(subject), Some(date), Some(time), Some(location), Some(topics)) => {
            Ok(ExamRecord {
                id,
                title,
                subject,
                date,
                time,
                location,
                topics,
                notes,
                form_url,
                distribution_url,
            })
        }
        // Every None above already pushed an issue.
        _ => Err(vec![ValidationIssue::new(&prefix, MSG_REQUIRED)]),
    }
}

/// Lenient config read: string keys merged over the defaults.
///
/// Returns `None` when the value is not an object.
pub fn validate_config(value: &Value) -> Option<AppConfig> {
    if !value.is_object() {
        return None;
    }
    let mut config = AppConfig::default();
    config.merge_json(value);
    Some(config)
}

/// Syntactically valid absolute URL (has a scheme).
pub fn is_absolute_url(candidate: &str) -> bool {
    Url::parse(candidate).is_ok()
}

struct FieldReader<'a> {
    obj: &'a Map<String, Value>,
    prefix: &'a str,
    issues: Vec<ValidationIssue>,
}

impl FieldReader<'_> {
    fn push(&mut self, key: &str, message: &str) {
        let path = format!("{}.{}", self.prefix, key);
        self.issues.push(ValidationIssue::new(&path, message));
    }

    fn required_string(&mut self, key: &str) -> Option<String> {
        match self.obj.get(key) {
            Some(Value::String(s)) => Some(s.clone()),
            Some(_) => {
                self.push(key, MSG_NOT_STRING);
                None
            }
            None => {
                self.push(key, MSG_REQUIRED);
                None
            }
        }
    }

    /// Absent and `null` both read as "not set".
    fn optional_string(&mut self, key: &str) -> Option<String> {
        match self.obj.get(key) {
            None | Some(Value::Null) => None,
            Some(Value::String(s)) => Some(s.clone()),
            Some(_) => {
                self.push(key, MSG_NOT_STRING);
                None
            }
        }
    }

    fn topics(&mut self) -> Option<Vec<String>> {
        let items = match self.obj.get("topics") {
            Some(Value::Array(items)) => items,
            Some(_) => {
                self.push("topics", MSG_NOT_LIST);
                return None;
            }
            None => {
                self.push("topics", MSG_REQUIRED);
                return None;
            }
        };

        let mut topics = Vec::with_capacity(items.len());
        for (i, item) in items.iter().enumerate() {
            let key = format!("topics[{}]", i);
            match item.as_str() {
                Some(t) if !t.trim().is_empty() => topics.push(t.to_string()),
                Some(_) => self.push(&key, MSG_EMPTY_TOPIC),
                None => self.push(&key, MSG_NOT_STRING),
            }
        }
        Some(topics)
    }
}

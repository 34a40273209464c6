//! Exam record model.
//!
//! `ExamRecord` is the persisted and exchanged shape (camelCase on the
//! wire). `ExamDraft` is what the edit form hands over before an id is
//! attached.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{PlannerError, Result};
use crate::validation::schema::validate_record;

/// One scheduled exam.
///
/// Status is never stored here; see [`crate::model::status`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExamRecord {
    pub id: String,
    pub title: String,
    pub subject: String,
    /// `YYYY-MM-DD`
    pub date: String,
    pub time: String,
    pub location: String,
    pub topics: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub form_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub distribution_url: Option<String>,
}

impl ExamRecord {
    /// Calendar date, if `date` is a real day (the schema only checks shape).
    pub fn calendar_date(&self) -> Option<NaiveDate> {
        NaiveDate::parse_from_str(&self.date, "%Y-%m-%d").ok()
    }

    pub fn notes_or_empty(&self) -> &str {
        self.notes.as_deref().unwrap_or("")
    }
}

/// Generate a new opaque exam id.
pub fn new_exam_id() -> String {
    Uuid::new_v4().to_string()
}

/// Split the form's comma-separated topics field.
pub fn split_topics(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|t| t.trim())
        .filter(|t| !t.is_empty())
        .map(|t| t.to_string())
        .collect()
}

/// Form payload for creating or editing an exam.
///
/// Editing is full replacement: every field is taken from the draft, only
/// the id is carried over.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExamDraft {
    pub title: String,
    pub subject: String,
    pub date: String,
    pub time: String,
    pub location: String,
    /// Comma separated, as typed.
    pub topics: String,
    pub notes: String,
    pub form_url: String,
    pub distribution_url: String,
}

impl ExamDraft {
    /// Prefill a draft from an existing record (edit form).
    pub fn from_record(record: &ExamRecord) -> Self {
        Self {
            title: record.title.clone(),
            subject: record.subject.clone(),
            date: record.date.clone(),
            time: record.time.clone(),
            location: record.location.clone(),
            topics: record.topics.join(", "),
            notes: record.notes_or_empty().to_string(),
            form_url: record.form_url.clone().unwrap_or_default(),
            distribution_url: record.distribution_url.clone().unwrap_or_default(),
        }
    }

    /// Build a validated record, reusing `existing_id` when editing.
    pub fn into_record(self, existing_id: Option<&str>) -> Result<ExamRecord> {
        let id = existing_id
            .map(|id| id.to_string())
            .unwrap_or_else(new_exam_id);

        let record = ExamRecord {
            id,
            title: self.title.trim().to_string(),
            subject: self.subject.trim().to_string(),
            date: self.date.trim().to_string(),
            time: self.time,
            location: self.location,
            topics: split_topics(&self.topics),
            notes: Some(self.notes),
            form_url: Some(self.form_url.trim().to_string()),
            distribution_url: Some(self.distribution_url.trim().to_string()),
        };

        let value = serde_json::to_value(&record)?;
        validate_record(&value, 0).map_err(PlannerError::SchemaViolation)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn draft() -> ExamDraft {
        ExamDraft {
            title: "Primer Parcial".to_string(),
            subject: "Física General I".to_string(),
            date: "2026-03-10".to_string(),
            time: "08:00".to_string(),
            location: "Aula 101".to_string(),
            topics: " Cinemática, , Dinámica ,Energía".to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn test_split_topics() {
        assert_eq!(
            split_topics(" Cinemática, , Dinámica ,Energía"),
            vec!["Cinemática", "Dinámica", "Energía"]
        );
        assert!(split_topics("").is_empty());
        assert!(split_topics(" , ,").is_empty());
    }

    #[test]
    fn test_draft_creates_new_id() {
        let a = draft().into_record(None).unwrap();
        let b = draft().into_record(None).unwrap();
        assert_ne!(a.id, b.id);
        assert_eq!(a.topics, vec!["Cinemática", "Dinámica", "Energía"]);
        assert_eq!(a.notes.as_deref(), Some(""));
        assert_eq!(a.form_url.as_deref(), Some(""));
    }

    #[test]
    fn test_draft_keeps_existing_id() {
        let record = draft().into_record(Some("exam-1")).unwrap();
        assert_eq!(record.id, "exam-1");
    }

    #[test]
    fn test_draft_rejects_blank_title() {
        let mut d = draft();
        d.title = "   ".to_string();
        match d.into_record(None) {
            Err(PlannerError::SchemaViolation(issues)) => {
                assert!(issues.iter().any(|i| i.path.ends_with("title")));
            }
            other => panic!("expected schema violation, got {:?}", other),
        }
    }

    #[test]
    fn test_draft_rejects_relative_url() {
        let mut d = draft();
        d.form_url = "forms/exam".to_string();
        assert!(d.into_record(None).is_err());
    }

    #[test]
    fn test_draft_round_trip_from_record() {
        let record = draft().into_record(Some("x")).unwrap();
        let again = ExamDraft::from_record(&record).into_record(Some("x")).unwrap();
        assert_eq!(record, again);
    }

    #[test]
    fn test_calendar_date() {
        let mut record = draft().into_record(None).unwrap();
        assert_eq!(
            record.calendar_date(),
            NaiveDate::from_ymd_opt(2026, 3, 10)
        );
        record.date = "2026-02-30".to_string();
        assert_eq!(record.calendar_date(), None);
    }
}

//! Derived exam status and summary counts.
//!
//! Nothing here is persisted. Two status rules coexist and are kept apart:
//! the live view uses the three-way [`ExamStatus`], the printable export
//! uses the two-way [`PrintStatus`].

use chrono::{Local, NaiveDate};
use serde::Serialize;

use crate::model::exam::ExamRecord;

/// Exams this many days out (or fewer) are flagged as coming up soon.
pub const SOON_WINDOW_DAYS: i64 = 10;

/// Today's local date.
pub fn today_local() -> NaiveDate {
    Local::now().date_naive()
}

/// `YYYY-MM-DD` key for a date, comparable with `ExamRecord::date`.
pub fn date_key(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

/// Three-way status used by the live view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ExamStatus {
    Upcoming,
    Ongoing,
    Completed,
}

impl ExamStatus {
    pub fn derive(record: &ExamRecord, today: NaiveDate) -> Self {
        let today = date_key(today);
        match record.date.as_str().cmp(today.as_str()) {
            std::cmp::Ordering::Less => ExamStatus::Completed,
            std::cmp::Ordering::Equal => ExamStatus::Ongoing,
            std::cmp::Ordering::Greater => ExamStatus::Upcoming,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ExamStatus::Upcoming => "upcoming",
            ExamStatus::Ongoing => "ongoing",
            ExamStatus::Completed => "completed",
        }
    }
}

/// Two-way status used by the printable HTML export.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PrintStatus {
    Pending,
    Completed,
}

impl PrintStatus {
    /// `date < today` is completed, everything else is pending.
    pub fn derive(record: &ExamRecord, today: NaiveDate) -> Self {
        if record.date.as_str() < date_key(today).as_str() {
            PrintStatus::Completed
        } else {
            PrintStatus::Pending
        }
    }

    pub fn css_class(&self) -> &'static str {
        match self {
            PrintStatus::Pending => "status-upcoming",
            PrintStatus::Completed => "status-completed",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            PrintStatus::Pending => "Pendiente",
            PrintStatus::Completed => "Completado",
        }
    }
}

/// Signed day distance from `today` to the exam; `None` for impossible dates.
pub fn days_until(record: &ExamRecord, today: NaiveDate) -> Option<i64> {
    record
        .calendar_date()
        .map(|date| date.signed_duration_since(today).num_days())
}

/// True for exams 1..=SOON_WINDOW_DAYS days away.
pub fn is_soon(record: &ExamRecord, today: NaiveDate) -> bool {
    matches!(days_until(record, today), Some(d) if d > 0 && d <= SOON_WINDOW_DAYS)
}

/// Counters shown above the exam list.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ExamStats {
    pub total: usize,
    pub upcoming: usize,
    pub today: usize,
}

impl ExamStats {
    pub fn compute(records: &[ExamRecord], today: NaiveDate) -> Self {
        let key = date_key(today);
        let mut stats = ExamStats {
            total: records.len(),
            ..Default::default()
        };
        for record in records {
            if record.date == key {
                stats.today += 1;
            } else if record.date > key {
                stats.upcoming += 1;
            }
        }
        stats
    }
}

/// List filter offered by the live view.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ExamFilter {
    #[default]
    All,
    Upcoming,
    Today,
}

impl ExamFilter {
    pub fn matches(&self, record: &ExamRecord, today: NaiveDate) -> bool {
        match self {
            ExamFilter::All => true,
            ExamFilter::Upcoming => record.date > date_key(today),
            ExamFilter::Today => record.date == date_key(today),
        }
    }
}

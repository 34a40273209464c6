//! Safe download filenames.
//!
//! Turns the user-configured subtitle into an ASCII slug:
//! - lower-cased
//! - diacritics stripped (NFD, combining marks dropped)
//! - every run outside `[a-z0-9]` collapsed to one hyphen
//! - leading/trailing hyphens trimmed

use chrono::NaiveDate;
use lazy_static::lazy_static;
use regex::Regex;
use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

use crate::model::status::{date_key, today_local};

/// Prefix for JSON and printable HTML exports.
pub const PREFIX_CALENDAR: &str = "calendario";
/// Prefix for student builds.
pub const PREFIX_STUDENT: &str = "estudiantes";

lazy_static! {
    static ref NON_SLUG_RUN: Regex = Regex::new(r"[^a-z0-9]+").unwrap();
}

/// Slug form of a subtitle; may be empty.
pub fn clean_subtitle(subtitle: &str) -> String {
    let lowered = subtitle.to_lowercase();
    let stripped: String = lowered.nfd().filter(|c| !is_combining_mark(*c)).collect();
    let hyphenated = NON_SLUG_RUN.replace_all(&stripped, "-");
    hyphenated.trim_matches('-').to_string()
}

/// `{prefix}-{subtitle}-{YYYY-MM-DD}.{extension}` stamped with today's date.
pub fn make_filename(subtitle: &str, prefix: &str, extension: &str) -> String {
    make_filename_on(subtitle, prefix, extension, today_local())
}

/// Same as [`make_filename`] with an explicit date.
pub fn make_filename_on(subtitle: &str, prefix: &str, extension: &str, date: NaiveDate) -> String {
    let clean = clean_subtitle(subtitle);
    let date = date_key(date);
    if clean.is_empty() {
        format!("{}-{}.{}", prefix, date, extension)
    } else {
        format!("{}-{}-{}.{}", prefix, clean, date, extension)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 10, 16).unwrap()
    }

    #[test]
    fn test_basic_filename() {
        assert_eq!(
            make_filename_on("My Subtitle", "prefix", "json", day()),
            "prefix-my-subtitle-2026-10-16.json"
        );
    }

    #[test]
    fn test_accents_removed() {
        assert_eq!(
            make_filename_on("Física General I", "cal", "html", day()),
            "cal-fisica-general-i-2026-10-16.html"
        );
        assert_eq!(clean_subtitle("Año Señor Ü"), "ano-senor-u");
    }

    #[test]
    fn test_punctuation() {
        assert_eq!(
            make_filename_on("Exam #1: Intro!", "test", "txt", day()),
            "test-exam-1-intro-2026-10-16.txt"
        );
    }

    #[test]
    fn test_empty_subtitle() {
        assert_eq!(
            make_filename_on("", "export", "csv", day()),
            "export-2026-10-16.csv"
        );
        assert_eq!(
            make_filename_on("¡¿!?", "export", "csv", day()),
            "export-2026-10-16.csv"
        );
    }

    #[test]
    fn test_collapsed_runs() {
        assert_eq!(
            make_filename_on("  Space   --   Test  ", "file", "json", day()),
            "file-space-test-2026-10-16.json"
        );
    }

    #[test]
    fn test_non_latin_dropped() {
        assert_eq!(clean_subtitle("数学 101"), "101");
    }

    #[test]
    fn test_today_variant_shape() {
        let name = make_filename("Física General I", PREFIX_CALENDAR, "json");
        assert!(name.starts_with("calendario-fisica-general-i-"));
        assert!(name.ends_with(".json"));
        assert_eq!(name.len(), "calendario-fisica-general-i-".len() + 10 + ".json".len());
    }
}

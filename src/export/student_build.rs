//! Student build generation.
//!
//! Produces a read-only, self-contained copy of the application: the
//! pre-built single-file bundle with its mount point emptied and the
//! current record set injected as a global. Works on a copy of the
//! template text; the template itself is never modified.

use std::fmt;

use lazy_static::lazy_static;
use regex::Regex;
use serde_json::Value;

use crate::error::{PlannerError, Result};
use crate::logging::structured::LogContext;
use crate::model::config::AppConfig;
use crate::model::exam::ExamRecord;
use crate::security::escape::escape_json_for_script;
use crate::storage::store::InjectedData;
use crate::validation::schema::{validate_config, validate_record_list};

/// Id of the element the application mounts into.
pub const DEFAULT_MOUNT_ID: &str = "planner-root";
/// Global holding the injected record array.
pub const DATA_GLOBAL: &str = "PLANNER_DATA";
/// Global holding the injected config object.
pub const CONFIG_GLOBAL: &str = "PLANNER_CONFIG";

const SCRIPT_CLOSE: &str = "</script>";

lazy_static! {
    /// Markers left in an HTML file served by a dev server, i.e. scripts that
    /// were never inlined into the bundle.
    static ref DEV_MARKERS: Vec<Regex> = vec![
        Regex::new(r#"(?i)src\s*=\s*["']/@vite/client["']"#).unwrap(),
        Regex::new(r#"(?i)<script[^>]*type\s*=\s*["']module["'][^>]*src\s*=\s*["']/src/"#).unwrap(),
    ];

    static ref INJECTED_SCRIPT: Regex = Regex::new(
        r"(?s)<script>window\.PLANNER_DATA = (.*?);(?:window\.PLANNER_CONFIG = (.*?);)?</script>"
    ).unwrap();
}

/// How the template was produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BuildProfile {
    /// Bundled single-file artifact; safe to snapshot.
    Production,
    /// Unbundled dev-server page; a snapshot would reference missing files.
    Development,
}

impl BuildProfile {
    /// Infer the profile from dev-server markers in the template.
    pub fn detect(template: &str) -> Self {
        if DEV_MARKERS.iter().any(|p| p.is_match(template)) {
            BuildProfile::Development
        } else {
            BuildProfile::Production
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "production" | "prod" => Some(BuildProfile::Production),
            "development" | "dev" => Some(BuildProfile::Development),
            _ => None,
        }
    }
}

impl fmt::Display for BuildProfile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BuildProfile::Production => write!(f, "production"),
            BuildProfile::Development => write!(f, "development"),
        }
    }
}

/// Snapshots a bundled application template into student builds.
#[derive(Debug, Clone)]
pub struct StudentBuildGenerator {
    template: String,
    profile: BuildProfile,
    mount_id: String,
}

impl StudentBuildGenerator {
    pub fn new(template: impl Into<String>, profile: BuildProfile) -> Self {
        Self {
            template: template.into(),
            profile,
            mount_id: DEFAULT_MOUNT_ID.to_string(),
        }
    }

    pub fn with_mount_id(mut self, mount_id: &str) -> Self {
        self.mount_id = mount_id.to_string();
        self
    }

    pub fn profile(&self) -> BuildProfile {
        self.profile
    }

    /// Produce the student build HTML.
    ///
    /// Fails with [`PlannerError::BlockedExport`] for development templates.
    pub fn generate(&self, records: &[ExamRecord], config: Option<&AppConfig>) -> Result<String> {
        let ctx = LogContext::for_operation("student-build");

        if self.profile == BuildProfile::Development {
            log::warn!(
                "{} STUDENT_BUILD_BLOCKED profile={} hint=\"build the single-file bundle and export from it\"",
                ctx,
                self.profile
            );
            return Err(PlannerError::BlockedExport);
        }

        let snapshot = self.template.clone();
        let mut html = match empty_mount(&snapshot, &self.mount_id) {
            Some(emptied) => emptied,
            None => {
                log::warn!("{} MOUNT_NOT_FOUND mount_id={}", ctx, self.mount_id);
                snapshot
            }
        };

        let script = data_script(records, config)?;
        let at = match html.rfind(SCRIPT_CLOSE) {
            Some(pos) => pos + SCRIPT_CLOSE.len(),
            None => html.len(),
        };
        html.insert_str(at, &script);

        log::info!(
            "{} STUDENT_BUILD_COMPLETE exams={} config={} bytes={}",
            ctx,
            records.len(),
            config.is_some(),
            html.len()
        );
        Ok(html)
    }
}

/// Student build with the default mount id and no injected config.
///
/// Returns an empty string when the export is blocked.
pub fn generate_student_build(template: &str, profile: BuildProfile, records: &[ExamRecord]) -> String {
    StudentBuildGenerator::new(template, profile)
        .generate(records, None)
        .unwrap_or_default()
}

/// Read back the globals injected by [`StudentBuildGenerator::generate`].
///
/// Returns `None` when the page carries no injected data, or when the data
/// does not validate.
pub fn extract_injected_data(html: &str) -> Option<InjectedData> {
    let caps = INJECTED_SCRIPT.captures_iter(html).last()?;

    let exams_value: Value = serde_json::from_str(caps.get(1)?.as_str()).ok()?;
    let exams = match validate_record_list(&exams_value) {
        Ok(exams) => exams,
        Err(issues) => {
            log::warn!("INJECTED_DATA_INVALID issues={}", issues.len());
            return None;
        }
    };

    let config = caps
        .get(2)
        .and_then(|m| serde_json::from_str::<Value>(m.as_str()).ok())
        .and_then(|v| validate_config(&v));

    Some(InjectedData {
        exams: Some(exams),
        config,
    })
}

fn data_script(records: &[ExamRecord], config: Option<&AppConfig>) -> Result<String> {
    let mut script = format!(
        "<script>window.{} = {};",
        DATA_GLOBAL,
        escape_json_for_script(&serde_json::to_string(records)?)
    );
    if let Some(config) = config {
        script.push_str(&format!(
            "window.{} = {};",
            CONFIG_GLOBAL,
            escape_json_for_script(&serde_json::to_string(config)?)
        ));
    }
    script.push_str(SCRIPT_CLOSE);
    Ok(script)
}

/// Remove everything inside the element with `id="{mount_id}"`, keeping its
/// opening and closing tags. `None` if the element is missing, self-closing
/// or unterminated.
fn empty_mount(html: &str, mount_id: &str) -> Option<String> {
    let open = Regex::new(&format!(
        r#"(?i)<([a-z][a-z0-9-]*)\b[^>]*\sid\s*=\s*["']{}["'][^>]*>"#,
        regex::escape(mount_id)
    ))
    .ok()?;

    let caps = open.captures(html)?;
    let whole = caps.get(0)?;
    if whole.as_str().ends_with("/>") {
        return None;
    }
    let tag = caps.get(1)?.as_str();

    let content_start = whole.end();
    let close_at = find_matching_close(html, content_start, tag)?;
    Some(format!("{}{}", &html[..content_start], &html[close_at..]))
}

/// Offset of the closing tag that balances an already-open `tag`,
/// counting nested same-name elements.
fn find_matching_close(html: &str, from: usize, tag: &str) -> Option<usize> {
    let pattern = Regex::new(&format!(r"(?i)<(/?){}\b[^>]*>", regex::escape(tag))).ok()?;

    let mut depth = 1usize;
    for caps in pattern.captures_iter(&html[from..]) {
        let m = caps.get(0)?;
        let closing = caps.get(1).is_some_and(|g| !g.as_str().is_empty());
        if closing {
            depth -= 1;
            if depth == 0 {
                return Some(from + m.start());
            }
        } else if !m.as_str().ends_with("/>") {
            depth += 1;
        }
    }
    None
}

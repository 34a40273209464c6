//! Display configuration.

use serde::{Deserialize, Serialize};
use serde_json::Value;

pub const DEFAULT_TITLE_NAME: &str = "Calendario de exámenes";
pub const DEFAULT_SUBTITLE_NAME: &str = "colegiados";
pub const DEFAULT_SEMESTER: &str = "II semestre 2026";
pub const DEFAULT_FOOTER_TEXT: &str = "Cátedra de Física General I - Escuela de Física";

/// Header/footer strings shown by the application.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppConfig {
    pub title_name: String,
    pub subtitle_name: String,
    pub semester: String,
    pub footer_text: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            title_name: DEFAULT_TITLE_NAME.to_string(),
            subtitle_name: DEFAULT_SUBTITLE_NAME.to_string(),
            semester: DEFAULT_SEMESTER.to_string(),
            footer_text: DEFAULT_FOOTER_TEXT.to_string(),
        }
    }
}

impl AppConfig {
    /// Overlay the string-valued keys of a JSON object onto `self`.
    ///
    /// Missing or non-string keys keep their current value. Returns the
    /// number of keys applied.
    pub fn merge_json(&mut self, value: &Value) -> usize {
        let Some(obj) = value.as_object() else {
            return 0;
        };

        let mut applied = 0;
        let mut take = |key: &str, slot: &mut String| {
            if let Some(s) = obj.get(key).and_then(|v| v.as_str()) {
                *slot = s.to_string();
                applied += 1;
            }
        };
        take("titleName", &mut self.title_name);
        take("subtitleName", &mut self.subtitle_name);
        take("semester", &mut self.semester);
        take("footerText", &mut self.footer_text);
        applied
    }

    pub fn apply(&mut self, patch: AppConfigPatch) {
        if let Some(v) = patch.title_name {
            self.title_name = v;
        }
        if let Some(v) = patch.subtitle_name {
            self.subtitle_name = v;
        }
        if let Some(v) = patch.semester {
            self.semester = v;
        }
        if let Some(v) = patch.footer_text {
            self.footer_text = v;
        }
    }
}

/// Partial config update (settings form).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppConfigPatch {
    pub title_name: Option<String>,
    pub subtitle_name: Option<String>,
    pub semester: Option<String>,
    pub footer_text: Option<String>,
}

impl AppConfigPatch {
    pub fn is_empty(&self) -> bool {
        self.title_name.is_none()
            && self.subtitle_name.is_none()
            && self.semester.is_none()
            && self.footer_text.is_none()
    }
}

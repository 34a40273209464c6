//! Runtime switches read from the environment.
//!
//! - `PLANNER_READ_ONLY` - `true`/`1` forces read-only mode
//! - `PLANNER_DATA_DIR` - directory for the file-backed store
//! - `PLANNER_BUILD_PROFILE` - `production`/`development`, overrides
//!   template detection for student builds

use std::path::PathBuf;

use crate::export::student_build::BuildProfile;

pub const ENV_READ_ONLY: &str = "PLANNER_READ_ONLY";
pub const ENV_DATA_DIR: &str = "PLANNER_DATA_DIR";
pub const ENV_BUILD_PROFILE: &str = "PLANNER_BUILD_PROFILE";

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RuntimeEnv {
    pub read_only: bool,
    pub data_dir: Option<PathBuf>,
    pub build_profile: Option<BuildProfile>,
}

impl RuntimeEnv {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary variable lookup (tests inject a map here).
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let read_only = lookup(ENV_READ_ONLY)
            .map(|v| is_truthy(&v))
            .unwrap_or(false);

        let data_dir = lookup(ENV_DATA_DIR)
            .filter(|v| !v.trim().is_empty())
            .map(PathBuf::from);

        let build_profile = lookup(ENV_BUILD_PROFILE).and_then(|raw| {
            let parsed = BuildProfile::parse(&raw);
            if parsed.is_none() {
                log::warn!("ENV_INVALID key={} value={:?}", ENV_BUILD_PROFILE, raw);
            }
            parsed
        });

        Self {
            read_only,
            data_dir,
            build_profile,
        }
    }

    /// Explicit profile if configured, else inferred from the template.
    pub fn profile_for(&self, template: &str) -> BuildProfile {
        self.build_profile
            .unwrap_or_else(|| BuildProfile::detect(template))
    }
}

fn is_truthy(raw: &str) -> bool {
    matches!(raw.trim().to_ascii_lowercase().as_str(), "true" | "1")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env(pairs: &[(&str, &str)]) -> RuntimeEnv {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        RuntimeEnv::from_lookup(|key| map.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        assert_eq!(env(&[]), RuntimeEnv::default());
    }

    #[test]
    fn test_read_only_flag() {
        assert!(env(&[(ENV_READ_ONLY, "true")]).read_only);
        assert!(env(&[(ENV_READ_ONLY, "1")]).read_only);
        assert!(env(&[(ENV_READ_ONLY, "TRUE")]).read_only);
        assert!(!env(&[(ENV_READ_ONLY, "")]).read_only);
        assert!(!env(&[(ENV_READ_ONLY, "yes")]).read_only);
    }

    #[test]
    fn test_data_dir_and_profile() {
        let e = env(&[(ENV_DATA_DIR, "/tmp/planner"), (ENV_BUILD_PROFILE, "development")]);
        assert_eq!(e.data_dir, Some(PathBuf::from("/tmp/planner")));
        assert_eq!(e.build_profile, Some(BuildProfile::Development));
        assert_eq!(e.profile_for("<p>bundled</p>"), BuildProfile::Development);

        let e = env(&[(ENV_DATA_DIR, " "), (ENV_BUILD_PROFILE, "nightly")]);
        assert_eq!(e.data_dir, None);
        assert_eq!(e.build_profile, None);
        assert_eq!(e.profile_for("<p>bundled</p>"), BuildProfile::Production);
    }
}

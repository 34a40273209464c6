//! Persistence/config store.
//!
//! Owns the record set and the app config. The mode (editable or
//! read-only) is resolved once when the store is opened:
//!
//! - Injected exams present, or the read-only switch set -> `ReadOnly`.
//!   Records come from the injected data only; local storage is ignored.
//! - Otherwise -> `Editable`. Records and config load from the key-value
//!   backend, and every mutation writes both entries back immediately.
//!
//! An injected config always wins over the stored one and is never written
//! back to storage.
//!
//! Mutations are all-or-nothing: the new state is validated and written
//! first, and only then replaces the in-memory state.

use chrono::NaiveDate;
use serde_json::Value;

use crate::config::RuntimeEnv;
use crate::error::{PlannerError, Result};
use crate::logging::structured::LogContext;
use crate::model::config::{AppConfig, AppConfigPatch};
use crate::model::exam::ExamRecord;
use crate::model::status::{ExamFilter, ExamStats};
use crate::pipeline::import::ImportResult;
use crate::storage::kv::{KeyValueStore, CONFIG_KEY, EXAMS_KEY};
use crate::validation::schema::{validate_config, validate_record, validate_record_list};

/// Suffix of the key an unreadable stored entry is moved to before the
/// store starts over from defaults.
pub const CORRUPT_SUFFIX: &str = ".corrupt";

/// Data embedded into the page before startup (a student build).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct InjectedData {
    pub exams: Option<Vec<ExamRecord>>,
    pub config: Option<AppConfig>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreMode {
    Editable,
    ReadOnly,
}

pub struct PlannerStore<S: KeyValueStore> {
    kv: S,
    mode: StoreMode,
    exams: Vec<ExamRecord>,
    config: AppConfig,
    /// Config came from injection; it is never persisted.
    config_injected: bool,
}

impl<S: KeyValueStore> PlannerStore<S> {
    pub fn open(mut kv: S, injected: Option<InjectedData>, env: &RuntimeEnv) -> Result<Self> {
        let ctx = LogContext::for_operation("store-open");
        let injected = injected.unwrap_or_default();
        let config_injected = injected.config.is_some();

        let store = match injected.exams {
            Some(exams) => {
                log::info!("{} STORE_MODE mode=read_only source=injected exams={}", ctx, exams.len());
                Self {
                    kv,
                    mode: StoreMode::ReadOnly,
                    exams,
                    config: injected.config.unwrap_or_default(),
                    config_injected,
                }
            }
            None if env.read_only => {
                log::info!("{} STORE_MODE mode=read_only source=env", ctx);
                Self {
                    kv,
                    mode: StoreMode::ReadOnly,
                    exams: Vec::new(),
                    config: injected.config.unwrap_or_default(),
                    config_injected,
                }
            }
            None => {
                let exams = load_exams(&mut kv, &ctx)?;
                let config = match injected.config {
                    Some(config) => {
                        log::info!("{} STORE_CONFIG source=injected", ctx);
                        config
                    }
                    None => load_config(&mut kv, &ctx)?,
                };
                log::info!("{} STORE_MODE mode=editable exams={}", ctx, exams.len());
                Self {
                    kv,
                    mode: StoreMode::Editable,
                    exams,
                    config,
                    config_injected,
                }
            }
        };
        Ok(store)
    }

    pub fn mode(&self) -> StoreMode {
        self.mode
    }

    pub fn is_read_only(&self) -> bool {
        self.mode == StoreMode::ReadOnly
    }

    pub fn exams(&self) -> &[ExamRecord] {
        &self.exams
    }

    pub fn get(&self, id: &str) -> Option<&ExamRecord> {
        self.exams.iter().find(|e| e.id == id)
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// Records passing `filter`, in store order.
    pub fn filtered(&self, filter: ExamFilter, today: NaiveDate) -> Vec<&ExamRecord> {
        self.exams.iter().filter(|e| filter.matches(e, today)).collect()
    }

    pub fn stats(&self, today: NaiveDate) -> ExamStats {
        ExamStats::compute(&self.exams, today)
    }

    /// Replace the whole record set.
    pub fn replace_all(&mut self, exams: Vec<ExamRecord>) -> Result<()> {
        self.ensure_editable()?;
        let value = serde_json::to_value(&exams)?;
        validate_record_list(&value).map_err(PlannerError::SchemaViolation)?;
        self.commit(exams, self.config.clone(), "replace_all")
    }

    pub fn add(&mut self, exam: ExamRecord) -> Result<()> {
        self.ensure_editable()?;
        check_record(&exam)?;
        if self.get(&exam.id).is_some() {
            return Err(PlannerError::DuplicateId(exam.id));
        }
        let ctx = LogContext::for_operation("store-add").with_exam(&exam.id);
        log::info!("{} EXAM_ADDED date={}", ctx, exam.date);

        let mut exams = self.exams.clone();
        exams.push(exam);
        self.commit(exams, self.config.clone(), "add")
    }

    /// Full replacement of the record with the same id.
    pub fn update(&mut self, exam: ExamRecord) -> Result<()> {
        self.ensure_editable()?;
        check_record(&exam)?;
        let index = self
            .exams
            .iter()
            .position(|e| e.id == exam.id)
            .ok_or_else(|| PlannerError::NotFound(exam.id.clone()))?;
        let ctx = LogContext::for_operation("store-update").with_exam(&exam.id);
        log::info!("{} EXAM_UPDATED date={}", ctx, exam.date);

        let mut exams = self.exams.clone();
        exams[index] = exam;
        self.commit(exams, self.config.clone(), "update")
    }

    /// Update when the id exists, add otherwise (the edit form's save).
    pub fn upsert(&mut self, exam: ExamRecord) -> Result<()> {
        if self.get(&exam.id).is_some() {
            self.update(exam)
        } else {
            self.add(exam)
        }
    }

    pub fn remove(&mut self, id: &str) -> Result<ExamRecord> {
        self.ensure_editable()?;
        let index = self
            .exams
            .iter()
            .position(|e| e.id == id)
            .ok_or_else(|| PlannerError::NotFound(id.to_string()))?;

        let mut exams = self.exams.clone();
        let removed = exams.remove(index);
        self.commit(exams, self.config.clone(), "remove")?;

        let ctx = LogContext::for_operation("store-remove").with_exam(id);
        log::info!("{} EXAM_REMOVED", ctx);
        Ok(removed)
    }

    pub fn update_config(&mut self, patch: AppConfigPatch) -> Result<()> {
        self.ensure_editable()?;
        let mut config = self.config.clone();
        config.apply(patch);
        self.commit(self.exams.clone(), config, "update_config")
    }

    pub fn reset_config(&mut self) -> Result<()> {
        self.ensure_editable()?;
        self.commit(self.exams.clone(), AppConfig::default(), "reset_config")
    }

    /// Commit a successful import; a failed one leaves the store untouched.
    ///
    /// An imported config is merged over the current config.
    pub fn apply_import(&mut self, result: ImportResult) -> Result<()> {
        self.ensure_editable()?;
        let data = result.into_result()?;

        let mut config = self.config.clone();
        if let Some(imported) = data.config.as_ref() {
            if imported.is_object() {
                config.merge_json(imported);
            } else {
                log::warn!("IMPORT_CONFIG_IGNORED reason=not_object");
            }
        }
        self.commit(data.exams, config, "apply_import")
    }

    fn ensure_editable(&self) -> Result<()> {
        match self.mode {
            StoreMode::Editable => Ok(()),
            StoreMode::ReadOnly => {
                log::warn!("STORE_MUTATION_REFUSED mode=read_only");
                Err(PlannerError::ReadOnly)
            }
        }
    }

    /// Write the new state, then adopt it. On a write error the in-memory
    /// state is left as it was.
    fn commit(&mut self, exams: Vec<ExamRecord>, config: AppConfig, reason: &str) -> Result<()> {
        let ctx = LogContext::for_operation("store-persist");
        let exams_json = serde_json::to_string(&exams)?;
        let config_json = serde_json::to_string(&config)?;

        if let Err(e) = self.write_entries(&exams_json, &config_json) {
            crate::log_warn!(ctx, "STORE_PERSIST_FAILED", reason = reason, error = e.to_string());
            return Err(e);
        }

        self.exams = exams;
        self.config = config;
        crate::log_info!(ctx, "STORE_PERSISTED", reason = reason, exams = self.exams.len());
        Ok(())
    }

    fn write_entries(&mut self, exams_json: &str, config_json: &str) -> Result<()> {
        self.kv.set(EXAMS_KEY, exams_json)?;
        if !self.config_injected {
            self.kv.set(CONFIG_KEY, config_json)?;
        }
        Ok(())
    }
}

fn check_record(exam: &ExamRecord) -> Result<()> {
    let value = serde_json::to_value(exam)?;
    validate_record(&value, 0)
        .map(|_| ())
        .map_err(PlannerError::SchemaViolation)
}

/// Move an unreadable entry aside so the next write cannot destroy it.
fn quarantine<S: KeyValueStore>(kv: &mut S, key: &str, raw: &str, ctx: &LogContext) -> Result<()> {
    let backup = format!("{}{}", key, CORRUPT_SUFFIX);
    kv.set(&backup, raw)?;
    crate::log_warn!(ctx, "STORED_ENTRY_QUARANTINED", key = key, backup = backup);
    Ok(())
}

fn load_exams<S: KeyValueStore>(kv: &mut S, ctx: &LogContext) -> Result<Vec<ExamRecord>> {
    let Some(raw) = kv.get(EXAMS_KEY)? else {
        return Ok(Vec::new());
    };
    let value: Value = match serde_json::from_str(&raw) {
        Ok(v) => v,
        Err(e) => {
            crate::log_warn!(ctx, "STORED_EXAMS_UNREADABLE", error = e.to_string());
            quarantine(kv, EXAMS_KEY, &raw, ctx)?;
            return Ok(Vec::new());
        }
    };
    match validate_record_list(&value) {
        Ok(exams) => Ok(exams),
        Err(issues) => {
            crate::log_warn!(ctx, "STORED_EXAMS_INVALID", issues = issues.len());
            quarantine(kv, EXAMS_KEY, &raw, ctx)?;
            Ok(Vec::new())
        }
    }
}

fn load_config<S: KeyValueStore>(kv: &mut S, ctx: &LogContext) -> Result<AppConfig> {
    let Some(raw) = kv.get(CONFIG_KEY)? else {
        return Ok(AppConfig::default());
    };
    let config = serde_json::from_str::<Value>(&raw)
        .ok()
        .and_then(|v| validate_config(&v));
    match config {
        Some(config) => Ok(config),
        None => {
            crate::log_warn!(ctx, "STORED_CONFIG_UNREADABLE", bytes = raw.len());
            quarantine(kv, CONFIG_KEY, &raw, ctx)?;
            Ok(AppConfig::default())
        }
    }
}

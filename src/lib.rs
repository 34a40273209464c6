//! ExamPlanner Core - exam records, import/export and student builds
//!
//! This crate provides the data side of the exam planner: the record set
//! and its persistence, JSON import/export, and the two HTML exports. The
//! implementation prioritizes:
//!
//! 1. **Validation** - Nothing enters the store without passing the schema
//! 2. **Logging** - Every decision point logged with operation context
//! 3. **Portability** - Student builds are plain text substitutions on the
//!    bundled app, no live document required
//!
//! ## Architecture
//!
//! The crate is organized into modules:
//! - `model` - Exam records, app config, derived status
//! - `validation` - Field-by-field schema validation
//! - `pipeline` - Import parsing (envelope / legacy shapes)
//! - `export` - JSON, printable HTML, student build
//! - `storage` - Key-value backends and the planner store
//! - `security` - Filename slugs and HTML/script escaping
//! - `config` - Environment switches
//! - `logging` - Structured logging with operation context

pub mod config;
pub mod error;
pub mod export;
pub mod logging;
pub mod model;
pub mod pipeline;
pub mod security;
pub mod storage;
pub mod validation;

pub use config::RuntimeEnv;
pub use error::{ErrorKind, PlannerError, Result};
pub use export::{
    extract_injected_data, generate_student_build, to_json, to_printable_html, BuildProfile,
    StudentBuildGenerator,
};
pub use logging::init_logger;
pub use model::{AppConfig, AppConfigPatch, ExamDraft, ExamRecord};
pub use pipeline::{parse_import, ImportData, ImportResult};
pub use security::make_filename;
pub use storage::{FileStore, InjectedData, KeyValueStore, MemoryStore, PlannerStore, StoreMode};
pub use validation::{validate_record_list, ValidationIssue};

//! String key-value backends.
//!
//! The planner persists exactly two entries (the exam list and the app
//! config), each a JSON string, the same way a browser keeps them in
//! local storage.

use std::collections::HashMap;
use std::fs;
use std::io::{ErrorKind as IoErrorKind, Write};
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;

use crate::error::Result;

/// Key holding the exam list (JSON array).
pub const EXAMS_KEY: &str = "exams";
/// Key holding the app config (JSON object).
pub const CONFIG_KEY: &str = "app_config";

pub trait KeyValueStore {
    fn get(&self, key: &str) -> Result<Option<String>>;
    fn set(&mut self, key: &str, value: &str) -> Result<()>;
    fn remove(&mut self, key: &str) -> Result<()>;
}

/// In-memory backend.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    entries: HashMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_entry(mut self, key: &str, value: &str) -> Self {
        self.entries.insert(key.to_string(), value.to_string());
        self
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<()> {
        self.entries.remove(key);
        Ok(())
    }
}

/// One `<key>.json` file per entry inside a data directory.
///
/// Writes go through a temp file in the same directory and are renamed into
/// place, so a crash never leaves a half-written entry.
#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    /// Open (and create if needed) the data directory.
    pub fn open(dir: impl AsRef<Path>) -> Result<Self> {
        let dir = dir.as_ref().to_path_buf();
        fs::create_dir_all(&dir)?;
        log::debug!("FILE_STORE_OPEN dir={}", dir.display());
        Ok(Self { dir })
    }

    /// `<platform data dir>/examplanner`, falling back to `./.examplanner`.
    pub fn default_dir() -> PathBuf {
        dirs::data_dir()
            .map(|d| d.join("examplanner"))
            .unwrap_or_else(|| PathBuf::from(".examplanner"))
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{}.json", key))
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        match fs::read_to_string(self.path_for(key)) {
            Ok(content) => Ok(Some(content)),
            Err(e) if e.kind() == IoErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        let mut tmp = NamedTempFile::new_in(&self.dir)?;
        tmp.write_all(value.as_bytes())?;
        tmp.as_file().sync_all()?;
        tmp.persist(self.path_for(key)).map_err(|e| e.error)?;
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<()> {
        match fs::remove_file(self.path_for(key)) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == IoErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_store() {
        let mut kv = MemoryStore::new().with_entry(EXAMS_KEY, "[]");
        assert_eq!(kv.get(EXAMS_KEY).unwrap().as_deref(), Some("[]"));
        kv.set(CONFIG_KEY, "{}").unwrap();
        kv.remove(EXAMS_KEY).unwrap();
        assert_eq!(kv.get(EXAMS_KEY).unwrap(), None);
        assert_eq!(kv.get(CONFIG_KEY).unwrap().as_deref(), Some("{}"));
    }

    #[test]
    fn test_file_store_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let mut kv = FileStore::open(dir.path().join("nested")).unwrap();
        assert_eq!(kv.get(EXAMS_KEY).unwrap(), None);

        kv.set(EXAMS_KEY, "[1]").unwrap();
        kv.set(EXAMS_KEY, "[1,2]").unwrap();
        assert_eq!(kv.get(EXAMS_KEY).unwrap().as_deref(), Some("[1,2]"));
        assert!(kv.dir().join("exams.json").exists());

        kv.remove(EXAMS_KEY).unwrap();
        kv.remove(EXAMS_KEY).unwrap();
        assert_eq!(kv.get(EXAMS_KEY).unwrap(), None);
    }
}

//! Key/value stores that hold consent state between sessions

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::Result;

/// Where consent values live; values expire after the lifetime given to `set`
pub trait ConsentStorage {
    fn get(&self, key: &str) -> Result<Option<String>>;
    fn set(&mut self, key: &str, value: &str, lifetime: Duration) -> Result<()>;
    fn remove(&mut self, key: &str) -> Result<()>;
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
struct StoredValue {
    value: String,
    expires_at: DateTime<Utc>,
}

impl StoredValue {
    fn new(value: &str, lifetime: Duration) -> Self {
        Self {
            value: value.to_string(),
            expires_at: Utc::now() + lifetime,
        }
    }

    fn live(&self) -> Option<String> {
        (self.expires_at > Utc::now()).then(|| self.value.clone())
    }
}

/// In-process storage, used by tests and one-shot tooling
#[derive(Debug, Default)]
pub struct MemoryStorage {
    entries: HashMap<String, StoredValue>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ConsentStorage for MemoryStorage {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.entries.get(key).and_then(StoredValue::live))
    }

    fn set(&mut self, key: &str, value: &str, lifetime: Duration) -> Result<()> {
        self.entries
            .insert(key.to_string(), StoredValue::new(value, lifetime));
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<()> {
        self.entries.remove(key);
        Ok(())
    }
}

/// JSON file storage; every write rewrites the whole file
#[derive(Debug)]
pub struct FileStorage {
    path: PathBuf,
    entries: BTreeMap<String, StoredValue>,
}

impl FileStorage {
    /// Open the store at `path`; a missing file is an empty store
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let entries = if path.exists() {
            let content = fs::read_to_string(&path)?;
            if content.trim().is_empty() {
                BTreeMap::new()
            } else {
                serde_json::from_str(&content)?
            }
        } else {
            BTreeMap::new()
        };
        Ok(Self { path, entries })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn persist(&self) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        fs::write(&self.path, serde_json::to_string_pretty(&self.entries)?)?;
        Ok(())
    }
}

impl ConsentStorage for FileStorage {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.entries.get(key).and_then(StoredValue::live))
    }

    fn set(&mut self, key: &str, value: &str, lifetime: Duration) -> Result<()> {
        self.entries
            .insert(key.to_string(), StoredValue::new(value, lifetime));
        self.persist()
    }

    fn remove(&mut self, key: &str) -> Result<()> {
        if self.entries.remove(key).is_some() {
            self.persist()?;
        }
        Ok(())
    }
}

//! Durable key-value blob storage.
//!
//! History and the chat transcript persist through this seam with
//! whole-value get/set/remove semantics only, so the backing medium can be
//! swapped without touching either store. `FileStore` is the default
//! backend; `MemoryStore` backs tests and ephemeral sessions.

use std::collections::HashMap;
use std::fs;
use std::io::ErrorKind;
use std::path::PathBuf;
use std::sync::Mutex;

use crate::error::AdvisorResult;

pub trait BlobStore: Send + Sync {
    fn get(&self, key: &str) -> AdvisorResult<Option<String>>;
    fn set(&self, key: &str, value: &str) -> AdvisorResult<()>;
    fn remove(&self, key: &str) -> AdvisorResult<()>;
}

/// One file per key under a root directory.
#[derive(Debug, Clone)]
pub struct FileStore {
    root: PathBuf,
}

impl FileStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// `~/.agriyield/store`, falling back to the working directory when no
    /// home directory is known.
    pub fn default_root() -> PathBuf {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".agriyield")
            .join("store")
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.root.join(format!("{key}.json"))
    }
}

impl Default for FileStore {
    fn default() -> Self {
        Self::new(Self::default_root())
    }
}

impl BlobStore for FileStore {
    fn get(&self, key: &str) -> AdvisorResult<Option<String>> {
        match fs::read_to_string(self.path_for(key)) {
            Ok(value) => Ok(Some(value)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn set(&self, key: &str, value: &str) -> AdvisorResult<()> {
        fs::create_dir_all(&self.root)?;
        fs::write(self.path_for(key), value)?;
        Ok(())
    }

    fn remove(&self, key: &str) -> AdvisorResult<()> {
        match fs::remove_file(self.path_for(key)) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

/// In-memory store with the same semantics.
#[derive(Debug, Default)]
pub struct MemoryStore {
    values: Mutex<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl BlobStore for MemoryStore {
    fn get(&self, key: &str) -> AdvisorResult<Option<String>> {
        let values = self.values.lock().expect("memory store lock poisoned");
        Ok(values.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> AdvisorResult<()> {
        let mut values = self.values.lock().expect("memory store lock poisoned");
        values.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> AdvisorResult<()> {
        let mut values = self.values.lock().expect("memory store lock poisoned");
        values.remove(key);
        Ok(())
    }
}

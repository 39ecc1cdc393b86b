//! Durable key/value storage for the persisted session.
//!
//! Writes and removals apply to a group of keys as one unit: a reader sees
//! either all of the group or none of it.
//!
//! - [`FileStorage`] keeps a JSON object on disk and replaces it with an
//!   atomic rename.
//! - [`MemoryStorage`] keeps the map in memory (tests and throwaway runs).

use std::collections::BTreeMap;
use std::fs;
use std::io::{self, Write as _};
use std::path::{Path, PathBuf};

use parking_lot::{Mutex, RwLock};
use tempfile::NamedTempFile;
use thiserror::Error;

/// Errors from a storage backend.
#[derive(Debug, Error)]
pub enum StorageError {
    /// Reading or writing the backing file failed.
    #[error("storage I/O error: {0}")]
    Io(#[from] io::Error),

    /// The backing file is not a JSON object of strings.
    #[error("storage file is corrupt: {0}")]
    Corrupt(#[from] serde_json::Error),
}

/// Key/value persistence for session data.
pub trait SessionStorage: Send + Sync {
    /// Read every stored entry.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend cannot be read or is corrupt.
    fn load(&self) -> Result<BTreeMap<String, String>, StorageError>;

    /// Insert or overwrite `entries` as one unit.
    ///
    /// # Errors
    ///
    /// Returns an error if the write fails; nothing is changed in that case.
    fn store(&self, entries: &[(&str, &str)]) -> Result<(), StorageError>;

    /// Remove `keys` as one unit. Missing keys are ignored.
    ///
    /// # Errors
    ///
    /// Returns an error if the write fails; nothing is changed in that case.
    fn remove(&self, keys: &[&str]) -> Result<(), StorageError>;
}

/// Session storage backed by a JSON file.
#[derive(Debug)]
pub struct FileStorage {
    path: PathBuf,
    write_lock: Mutex<()>,
}

impl FileStorage {
    /// Storage at `path`. The file is created on first write.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: Mutex::new(()),
        }
    }

    /// Path of the backing file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load for a read-modify-write cycle.
    ///
    /// A corrupt file is replaced rather than blocking every future login.
    fn load_for_update(&self) -> Result<BTreeMap<String, String>, StorageError> {
        match self.load() {
            Ok(entries) => Ok(entries),
            Err(StorageError::Corrupt(e)) => {
                tracing::warn!(
                    path = %self.path.display(),
                    error = %e,
                    "Session file is corrupt, overwriting"
                );
                Ok(BTreeMap::new())
            }
            Err(e) => Err(e),
        }
    }

    fn replace(&self, entries: &BTreeMap<String, String>) -> Result<(), StorageError> {
        let dir = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        fs::create_dir_all(dir)?;

        let mut file = NamedTempFile::new_in(dir)?;
        serde_json::to_writer_pretty(&mut file, entries).map_err(io::Error::from)?;
        file.write_all(b"\n")?;
        file.as_file().sync_all()?;
        file.persist(&self.path).map_err(|e| e.error)?;
        Ok(())
    }
}

impl SessionStorage for FileStorage {
    fn load(&self) -> Result<BTreeMap<String, String>, StorageError> {
        match fs::read(&self.path) {
            Ok(bytes) => Ok(serde_json::from_slice(&bytes)?),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(BTreeMap::new()),
            Err(e) => Err(e.into()),
        }
    }

    fn store(&self, entries: &[(&str, &str)]) -> Result<(), StorageError> {
        let _guard = self.write_lock.lock();
        let mut current = self.load_for_update()?;
        for (key, value) in entries {
            current.insert((*key).to_owned(), (*value).to_owned());
        }
        self.replace(&current)
    }

    fn remove(&self, keys: &[&str]) -> Result<(), StorageError> {
        let _guard = self.write_lock.lock();
        let mut current = self.load_for_update()?;
        let before = current.len();
        for key in keys {
            current.remove(*key);
        }
        if current.len() == before && self.path.exists() {
            return Ok(());
        }
        if current.is_empty() {
            return match fs::remove_file(&self.path) {
                Err(e) if e.kind() != io::ErrorKind::NotFound => Err(e.into()),
                _ => Ok(()),
            };
        }
        self.replace(&current)
    }
}

/// In-memory session storage.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    entries: RwLock<BTreeMap<String, String>>,
}

impl MemoryStorage {
    /// Empty storage.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Storage pre-filled with `entries`.
    #[must_use]
    pub fn with_entries<K, V>(entries: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            entries: RwLock::new(
                entries
                    .into_iter()
                    .map(|(k, v)| (k.into(), v.into()))
                    .collect(),
            ),
        }
    }

    /// Copy of the current entries.
    #[must_use]
    pub fn snapshot(&self) -> BTreeMap<String, String> {
        self.entries.read().clone()
    }
}

impl SessionStorage for MemoryStorage {
    fn load(&self) -> Result<BTreeMap<String, String>, StorageError> {
        Ok(self.snapshot())
    }

    fn store(&self, entries: &[(&str, &str)]) -> Result<(), StorageError> {
        let mut current = self.entries.write();
        for (key, value) in entries {
            current.insert((*key).to_owned(), (*value).to_owned());
        }
        Ok(())
    }

    fn remove(&self, keys: &[&str]) -> Result<(), StorageError> {
        let mut current = self.entries.write();
        for key in keys {
            current.remove(*key);
        }
        Ok(())
    }
}

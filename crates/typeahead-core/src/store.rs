//! Store — the persistent key/value collaborator underneath the TTL cache.
//!
//! [`KvStore`] is a synchronous, size-bounded string-to-string store. Two
//! implementations ship here:
//! [`MemoryStore`] for tests and ephemeral sessions, and [`FileStore`], a
//! JSON object on disk written through on every mutation.

use crate::error::StoreError;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};

/// Synchronous string key/value store shared by every widget in the process.
///
/// Writes are last-write-wins per key. Implementations enumerate keys in
/// their own order; callers must not rely on insertion order.
pub trait KvStore: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError>;
    fn set(&self, key: &str, value: &str) -> Result<(), StoreError>;
    fn remove(&self, key: &str) -> Result<(), StoreError>;
    fn keys(&self) -> Result<Vec<String>, StoreError>;
}

// ---------------------------------------------------------------------------
// Shared helpers
// ---------------------------------------------------------------------------

type Entries = BTreeMap<String, String>;

fn lock(entries: &Mutex<Entries>) -> Result<MutexGuard<'_, Entries>, StoreError> {
    entries
        .lock()
        .map_err(|_| StoreError::Unavailable("store lock poisoned".to_string()))
}

/// Bytes the map would occupy after writing `key = value`.
fn footprint_after(entries: &Entries, key: &str, value: &str) -> usize {
    let current: usize = entries.iter().map(|(k, v)| k.len() + v.len()).sum();
    let replaced = entries.get(key).map(|old| key.len() + old.len()).unwrap_or(0);
    current - replaced + key.len() + value.len()
}

fn check_quota(
    entries: &Entries,
    key: &str,
    value: &str,
    quota: Option<usize>,
) -> Result<(), StoreError> {
    if let Some(limit) = quota {
        let needed = footprint_after(entries, key, value);
        if needed > limit {
            return Err(StoreError::QuotaExceeded { needed, limit });
        }
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// MemoryStore
// ---------------------------------------------------------------------------

/// In-process store. Contents die with the process.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: Mutex<Entries>,
    quota: Option<usize>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// A store that rejects writes once keys plus values exceed `bytes`.
    pub fn with_quota(bytes: usize) -> Self {
        Self {
            entries: Mutex::new(Entries::new()),
            quota: Some(bytes),
        }
    }
}

impl KvStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        Ok(lock(&self.entries)?.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        let mut entries = lock(&self.entries)?;
        check_quota(&entries, key, value, self.quota)?;
        entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StoreError> {
        lock(&self.entries)?.remove(key);
        Ok(())
    }

    fn keys(&self) -> Result<Vec<String>, StoreError> {
        Ok(lock(&self.entries)?.keys().cloned().collect())
    }
}

// ---------------------------------------------------------------------------
// FileStore
// ---------------------------------------------------------------------------

/// JSON-file-backed store. The whole map is rewritten atomically (temp file
/// then rename) after every `set` or `remove`.
#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
    quota: Option<usize>,
    entries: Mutex<Entries>,
}

impl FileStore {
    /// Open (or lazily create) the store at `path`.
    ///
    /// A missing or empty file is an empty store; unparseable contents are
    /// an error so that a corrupt file is never silently overwritten.
    pub fn open(path: impl Into<PathBuf>, quota: Option<usize>) -> Result<Self, StoreError> {
        let path = path.into();
        let entries = match std::fs::read(&path) {
            Ok(bytes) if bytes.iter().all(u8::is_ascii_whitespace) => Entries::new(),
            Ok(bytes) => serde_json::from_slice(&bytes)?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Entries::new(),
            Err(e) => return Err(e.into()),
        };
        tracing::debug!(path = %path.display(), keys = entries.len(), "file store opened");
        Ok(Self {
            path,
            quota,
            entries: Mutex::new(entries),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn persist(&self, entries: &Entries) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        let tmp = self.path.with_extension("json.tmp");
        std::fs::write(&tmp, serde_json::to_vec(entries)?)?;
        std::fs::rename(&tmp, &self.path)?;
        Ok(())
    }
}

impl KvStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        Ok(lock(&self.entries)?.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        let mut entries = lock(&self.entries)?;
        check_quota(&entries, key, value, self.quota)?;
        let previous = entries.insert(key.to_string(), value.to_string());
        if let Err(e) = self.persist(&entries) {
            // Keep memory and disk in agreement.
            match previous {
                Some(old) => entries.insert(key.to_string(), old),
                None => entries.remove(key),
            };
            return Err(e);
        }
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StoreError> {
        let mut entries = lock(&self.entries)?;
        if let Some(old) = entries.remove(key) {
            if let Err(e) = self.persist(&entries) {
                entries.insert(key.to_string(), old);
                return Err(e);
            }
        }
        Ok(())
    }

    fn keys(&self) -> Result<Vec<String>, StoreError> {
        Ok(lock(&self.entries)?.keys().cloned().collect())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

//! Expiring key-value stores for resolved markup.
//!
//! Entries are opaque strings keyed by sanitized icon name. Two stores are
//! provided: [`MemoryCache`] for a single process and [`FileCache`] for a
//! durable cache shared between processes. Concurrent first-time writes of
//! the same key are allowed; the last write wins.

use std::collections::HashMap;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::{Duration, Instant, SystemTime, UNIX_EPOCH};

use horizon_icons_core::{Clock, SystemClock};
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};

use crate::error::{IconError, Result};
use crate::markup::sanitize_icon_name;

/// A store with per-entry expiry.
pub trait MarkupCache: Send + Sync {
    /// Fetch a live entry.
    fn get(&self, key: &str) -> Option<String>;

    /// Store `value` under `key` for `ttl`.
    fn set(&self, key: &str, value: &str, ttl: Duration) -> Result<()>;
}

/// In-process cache with clock-driven expiry.
pub struct MemoryCache {
    clock: Arc<dyn Clock>,
    entries: Mutex<HashMap<String, MemoryEntry>>,
}

struct MemoryEntry {
    value: String,
    /// `None` when the deadline is past what `Instant` can represent.
    expires_at: Option<Instant>,
}

impl MemoryEntry {
    fn is_live(&self, now: Instant) -> bool {
        self.expires_at.is_none_or(|deadline| deadline > now)
    }
}

impl Default for MemoryCache {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryCache {
    /// Create a cache driven by the system clock.
    pub fn new() -> Self {
        Self::with_clock(Arc::new(SystemClock))
    }

    /// Create a cache driven by `clock`.
    pub fn with_clock(clock: Arc<dyn Clock>) -> Self {
        Self {
            clock,
            entries: Mutex::new(HashMap::new()),
        }
    }

    /// Number of stored entries, expired ones included until swept.
    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    /// Whether nothing is stored.
    pub fn is_empty(&self) -> bool {
        self.entries.lock().is_empty()
    }

    /// Drop expired entries, returning how many were removed.
    pub fn sweep_expired(&self) -> usize {
        let now = self.clock.now();
        let mut entries = self.entries.lock();
        let before = entries.len();
        entries.retain(|_, e| e.is_live(now));
        let removed = before - entries.len();
        if removed > 0 {
            tracing::debug!(target: "horizon_icons::markup", removed, "swept expired cache entries");
        }
        removed
    }
}

impl MarkupCache for MemoryCache {
    fn get(&self, key: &str) -> Option<String> {
        let now = self.clock.now();
        let mut entries = self.entries.lock();
        match entries.get(key) {
            Some(entry) if entry.is_live(now) => Some(entry.value.clone()),
            Some(_) => {
                entries.remove(key);
                None
            }
            None => None,
        }
    }

    fn set(&self, key: &str, value: &str, ttl: Duration) -> Result<()> {
        let expires_at = self.clock.now().checked_add(ttl);
        self.entries.lock().insert(
            key.to_string(),
            MemoryEntry {
                value: value.to_string(),
                expires_at,
            },
        );
        Ok(())
    }
}

impl std::fmt::Debug for MemoryCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MemoryCache")
            .field("entries", &self.len())
            .finish()
    }
}

#[derive(Serialize, Deserialize)]
struct FileEntry {
    /// Unix seconds after which the entry is stale.
    expires_at: u64,
    value: String,
}

/// Durable cache storing one JSON file per key.
///
/// Writes go to a temporary file in the cache directory and are renamed into
/// place, so readers never observe a partial entry.
#[derive(Debug, Clone)]
pub struct FileCache {
    dir: PathBuf,
}

impl FileCache {
    /// Open (creating if needed) a cache directory.
    pub fn open(dir: impl Into<PathBuf>) -> Result<Self> {
        let dir = dir.into();
        std::fs::create_dir_all(&dir).map_err(|e| IconError::io(&dir, e))?;
        Ok(Self { dir })
    }

    /// Open the cache in the platform cache directory.
    pub fn in_default_location() -> Result<Self> {
        let dirs = directories::ProjectDirs::from("com", "Horizon Analytic Studios", "horizon-icons")
            .ok_or_else(|| IconError::Config("no platform cache directory".into()))?;
        Self::open(dirs.cache_dir().join("markup"))
    }

    /// The cache directory.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn entry_path(&self, key: &str) -> Result<PathBuf> {
        match sanitize_icon_name(key) {
            Some(safe) if safe == key => Ok(self.dir.join(format!("{key}.json"))),
            _ => Err(IconError::InvalidIdentifier(key.to_string())),
        }
    }

    fn read_entry(path: &Path) -> Option<FileEntry> {
        let bytes = std::fs::read(path).ok()?;
        match serde_json::from_slice(&bytes) {
            Ok(entry) => Some(entry),
            Err(err) => {
                tracing::warn!(
                    target: "horizon_icons::markup",
                    path = %path.display(),
                    error = %err,
                    "discarding corrupt cache entry"
                );
                let _ = std::fs::remove_file(path);
                None
            }
        }
    }

    /// Delete expired and unreadable entries, returning how many were removed.
    pub fn sweep_expired(&self) -> Result<usize> {
        let now = unix_now();
        let mut removed = 0;
        let read_dir = std::fs::read_dir(&self.dir).map_err(|e| IconError::io(&self.dir, e))?;
        for dir_entry in read_dir.flatten() {
            let path = dir_entry.path();
            if path.extension().and_then(|e| e.to_str()) != Some("json") {
                continue;
            }
            let stale = Self::read_entry(&path).is_none_or(|entry| entry.expires_at <= now);
            if stale && std::fs::remove_file(&path).is_ok() {
                removed += 1;
            }
        }
        Ok(removed)
    }
}

impl MarkupCache for FileCache {
    fn get(&self, key: &str) -> Option<String> {
        let path = self.entry_path(key).ok()?;
        let entry = Self::read_entry(&path)?;
        if entry.expires_at <= unix_now() {
            return None;
        }
        Some(entry.value)
    }

    fn set(&self, key: &str, value: &str, ttl: Duration) -> Result<()> {
        let path = self.entry_path(key)?;
        let entry = FileEntry {
            expires_at: unix_now().saturating_add(ttl.as_secs()),
            value: value.to_string(),
        };

        let mut file = tempfile::NamedTempFile::new_in(&self.dir)
            .map_err(|e| IconError::io(&self.dir, e))?;
        serde_json::to_writer(&mut file, &entry)?;
        file.flush().map_err(|e| IconError::io(file.path(), e))?;
        file.persist(&path)
            .map_err(|e| IconError::io(&path, e.error))?;
        Ok(())
    }
}

fn unix_now() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}

//! Caller-owned cache of cleaned tables.
//!
//! A cached table is reused only while the source file keeps the same
//! canonical path, modification time and length. Nothing is memoized
//! globally; the owner decides when to invalidate.

use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

use tracing::debug;

use crate::error::Result;
use crate::io;
use crate::models::config::FakturConfig;
use crate::models::table::Table;

/// Identity of a source file at the time it was loaded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceKey {
    pub path: PathBuf,
    pub modified: Option<SystemTime>,
    pub len: u64,
}

impl SourceKey {
    /// Read the current identity of a file.
    pub fn of(path: &Path) -> Result<Self> {
        let path = path.canonicalize()?;
        let metadata = std::fs::metadata(&path)?;
        Ok(Self {
            modified: metadata.modified().ok(),
            len: metadata.len(),
            path,
        })
    }
}

/// Cache of cleaned tables keyed by source identity.
pub struct TableCache {
    config: FakturConfig,
    entries: HashMap<PathBuf, (SourceKey, Table)>,
}

impl TableCache {
    /// Create an empty cache that loads with `config`.
    pub fn new(config: FakturConfig) -> Self {
        Self {
            config,
            entries: HashMap::new(),
        }
    }

    /// Return the cleaned table for `path`, loading it if the file is new or changed.
    pub fn load(&mut self, path: &Path) -> Result<&Table> {
        let key = SourceKey::of(path)?;

        match self.entries.entry(key.path.clone()) {
            Entry::Occupied(mut entry) => {
                if entry.get().0 == key {
                    debug!("Cache hit for {}", key.path.display());
                } else {
                    debug!("Source changed, reloading {}", key.path.display());
                    let table = io::load(&key.path, &self.config)?;
                    entry.insert((key, table));
                }
                Ok(&entry.into_mut().1)
            }
            Entry::Vacant(entry) => {
                debug!("Cache miss for {}", key.path.display());
                let table = io::load(&key.path, &self.config)?;
                Ok(&entry.insert((key, table)).1)
            }
        }
    }

    /// Whether a table for `path` is currently cached, regardless of freshness.
    pub fn contains(&self, path: &Path) -> bool {
        path.canonicalize()
            .map(|p| self.entries.contains_key(&p))
            .unwrap_or(false)
    }

    /// Drop the cached table for `path`. Returns whether an entry was removed.
    pub fn invalidate(&mut self, path: &Path) -> bool {
        match path.canonicalize() {
            Ok(p) => self.entries.remove(&p).is_some(),
            Err(_) => false,
        }
    }

    /// Drop every cached table.
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

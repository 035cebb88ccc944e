use std::collections::BTreeMap;
use std::fmt;
use std::io;
use std::path::{Path, PathBuf};

use serde_json::{Map, Value};
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::models::{SiteIndex, SiteRecord, StateName};

/// Document key holding the state index. Every other key is a state name.
const STATE_INDEX_KEY: &str = "state_url";

#[derive(Error, Debug)]
pub enum CacheError {
    #[error("Failed to write cache file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Failed to serialize cache: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Where an entry lives in the cache document.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum CacheKey {
    StateIndex,
    State(StateName),
}

impl CacheKey {
    fn parse(raw: &str) -> Self {
        if raw == STATE_INDEX_KEY {
            CacheKey::StateIndex
        } else {
            CacheKey::State(StateName::new(raw))
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            CacheKey::StateIndex => STATE_INDEX_KEY,
            CacheKey::State(name) => name.as_str(),
        }
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CacheEntry {
    StateIndex(SiteIndex),
    Sites(Vec<SiteRecord>),
}

/// Outcome of reading the cache file. Anything but `Loaded` yields an empty store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadStatus {
    Loaded(usize),
    Absent,
    Malformed(String),
}

pub struct CacheStore {
    path: PathBuf,
    entries: BTreeMap<CacheKey, CacheEntry>,
}

impl CacheStore {
    /// An empty store that will flush to `path`.
    pub fn empty(path: PathBuf) -> Self {
        Self {
            path,
            entries: BTreeMap::new(),
        }
    }

    /// Read the cache document at `path`.
    ///
    /// A missing or unparseable file is never an error: the store starts
    /// empty and the returned status says which case applied.
    pub fn load(path: PathBuf) -> (Self, LoadStatus) {
        let contents = match std::fs::read_to_string(&path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                debug!(path = %path.display(), "No cache file, starting fresh");
                return (Self::empty(path), LoadStatus::Absent);
            }
            Err(e) => {
                warn!(path = %path.display(), error = %e, "Cache file unreadable, starting fresh");
                return (Self::empty(path), LoadStatus::Malformed(e.to_string()));
            }
        };

        match Self::parse_document(&contents) {
            Ok(entries) => {
                let count = entries.len();
                info!(path = %path.display(), entries = count, "Cache loaded");
                (Self { path, entries }, LoadStatus::Loaded(count))
            }
            Err(reason) => {
                warn!(path = %path.display(), %reason, "Cache file malformed, starting fresh");
                (Self::empty(path), LoadStatus::Malformed(reason))
            }
        }
    }

    fn parse_document(contents: &str) -> Result<BTreeMap<CacheKey, CacheEntry>, String> {
        let document: Map<String, Value> =
            serde_json::from_str(contents).map_err(|e| e.to_string())?;

        let mut entries = BTreeMap::new();
        for (raw_key, value) in document {
            let key = CacheKey::parse(&raw_key);
            let entry = match key {
                CacheKey::StateIndex => serde_json::from_value(value)
                    .map(CacheEntry::StateIndex)
                    .map_err(|e| format!("entry '{}': {}", raw_key, e))?,
                CacheKey::State(_) => serde_json::from_value(value)
                    .map(CacheEntry::Sites)
                    .map_err(|e| format!("entry '{}': {}", raw_key, e))?,
            };
            entries.insert(key, entry);
        }
        Ok(entries)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, key: &CacheKey) -> Option<&CacheEntry> {
        self.entries.get(key)
    }

    /// Upsert; last write wins.
    pub fn set(&mut self, key: CacheKey, entry: CacheEntry) {
        debug!(key = %key, "Cache set");
        self.entries.insert(key, entry);
    }

    // ===== State Index =====

    pub fn state_index(&self) -> Option<&SiteIndex> {
        match self.entries.get(&CacheKey::StateIndex) {
            Some(CacheEntry::StateIndex(index)) => Some(index),
            _ => None,
        }
    }

    pub fn set_state_index(&mut self, index: SiteIndex) {
        self.set(CacheKey::StateIndex, CacheEntry::StateIndex(index));
    }

    // ===== State Sites =====

    pub fn sites(&self, state: &StateName) -> Option<&[SiteRecord]> {
        match self.entries.get(&CacheKey::State(state.clone())) {
            Some(CacheEntry::Sites(sites)) => Some(sites.as_slice()),
            _ => None,
        }
    }

    pub fn sites_mut(&mut self, state: &StateName) -> Option<&mut Vec<SiteRecord>> {
        match self.entries.get_mut(&CacheKey::State(state.clone())) {
            Some(CacheEntry::Sites(sites)) => Some(sites),
            _ => None,
        }
    }

    pub fn set_sites(&mut self, state: StateName, sites: Vec<SiteRecord>) {
        self.set(CacheKey::State(state), CacheEntry::Sites(sites));
    }

    // ===== Persistence =====

    fn to_document(&self) -> Result<Map<String, Value>, serde_json::Error> {
        let mut document = Map::new();
        for (key, entry) in &self.entries {
            let value = match entry {
                CacheEntry::StateIndex(index) => serde_json::to_value(index)?,
                CacheEntry::Sites(sites) => serde_json::to_value(sites)?,
            };
            document.insert(key.as_str().to_string(), value);
        }
        Ok(document)
    }

    /// Write the whole store, replacing whatever was on disk.
    ///
    /// The document goes to a sibling temp file first and is renamed into
    /// place, so a failed write leaves the previous file intact.
    pub fn flush(&self) -> Result<(), CacheError> {
        let contents = serde_json::to_string_pretty(&self.to_document()?)?;

        let io_err = |source: io::Error| CacheError::Io {
            path: self.path.clone(),
            source,
        };

        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent).map_err(io_err)?;
            }
        }

        let mut tmp_name = self.path.as_os_str().to_os_string();
        tmp_name.push(".tmp");
        let tmp_path = PathBuf::from(tmp_name);

        std::fs::write(&tmp_path, contents).map_err(io_err)?;
        std::fs::rename(&tmp_path, &self.path).map_err(io_err)?;

        info!(path = %self.path.display(), entries = self.entries.len(), "Cache flushed");
        Ok(())
    }
}

// ============================================================================
// Tests
// ============================================================================

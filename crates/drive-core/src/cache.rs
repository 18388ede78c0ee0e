//! Cache types and requests.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Request to restore a cache entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RestoreRequest {
    /// Primary cache key, matched exactly.
    pub key: String,
    /// Fallback key prefixes to try, in order, if the primary misses.
    #[serde(default)]
    pub restore_keys: Vec<String>,
    /// Paths to restore into. Must be non-empty.
    pub paths: Vec<PathBuf>,
}

impl RestoreRequest {
    pub fn new(key: impl Into<String>, paths: Vec<PathBuf>) -> Self {
        Self {
            key: key.into(),
            restore_keys: Vec::new(),
            paths,
        }
    }

    pub fn with_restore_key(mut self, prefix: impl Into<String>) -> Self {
        self.restore_keys.push(prefix.into());
        self
    }
}

/// Request to save a cache entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SaveRequest {
    /// Cache key.
    pub key: String,
    /// Paths to cache. Must be non-empty.
    pub paths: Vec<PathBuf>,
    /// Compression algorithm.
    #[serde(default)]
    pub compression: Compression,
}

/// Compression algorithm.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Compression {
    None,
    #[default]
    Zstd,
}

/// A cached entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheEntry {
    /// Cache key.
    pub key: String,
    /// Size of the stored archive in bytes.
    pub size_bytes: u64,
    /// When the entry was created.
    pub created_at: DateTime<Utc>,
    /// Compression used.
    pub compression: Compression,
    /// Hex SHA-256 of the stored archive.
    pub checksum: String,
}

/// Result of a cache restore operation.
///
/// A miss (`entry == None`) is a legitimate outcome, not an error.
#[derive(Debug, Clone)]
pub struct RestoreOutcome {
    /// The matched cache entry, if any.
    pub entry: Option<CacheEntry>,
    /// The key that matched (may be a restore-key prefix match).
    pub matched_key: Option<String>,
    /// Whether the primary key matched exactly.
    pub exact_match: bool,
    /// Time taken to restore in milliseconds.
    pub duration_ms: u64,
}

impl RestoreOutcome {
    pub fn is_hit(&self) -> bool {
        self.entry.is_some()
    }
}

/// Result of a cache save operation.
#[derive(Debug, Clone)]
pub struct SaveOutcome {
    /// The saved cache entry.
    pub entry: CacheEntry,
    /// Time taken to save in milliseconds.
    pub duration_ms: u64,
}

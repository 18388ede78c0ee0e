//! Cache provider contract and the filesystem implementation.

use crate::archiver;
use crate::keys;
use async_trait::async_trait;
use drive_core::{
    CacheEntry, Compression, Error, RestoreOutcome, RestoreRequest, Result, SaveOutcome,
    SaveRequest,
};
use sha2::{Digest, Sha256};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Contract of the restore-from-key cache collaborator.
///
/// Restore semantics: an exact match on the primary key wins; otherwise each
/// restore key is treated as a prefix and the most recently saved entry
/// sharing that prefix is used. No match at all is a miss, reported as a
/// successful outcome with no entry. All filesystem writes during a restore
/// are performed by the provider, never by the caller.
#[async_trait]
pub trait CacheProvider: Send + Sync {
    /// Restore a cache entry. A miss is `Ok` with `entry == None`.
    async fn restore(&self, request: &RestoreRequest) -> Result<RestoreOutcome>;

    /// Save a cache entry.
    async fn save(&self, request: &SaveRequest) -> Result<SaveOutcome>;

    /// Check if a key exists.
    async fn exists(&self, key: &str) -> Result<bool>;

    /// List entries matching a prefix, most recently saved first.
    async fn list(&self, prefix: &str) -> Result<Vec<CacheEntry>>;
}

/// Filesystem-based cache provider for local runs and tests.
///
/// Each entry is a tar archive (optionally zstd-compressed) named by its
/// sanitized key, with a JSON sidecar holding the [`CacheEntry`] metadata.
pub struct FilesystemProvider {
    root_dir: PathBuf,
}

impl FilesystemProvider {
    pub fn new(root_dir: PathBuf) -> Self {
        Self { root_dir }
    }

    fn meta_path(&self, key: &str) -> PathBuf {
        self.root_dir.join(format!("{}.json", keys::sanitize_key(key)))
    }

    fn archive_path(&self, key: &str, compression: Compression) -> PathBuf {
        let ext = match compression {
            Compression::Zstd => "tar.zst",
            Compression::None => "tar",
        };
        self.root_dir
            .join(format!("{}.{}", keys::sanitize_key(key), ext))
    }

    async fn read_entry(&self, key: &str) -> Result<Option<CacheEntry>> {
        let meta_path = self.meta_path(key);
        if !meta_path.exists() {
            return Ok(None);
        }
        let raw = tokio::fs::read(&meta_path).await?;
        let entry: CacheEntry = serde_json::from_slice(&raw)?;
        Ok(Some(entry))
    }

    /// Unpack a stored entry back into its original absolute paths.
    async fn restore_entry(&self, entry: &CacheEntry) -> Result<()> {
        let archive_path = self.archive_path(&entry.key, entry.compression);
        debug!(key = %entry.key, archive = %archive_path.display(), "unpacking cache entry");
        let bytes = tokio::fs::read(&archive_path).await?;

        let checksum = hex::encode(Sha256::digest(&bytes));
        if checksum != entry.checksum {
            return Err(Error::CacheCorrupt {
                key: entry.key.clone(),
                reason: format!("checksum mismatch: {} != {}", checksum, entry.checksum),
            });
        }

        // Archive names are root-relative, so extraction at `/` recreates
        // the saved absolute paths.
        archiver::extract_archive(&bytes[..], Path::new("/"), entry.compression)
    }
}

fn validate_key_and_paths(key: &str, paths: &[PathBuf]) -> Result<()> {
    if key.is_empty() {
        return Err(Error::InvalidRequest("key must be non-empty".into()));
    }
    if paths.is_empty() {
        return Err(Error::InvalidRequest("paths must be non-empty".into()));
    }
    Ok(())
}

#[async_trait]
impl CacheProvider for FilesystemProvider {
    async fn restore(&self, request: &RestoreRequest) -> Result<RestoreOutcome> {
        let start = std::time::Instant::now();
        validate_key_and_paths(&request.key, &request.paths)?;

        // Try exact key match first
        if let Some(entry) = self.read_entry(&request.key).await? {
            self.restore_entry(&entry).await?;
            return Ok(RestoreOutcome {
                matched_key: Some(entry.key.clone()),
                entry: Some(entry),
                exact_match: true,
                duration_ms: start.elapsed().as_millis() as u64,
            });
        }

        // Try restore keys, most recent entry per prefix
        for restore_key in &request.restore_keys {
            let entries = self.list(restore_key).await?;
            if let Some(entry) = entries.into_iter().next() {
                self.restore_entry(&entry).await?;
                return Ok(RestoreOutcome {
                    matched_key: Some(entry.key.clone()),
                    entry: Some(entry),
                    exact_match: false,
                    duration_ms: start.elapsed().as_millis() as u64,
                });
            }
        }

        // Cache miss
        Ok(RestoreOutcome {
            entry: None,
            matched_key: None,
            exact_match: false,
            duration_ms: start.elapsed().as_millis() as u64,
        })
    }

    async fn save(&self, request: &SaveRequest) -> Result<SaveOutcome> {
        let start = std::time::Instant::now();
        validate_key_and_paths(&request.key, &request.paths)?;

        tokio::fs::create_dir_all(&self.root_dir).await?;

        let mut bytes = Vec::new();
        archiver::create_archive(&mut bytes, &request.paths, request.compression)?;
        let checksum = hex::encode(Sha256::digest(&bytes));

        let archive_path = self.archive_path(&request.key, request.compression);
        tokio::fs::write(&archive_path, &bytes).await?;

        let entry = CacheEntry {
            key: request.key.clone(),
            size_bytes: bytes.len() as u64,
            created_at: chrono::Utc::now(),
            compression: request.compression,
            checksum,
        };
        let meta = serde_json::to_vec_pretty(&entry)?;
        tokio::fs::write(self.meta_path(&request.key), meta).await?;
        debug!(key = %entry.key, size_bytes = entry.size_bytes, "saved cache entry");

        Ok(SaveOutcome {
            entry,
            duration_ms: start.elapsed().as_millis() as u64,
        })
    }

    async fn exists(&self, key: &str) -> Result<bool> {
        Ok(self.meta_path(key).exists())
    }

    async fn list(&self, prefix: &str) -> Result<Vec<CacheEntry>> {
        if !self.root_dir.exists() {
            return Ok(vec![]);
        }

        let mut entries = vec![];
        let mut read_dir = tokio::fs::read_dir(&self.root_dir).await?;
        while let Some(dir_entry) = read_dir.next_entry().await? {
            let path = dir_entry.path();
            if path.extension().and_then(|e| e.to_str()) != Some("json") {
                continue;
            }
            let raw = tokio::fs::read(&path).await?;
            let entry: CacheEntry = serde_json::from_slice(&raw)?;
            if keys::matches_prefix(&entry.key, prefix) {
                entries.push(entry);
            }
        }

        // Most recently saved first, the fallback-match order
        entries.sort_by(|a, b| b.created_at.cmp(&a.created_at));

        Ok(entries)
    }
}

impl Default for FilesystemProvider {
    fn default() -> Self {
        Self::new(PathBuf::from("/var/drive/cache"))
    }
}

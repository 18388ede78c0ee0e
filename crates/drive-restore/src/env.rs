//! Environment resolution for the restore step.
//!
//! Takes an injectable environment map so tests never have to mutate the
//! real process environment.

use std::collections::HashMap;
use std::path::PathBuf;

/// Resolve the base temporary directory: `TMPDIR` if set and non-empty,
/// `/tmp` otherwise.
pub fn resolve_base_dir(env: &HashMap<String, String>) -> PathBuf {
    match env.get("TMPDIR") {
        Some(dir) if !dir.is_empty() => PathBuf::from(dir),
        _ => PathBuf::from("/tmp"),
    }
}

/// The single directory the docker build cache is restored into.
pub fn cache_target(base: &std::path::Path) -> PathBuf {
    base.join("drive/docker/cache")
}

/// Root directory for the filesystem cache provider, if overridden.
pub fn cache_provider_root(env: &HashMap<String, String>) -> Option<PathBuf> {
    env.get("DRIVE_CACHE_DIR")
        .filter(|dir| !dir.is_empty())
        .map(PathBuf::from)
}

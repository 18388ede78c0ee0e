//! The restore invocation itself.

use crate::env;
use drive_cache::CacheProvider;
use drive_core::{RestoreOutcome, RestoreRequest, Result};
use std::collections::HashMap;
use tracing::{info, warn};

/// Exact key of the docker build cache snapshot for the current image.
pub const PRIMARY_KEY: &str = "alpine-node-drive-8ba6ad48229f3dff5348e03b04ecce8d00e67952";

/// Fallback prefix matching any earlier snapshot of the same image.
pub const RESTORE_KEY_PREFIX: &str = "alpine-node-drive-";

/// Build the one restore request this step issues.
pub fn build_request(environ: &HashMap<String, String>) -> RestoreRequest {
    let base = env::resolve_base_dir(environ);
    RestoreRequest::new(PRIMARY_KEY, vec![env::cache_target(&base)])
        .with_restore_key(RESTORE_KEY_PREFIX)
}

/// Issue the restore request and log the outcome. A cache miss is success;
/// only a failing collaborator call is an error.
pub async fn run(
    provider: &dyn CacheProvider,
    environ: &HashMap<String, String>,
) -> Result<RestoreOutcome> {
    let request = build_request(environ);
    info!(key = %request.key, paths = ?request.paths, "restore cache");

    let outcome = provider.restore(&request).await?;
    match outcome.matched_key.as_deref() {
        Some(matched) => info!(
            matched,
            exact = outcome.exact_match,
            duration_ms = outcome.duration_ms,
            "cache restored"
        ),
        None => warn!(key = %request.key, "no cache entry matched"),
    }
    Ok(outcome)
}

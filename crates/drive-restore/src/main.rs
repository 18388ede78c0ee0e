//! Drive CI cache-restore entrypoint.
//!
//! Restores the docker build cache for the drive image before the build
//! step runs. Takes no arguments; configuration comes from the environment
//! (`TMPDIR`, `DRIVE_CACHE_DIR`).

mod env;
mod restore;

#[cfg(test)]
mod restore_tests;

use drive_cache::FilesystemProvider;
use std::collections::HashMap;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt::init();

    let environ: HashMap<String, String> = std::env::vars().collect();
    let provider = match env::cache_provider_root(&environ) {
        Some(root) => FilesystemProvider::new(root),
        None => FilesystemProvider::default(),
    };

    if let Err(e) = restore::run(&provider, &environ).await {
        eprintln!("{e}");
        std::process::exit(1);
    }
}

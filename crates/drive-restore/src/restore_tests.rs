use crate::env::{cache_provider_root, cache_target, resolve_base_dir};
use crate::restore::{self, PRIMARY_KEY, RESTORE_KEY_PREFIX};
use drive_cache::{CacheProvider, FilesystemProvider};
use drive_core::{Compression, SaveRequest};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

fn environ(pairs: &[(&str, &str)]) -> HashMap<String, String> {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

#[test]
fn base_dir_defaults_to_tmp() {
    let env = environ(&[]);
    assert_eq!(resolve_base_dir(&env), PathBuf::from("/tmp"));
    assert_eq!(
        cache_target(&resolve_base_dir(&env)),
        PathBuf::from("/tmp/drive/docker/cache")
    );
}

#[test]
fn base_dir_honors_tmpdir() {
    let env = environ(&[("TMPDIR", "/custom/tmp")]);
    assert_eq!(
        cache_target(&resolve_base_dir(&env)),
        PathBuf::from("/custom/tmp/drive/docker/cache")
    );
}

#[test]
fn empty_tmpdir_falls_back_to_default() {
    let env = environ(&[("TMPDIR", "")]);
    assert_eq!(resolve_base_dir(&env), PathBuf::from("/tmp"));
}

#[test]
fn provider_root_override() {
    assert_eq!(cache_provider_root(&environ(&[])), None);
    assert_eq!(
        cache_provider_root(&environ(&[("DRIVE_CACHE_DIR", "/srv/cache")])),
        Some(PathBuf::from("/srv/cache"))
    );
}

#[test]
fn request_carries_the_literal_keys() {
    // The keys are static regardless of environment.
    for env in [environ(&[]), environ(&[("TMPDIR", "/custom/tmp")])] {
        let request = restore::build_request(&env);
        assert_eq!(
            request.key,
            "alpine-node-drive-8ba6ad48229f3dff5348e03b04ecce8d00e67952"
        );
        assert_eq!(request.restore_keys, vec!["alpine-node-drive-".to_string()]);
        assert_eq!(request.paths.len(), 1);
    }
    assert!(PRIMARY_KEY.starts_with(RESTORE_KEY_PREFIX));
}

#[tokio::test]
async fn run_restores_a_saved_cache() {
    let cache_root = tempfile::tempdir().unwrap();
    let workspace = tempfile::tempdir().unwrap();
    let provider = FilesystemProvider::new(cache_root.path().to_path_buf());

    // Seed the cache at the path the step will ask for.
    let env = environ(&[("TMPDIR", workspace.path().to_str().unwrap())]);
    let target = cache_target(workspace.path());
    std::fs::create_dir_all(&target).unwrap();
    std::fs::write(target.join("layer.bin"), b"docker-layer").unwrap();
    provider
        .save(&SaveRequest {
            key: PRIMARY_KEY.to_string(),
            paths: vec![target.clone()],
            compression: Compression::Zstd,
        })
        .await
        .unwrap();
    std::fs::remove_dir_all(&target).unwrap();

    let outcome = restore::run(&provider, &env).await.unwrap();
    assert!(outcome.exact_match);
    assert_eq!(outcome.matched_key.as_deref(), Some(PRIMARY_KEY));
    assert_eq!(
        std::fs::read(target.join("layer.bin")).unwrap(),
        b"docker-layer"
    );
}

#[tokio::test]
async fn run_falls_back_to_prefix_match() {
    let cache_root = tempfile::tempdir().unwrap();
    let workspace = tempfile::tempdir().unwrap();
    let provider = FilesystemProvider::new(cache_root.path().to_path_buf());

    let env = environ(&[("TMPDIR", workspace.path().to_str().unwrap())]);
    let target = cache_target(workspace.path());
    std::fs::create_dir_all(&target).unwrap();
    std::fs::write(target.join("layer.bin"), b"older-layer").unwrap();
    provider
        .save(&SaveRequest {
            // Same prefix, different content hash.
            key: format!("{}deadbeef", RESTORE_KEY_PREFIX),
            paths: vec![target.clone()],
            compression: Compression::Zstd,
        })
        .await
        .unwrap();
    std::fs::remove_dir_all(&target).unwrap();

    let outcome = restore::run(&provider, &env).await.unwrap();
    assert!(outcome.is_hit());
    assert!(!outcome.exact_match);
    assert_eq!(
        std::fs::read(target.join("layer.bin")).unwrap(),
        b"older-layer"
    );
}

#[tokio::test]
async fn run_treats_a_miss_as_success() {
    let cache_root = tempfile::tempdir().unwrap();
    let workspace = tempfile::tempdir().unwrap();
    let provider = FilesystemProvider::new(cache_root.path().to_path_buf());

    let env = environ(&[("TMPDIR", workspace.path().to_str().unwrap())]);
    let outcome = restore::run(&provider, &env).await.unwrap();
    assert!(!outcome.is_hit());
}

#[tokio::test]
async fn run_surfaces_provider_failures() {
    // A cache root that is a file, not a directory, makes listing fail.
    let bogus = tempfile::NamedTempFile::new().unwrap();
    let provider = FilesystemProvider::new(bogus.path().to_path_buf());

    let env = environ(&[]);
    let err = restore::run(&provider, &env).await.unwrap_err();
    assert!(!err.to_string().is_empty());
}

#[test]
fn cache_target_appends_fixed_suffix() {
    assert_eq!(
        cache_target(Path::new("/scratch")),
        PathBuf::from("/scratch/drive/docker/cache")
    );
}

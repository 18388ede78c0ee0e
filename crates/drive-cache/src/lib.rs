//! Restore-by-key cache for Drive CI.
//!
//! Defines the [`CacheProvider`] contract the restore step depends on, and a
//! filesystem-backed implementation suitable for local runs and tests.

pub mod archiver;
pub mod keys;
pub mod provider;

pub use archiver::{create_archive, extract_archive};
pub use keys::{matches_prefix, sanitize_key};
pub use provider::{CacheProvider, FilesystemProvider};

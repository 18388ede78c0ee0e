//! Drive CI Core
//!
//! Shared vocabulary for the Drive CI cache tooling: cache request and
//! outcome types, and the error enum used across the workspace. This crate
//! has minimal dependencies.

pub mod cache;
pub mod error;

pub use cache::{CacheEntry, Compression, RestoreOutcome, RestoreRequest, SaveOutcome, SaveRequest};
pub use error::{Error, Result};

//! Tar packing and unpacking for cache entries.
//!
//! Entries are stored under their root-relative path so that extraction at
//! `/` puts every file back in its original absolute location.

use drive_core::{Compression, Error, Result};
use std::io::{Read, Write};
use std::path::{Path, PathBuf};

/// Create an archive containing the given paths.
///
/// Relative paths are resolved against the current directory before packing.
/// Paths that do not exist are skipped.
pub fn create_archive<W: Write>(
    writer: W,
    paths: &[PathBuf],
    compression: Compression,
) -> Result<()> {
    match compression {
        Compression::Zstd => {
            let mut encoder = zstd::stream::write::Encoder::new(writer, 3)
                .map_err(|e| Error::Internal(format!("Zstd init failed: {}", e)))?;
            append_paths(&mut tar::Builder::new(&mut encoder), paths)?;
            encoder
                .finish()
                .map_err(|e| Error::Internal(format!("Zstd finish failed: {}", e)))?;
        }
        Compression::None => {
            append_paths(&mut tar::Builder::new(writer), paths)?;
        }
    }
    Ok(())
}

fn append_paths<W: Write>(builder: &mut tar::Builder<W>, paths: &[PathBuf]) -> Result<()> {
    for p in paths {
        let abs_path = std::path::absolute(p)?;
        if !abs_path.exists() {
            continue;
        }
        // Archive name is the path relative to the filesystem root.
        let name = abs_path.strip_prefix("/").unwrap_or(&abs_path);

        if abs_path.is_dir() {
            builder
                .append_dir_all(name, &abs_path)
                .map_err(|e| Error::Internal(format!("Failed to pack dir: {}", e)))?;
        } else {
            builder
                .append_path_with_name(&abs_path, name)
                .map_err(|e| Error::Internal(format!("Failed to pack file: {}", e)))?;
        }
    }
    builder
        .finish()
        .map_err(|e| Error::Internal(format!("Failed to finish tar: {}", e)))
}

/// Extract an archive to a destination directory.
pub fn extract_archive<R: Read>(reader: R, dest: &Path, compression: Compression) -> Result<()> {
    match compression {
        Compression::Zstd => {
            let decoder = zstd::stream::read::Decoder::new(reader)
                .map_err(|e| Error::Internal(format!("Failed to create decoder: {}", e)))?;
            let mut archive = tar::Archive::new(decoder);
            archive
                .unpack(dest)
                .map_err(|e| Error::Internal(format!("Failed to unpack archive: {}", e)))?;
        }
        Compression::None => {
            let mut archive = tar::Archive::new(reader);
            archive
                .unpack(dest)
                .map_err(|e| Error::Internal(format!("Failed to unpack archive: {}", e)))?;
        }
    }
    Ok(())
}

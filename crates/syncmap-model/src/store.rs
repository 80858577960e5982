//! JSON persistence for [`LibraryMapping`] documents.
//!
//! One file per old library, named after the library identifier with
//! path-unsafe characters substituted. Writes go through a temporary file in
//! the destination directory followed by a rename, so an interrupted run
//! never leaves a truncated document behind.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::LibraryMapping;

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("malformed mapping file {path}: {source}")]
    Malformed {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("failed to encode mapping: {0}")]
    Encode(#[from] serde_json::Error),
}

/// File name for a library identifier, e.g.
/// `com.acme:widgets:1.0.0` → `com.acme_widgets_1.0.0.json`.
#[must_use]
pub fn mapping_file_name(library: &str) -> String {
    let stem: String = library
        .chars()
        .map(|c| match c {
            ':' | '/' | '\\' => '_',
            other => other,
        })
        .collect();
    format!("{stem}.json")
}

/// Load a previously persisted mapping.
///
/// Returns `Ok(None)` when no file exists at `path`. A file that exists but
/// cannot be decoded is an error: partial merges against corrupt state are
/// worse than failing the pair outright.
pub fn load_mapping(path: &Path) -> Result<Option<LibraryMapping>, StoreError> {
    let text = match fs::read_to_string(path) {
        Ok(text) => text,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Ok(None),
        Err(err) => return Err(err.into()),
    };
    let mapping = serde_json::from_str(&text).map_err(|source| StoreError::Malformed {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(Some(mapping))
}

/// Persist `mapping` to `path`, creating parent directories as needed.
pub fn save_mapping(path: &Path, mapping: &LibraryMapping) -> Result<(), StoreError> {
    let parent = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    fs::create_dir_all(parent)?;

    let mut body = serde_json::to_vec_pretty(mapping)?;
    body.push(b'\n');

    let mut tmp = tempfile::NamedTempFile::new_in(parent)?;
    tmp.write_all(&body)?;
    tmp.as_file().sync_all()?;
    tmp.persist(path).map_err(|err| err.error)?;

    tracing::debug!(path = %path.display(), "wrote mapping file");
    Ok(())
}

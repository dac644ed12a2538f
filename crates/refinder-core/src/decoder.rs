//! The seam between raw save bytes and the generic record model.
//!
//! Decoding the game's binary save format is an external concern: anything
//! implementing [`ArchiveDecoder`] can feed the reconstruction pipeline.
//! [`JsonArchiveDecoder`] reads archives already converted to the JSON form
//! of [`Archive`].

use std::path::{Path, PathBuf};

use refinder_types::Archive;
use tracing::{debug, warn};

use crate::error::{ReconstructError, Result};

/// Failure reported by a decoder for unreadable or corrupt input.
#[derive(Debug, thiserror::Error)]
#[error("{message}")]
pub struct DecodeError {
    /// Human-readable description of what was wrong with the input.
    pub message: String,
}

impl DecodeError {
    /// Build a decode error from any displayable cause.
    pub fn new(message: impl std::fmt::Display) -> Self {
        Self {
            message: message.to_string(),
        }
    }
}

/// Turns the bytes of one save file into an [`Archive`].
pub trait ArchiveDecoder: Send + Sync {
    /// Decode a complete save file.
    ///
    /// # Errors
    ///
    /// Returns [`DecodeError`] when the input is unreadable or corrupt.
    fn decode(&self, bytes: &[u8]) -> std::result::Result<Archive, DecodeError>;
}

/// Decoder for archives stored in their JSON form.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonArchiveDecoder;

impl ArchiveDecoder for JsonArchiveDecoder {
    fn decode(&self, bytes: &[u8]) -> std::result::Result<Archive, DecodeError> {
        serde_json::from_slice(bytes).map_err(DecodeError::new)
    }
}

/// Path of the debug dump written next to `path`.
pub fn dump_path(path: &Path) -> PathBuf {
    let mut name = path.as_os_str().to_owned();
    name.push(".json");
    PathBuf::from(name)
}

/// Write `archive` as pretty JSON next to `path`. Failures are logged.
fn dump_archive(path: &Path, archive: &Archive) {
    let target = dump_path(path);
    let written = serde_json::to_vec_pretty(archive)
        .map_err(|e| e.to_string())
        .and_then(|json| std::fs::write(&target, json).map_err(|e| e.to_string()));
    match written {
        Ok(()) => debug!(path = %target.display(), "archive dumped"),
        Err(error) => warn!(path = %target.display(), %error, "failed to dump archive"),
    }
}

/// Read and decode one save file.
///
/// # Errors
///
/// [`ReconstructError::Io`] when the file cannot be read,
/// [`ReconstructError::Decode`] when the decoder rejects it.
pub fn load_archive(path: &Path, decoder: &dyn ArchiveDecoder, dump_json: bool) -> Result<Archive> {
    let bytes = std::fs::read(path).map_err(|source| ReconstructError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let archive = decoder
        .decode(&bytes)
        .map_err(|e| ReconstructError::Decode {
            path: path.to_path_buf(),
            message: e.message,
        })?;
    debug!(path = %path.display(), records = archive.objects.len(), "archive decoded");
    if dump_json {
        dump_archive(path, &archive);
    }
    Ok(archive)
}

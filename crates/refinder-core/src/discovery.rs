//! Save folder discovery.
//!
//! The game keeps one sub-folder per platform user under a fixed root. The
//! first configured root that exists and has at least one sub-folder wins,
//! and its first sub-folder by name is the save folder. With several users
//! on one machine this picks one arbitrarily; set `saves.directory` to
//! choose explicitly.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::config::SavesConfig;

/// Errors that can occur while locating the save folder.
#[derive(Debug, thiserror::Error)]
pub enum DiscoveryError {
    /// No search root contained a user folder.
    #[error("could not find a user folder under {searched:?}")]
    NoUserFolder {
        /// Roots that were searched, in order.
        searched: Vec<PathBuf>,
    },

    /// A search root exists but could not be listed.
    #[error("failed to list {path}: {source}")]
    Io {
        /// The root that failed.
        path: PathBuf,
        /// The underlying I/O error.
        source: std::io::Error,
    },
}

/// Sub-directories of `root`, sorted by name. A missing root has none.
fn user_folders(root: &Path) -> Result<Vec<PathBuf>, DiscoveryError> {
    let entries = match std::fs::read_dir(root) {
        Ok(entries) => entries,
        Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
        Err(source) => {
            return Err(DiscoveryError::Io {
                path: root.to_path_buf(),
                source,
            });
        }
    };
    let mut folders: Vec<PathBuf> = entries
        .filter_map(std::result::Result::ok)
        .filter(|entry| entry.file_type().is_ok_and(|t| t.is_dir()))
        .map(|entry| entry.path())
        .collect();
    folders.sort();
    Ok(folders)
}

/// Resolve the save folder: the explicit directory if configured,
/// otherwise the first user folder under the search roots.
///
/// # Errors
///
/// [`DiscoveryError::NoUserFolder`] when no root yields a user folder.
pub fn discover_save_folder(saves: &SavesConfig) -> Result<PathBuf, DiscoveryError> {
    if let Some(dir) = &saves.directory {
        debug!(path = %dir.display(), "using configured save folder");
        return Ok(dir.clone());
    }
    for root in &saves.search_roots {
        let folders = user_folders(root)?;
        debug!(root = %root.display(), candidates = folders.len(), "searched save root");
        if let Some(first) = folders.into_iter().next() {
            info!(path = %first.display(), "save folder discovered");
            return Ok(first);
        }
    }
    Err(DiscoveryError::NoUserFolder {
        searched: saves.search_roots.clone(),
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn saves(roots: Vec<PathBuf>) -> SavesConfig {
        SavesConfig {
            search_roots: roots,
            ..SavesConfig::default()
        }
    }

    #[test]
    fn explicit_directory_wins() {
        let config = SavesConfig {
            directory: Some(PathBuf::from("/explicit")),
            ..saves(Vec::new())
        };
        assert_eq!(
            discover_save_folder(&config).ok(),
            Some(PathBuf::from("/explicit"))
        );
    }

    #[test]
    fn falls_back_to_second_root() {
        let tmp = tempfile::tempdir().unwrap();
        let steam = tmp.path().join("Steam");
        let plain = tmp.path().join("Remnant2");
        std::fs::create_dir_all(&steam).unwrap();
        std::fs::create_dir_all(plain.join("bbb")).unwrap();
        std::fs::create_dir_all(plain.join("aaa")).unwrap();
        std::fs::write(plain.join("a_file"), b"").unwrap();

        let found = discover_save_folder(&saves(vec![steam, plain.clone()])).ok();
        assert_eq!(found, Some(plain.join("aaa")));
    }

    #[test]
    fn nothing_found_is_an_error() {
        let tmp = tempfile::tempdir().unwrap();
        let result = discover_save_folder(&saves(vec![tmp.path().join("missing")]));
        assert!(matches!(result, Err(DiscoveryError::NoUserFolder { .. })));
    }
}

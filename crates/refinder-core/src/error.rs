//! Error types for session reconstruction.
//!
//! Every extraction site in this crate returns [`ReconstructError`]
//! through the [`Result`] alias. The variants map one-to-one onto the
//! failure kinds the orchestrator distinguishes when deciding whether a
//! failure is fatal (bootstrap) or merely dropped (live refresh).

use std::path::PathBuf;

/// Shorthand result type for reconstruction operations.
pub type Result<T> = std::result::Result<T, ReconstructError>;

/// Errors that can occur while reconstructing a session or a roster.
#[derive(Debug, thiserror::Error)]
pub enum ReconstructError {
    /// A required anchor record could not be located.
    #[error("not found: {what}")]
    NotFound {
        /// Description of the missing anchor.
        what: String,
    },

    /// A property exists but holds an unexpected value variant.
    #[error("could not parse {field}: expected {expected}, found {found}")]
    Parse {
        /// Name of the offending property.
        field: String,
        /// The variant that was expected.
        expected: &'static str,
        /// The variant that was found.
        found: &'static str,
    },

    /// Zero or several zones qualify as the tree root.
    #[error("ambiguous root zone: {candidates} candidates")]
    AmbiguousRoot {
        /// Number of qualifying candidates.
        candidates: usize,
    },

    /// A save file could not be read.
    #[error("failed to read {path}: {source}")]
    Io {
        /// The file that failed.
        path: PathBuf,
        /// The underlying I/O error.
        source: std::io::Error,
    },

    /// The decoder rejected a save file.
    #[error("failed to decode {path}: {message}")]
    Decode {
        /// The file that failed.
        path: PathBuf,
        /// Decoder error description.
        message: String,
    },
}

impl ReconstructError {
    /// Build a [`ReconstructError::NotFound`].
    pub fn not_found(what: impl Into<String>) -> Self {
        Self::NotFound { what: what.into() }
    }

    /// Build a [`ReconstructError::Parse`].
    pub fn parse(field: impl Into<String>, expected: &'static str, found: &'static str) -> Self {
        Self::Parse {
            field: field.into(),
            expected,
            found,
        }
    }
}

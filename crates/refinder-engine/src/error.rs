//! Error types for the engine binary.
//!
//! [`EngineError`] is the top-level error type that wraps all possible
//! failure modes during startup.

/// Top-level error for the engine binary.
///
/// Each variant wraps a specific subsystem error, providing a single
/// error type that `main` can propagate with `?`.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    /// Configuration loading failed.
    #[error("config error: {source}")]
    Config {
        /// The underlying config error.
        #[from]
        source: refinder_core::config::ConfigError,
    },

    /// No save folder could be located.
    #[error("discovery error: {source}")]
    Discovery {
        /// The underlying discovery error.
        #[from]
        source: refinder_core::discovery::DiscoveryError,
    },

    /// The bootstrap pass failed.
    #[error("bootstrap failed: {source}")]
    Bootstrap {
        /// The underlying reconstruction error.
        #[from]
        source: refinder_core::error::ReconstructError,
    },

    /// The filesystem watch could not be registered.
    #[error("watch error: {source}")]
    Watch {
        /// The underlying notify error.
        #[from]
        source: notify::Error,
    },

    /// Observer API server failed to start.
    #[error("observer error: {source}")]
    Observer {
        /// The underlying startup error.
        #[from]
        source: refinder_observer::startup::StartupError,
    },
}

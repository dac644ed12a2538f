//! Refinder engine binary.
//!
//! This is the main entry point that wires together save discovery, the
//! bootstrap pass, the filesystem watch, the live sync loop and the
//! Observer API server. It runs until `Ctrl-C`.
//!
//! # Startup Sequence
//!
//! 1. Load configuration from `refinder-config.yaml`
//! 2. Initialize structured logging (tracing)
//! 3. Locate the save folder
//! 4. Bootstrap: resolve the profile, reconstruct and publish the active
//!    character (failure here is fatal)
//! 5. Start the Observer API server
//! 6. Register the save folder watch
//! 7. Run the sync loop until `Ctrl-C`

mod error;
mod observer_sink;
mod watcher;

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::Context as _;
use refinder_core::config::{CONFIG_FILE, RefinderConfig};
use refinder_core::decoder::JsonArchiveDecoder;
use refinder_core::discovery::discover_save_folder;
use refinder_core::orchestrator::{Orchestrator, UpdateSink};
use refinder_core::state::SyncState;
use refinder_observer::server::ServerConfig;
use refinder_observer::startup::spawn_observer;
use refinder_observer::state::AppState;
use tokio::sync::{mpsc, watch};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use crate::error::EngineError;
use crate::observer_sink::ObserverSink;
use crate::watcher::SaveWatcher;

/// Application entry point for the engine.
///
/// # Errors
///
/// Returns an error if configuration, discovery, the bootstrap pass, or
/// the watch registration fails.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 1. Load configuration.
    let (config, from_file) = load_config()?;

    // 2. Initialize structured logging.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(&config.logging.level)),
        )
        .with_target(true)
        .init();

    info!("refinder-engine starting");
    if !from_file {
        info!("Config file not found, using defaults");
    }
    info!(
        queue_capacity = config.sync.queue_capacity,
        debounce_ms = config.sync.debounce_ms,
        observer_enabled = config.observer.enabled,
        dump_json = config.debug.dump_json,
        "Configuration loaded"
    );

    // 3. Locate the save folder.
    let folder = discover_save_folder(&config.saves).map_err(EngineError::from)?;
    info!(folder = %folder.display(), "Save folder selected");

    // 4. Bootstrap.
    let app_state = Arc::new(AppState::new());
    let mut orchestrator = Orchestrator::new(
        folder.clone(),
        &config,
        Box::new(JsonArchiveDecoder),
        ObserverSink::new(Arc::clone(&app_state)),
    );
    orchestrator
        .bootstrap()
        .map_err(EngineError::from)
        .with_context(|| format!("initial sync of {}", folder.display()))?;

    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    let shutdown_tx = Arc::new(shutdown_tx);

    // 5. Start Observer API server.
    let observer_handle = if config.observer.enabled {
        let server_config = ServerConfig {
            host: config.observer.host.clone(),
            port: config.observer.port,
        };
        let handle = spawn_observer(server_config, Arc::clone(&app_state), shutdown_rx)
            .map_err(EngineError::from)?;
        Some(handle)
    } else {
        info!("Observer API server disabled");
        None
    };

    // 6. Register the save folder watch.
    let (save_watcher, changes) =
        SaveWatcher::start(&folder, config.sync.queue_capacity).map_err(EngineError::from)?;

    // 7. Run until Ctrl-C.
    let ctrl_c_tx = Arc::clone(&shutdown_tx);
    tokio::spawn(async move {
        match tokio::signal::ctrl_c().await {
            Ok(()) => info!("Shutdown requested"),
            Err(e) => warn!(error = %e, "Failed to listen for Ctrl-C, shutting down"),
        }
        let _ = ctrl_c_tx.send(true);
    });

    let state = run_sync(orchestrator, changes, &shutdown_tx).await;
    drop(save_watcher);

    if let Some(handle) = observer_handle {
        if let Err(e) = handle.await {
            warn!(error = %e, "Observer task did not shut down cleanly");
        }
    }

    info!(
        active_id = %state.active_id(),
        characters = state.roster_len(),
        "refinder-engine shutdown complete"
    );

    Ok(())
}

/// Run the sync loop, then signal shutdown to every other holder of the
/// channel, whether the loop stopped on the signal or on a closed queue.
async fn run_sync<S: UpdateSink>(
    orchestrator: Orchestrator<S>,
    changes: mpsc::Receiver<PathBuf>,
    shutdown: &watch::Sender<bool>,
) -> SyncState {
    let state = orchestrator.run(changes, shutdown.subscribe()).await;
    shutdown.send_replace(true);
    state
}

/// Load configuration from `refinder-config.yaml` in the working
/// directory, falling back to defaults (plus environment overrides) when
/// the file is absent. The flag reports whether the file was read.
fn load_config() -> Result<(RefinderConfig, bool), EngineError> {
    let config_path = Path::new(CONFIG_FILE);
    if config_path.exists() {
        Ok((RefinderConfig::from_file(config_path)?, true))
    } else {
        let mut config = RefinderConfig::default();
        config.apply_env_overrides();
        Ok((config, false))
    }
}

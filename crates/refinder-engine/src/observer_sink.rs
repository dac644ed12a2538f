//! Update sink that feeds the Observer API state.
//!
//! Each published [`CharacterUpdate`] replaces the observer's latest
//! update and is broadcast to every connected `WebSocket` client.

use std::sync::Arc;

use refinder_core::orchestrator::{PublishError, UpdateSink};
use refinder_observer::state::AppState;
use refinder_types::CharacterUpdate;
use tracing::debug;

/// Sink that bridges the sync loop to the Observer API.
pub struct ObserverSink {
    state: Arc<AppState>,
}

impl ObserverSink {
    /// Create a new observer sink backed by the given app state.
    pub const fn new(state: Arc<AppState>) -> Self {
        Self { state }
    }
}

impl UpdateSink for ObserverSink {
    fn publish(&mut self, update: &CharacterUpdate) -> Result<(), PublishError> {
        let receivers = self.state.publish(update);
        debug!(
            character_id = %update.character.id,
            receivers,
            "Character update broadcast sent"
        );
        Ok(())
    }
}

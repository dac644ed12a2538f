//! Shared application state for the Observer API server.
//!
//! [`AppState`] holds the broadcast channel that streams every published
//! [`CharacterUpdate`] and the latest update served by the REST endpoints.

use chrono::{DateTime, Utc};
use refinder_types::CharacterUpdate;
use tokio::sync::{broadcast, watch};

/// Capacity of the broadcast channel for character updates.
///
/// If a subscriber falls behind by more than this many messages it will
/// receive a [`broadcast::error::RecvError::Lagged`] and skip to the
/// newest message.
pub const BROADCAST_CAPACITY: usize = 64;

/// Shared state for the Axum application.
///
/// Wrapped in [`Arc`](std::sync::Arc) and injected via Axum's `State`
/// extractor. Publishing never blocks: the latest update is swapped in
/// place and the broadcast send does not wait for receivers.
pub struct AppState {
    /// Broadcast sender for character updates.
    pub tx: broadcast::Sender<CharacterUpdate>,
    /// The most recent update, `None` until the first publish.
    latest: watch::Sender<Option<CharacterUpdate>>,
    /// When the observer state was created.
    pub started_at: DateTime<Utc>,
}

impl AppState {
    /// Create a new application state with no published update.
    pub fn new() -> Self {
        let (tx, _) = broadcast::channel(BROADCAST_CAPACITY);
        let (latest, _) = watch::channel(None);
        Self {
            tx,
            latest,
            started_at: Utc::now(),
        }
    }

    /// Subscribe to the character update broadcast channel.
    pub fn subscribe(&self) -> broadcast::Receiver<CharacterUpdate> {
        self.tx.subscribe()
    }

    /// The latest published update, if any.
    pub fn latest(&self) -> Option<CharacterUpdate> {
        self.latest.borrow().clone()
    }

    /// Store `update` as the latest and push it to all connected clients.
    ///
    /// Returns the number of receivers that received the message.
    /// Returns 0 if no clients are connected (this is not an error).
    pub fn publish(&self, update: &CharacterUpdate) -> usize {
        self.latest.send_replace(Some(update.clone()));
        // send returns Err only when there are zero receivers,
        // which is normal when no WebSocket clients are connected.
        self.tx.send(update.clone()).unwrap_or(0)
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use refinder_types::{Character, CharacterId, ZoneInfo};

    use super::*;

    fn update(id: i32) -> CharacterUpdate {
        CharacterUpdate {
            character: Character::new(CharacterId(id)),
            zone: ZoneInfo::default(),
            published_at: Utc::now(),
        }
    }

    #[test]
    fn publish_without_subscribers_still_stores() {
        let state = AppState::new();
        assert!(state.latest().is_none());
        assert_eq!(state.publish(&update(1)), 0);
        assert_eq!(state.latest().map(|u| u.character.id), Some(CharacterId(1)));
    }

    #[tokio::test]
    async fn subscribers_receive_updates() {
        let state = AppState::new();
        let mut rx = state.subscribe();
        assert_eq!(state.publish(&update(2)), 1);
        let received = rx.recv().await.ok();
        assert_eq!(received.map(|u| u.character.id), Some(CharacterId(2)));
    }
}

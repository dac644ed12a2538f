//! Live sync orchestrator.
//!
//! Owns the [`SyncState`] and drives the reconstruction pipeline:
//!
//! - **Bootstrap**: resolve the profile, reconstruct the active character's
//!   session, publish. Any failure here is returned to the caller, which
//!   treats it as fatal.
//! - **Watching**: consume changed paths from a bounded queue, one at a
//!   time. The profile file re-resolves the roster and republishes the
//!   active character; `save_<id>` files reconstruct that character and
//!   publish only when it is the active one. A failed refresh is logged
//!   and the notification dropped, leaving the state untouched.
//! - **Shutdown**: a `watch` signal checked between notifications, never
//!   in the middle of a pass.
//!
//! Publication goes through an [`UpdateSink`] and never blocks the loop.

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use std::time::Duration;

use chrono::Utc;
use refinder_types::{CharacterId, CharacterUpdate, ZoneInfo};
use tokio::sync::{mpsc, watch};
use tracing::{debug, info, warn};

use crate::config::{RefinderConfig, SavesConfig};
use crate::decoder::{ArchiveDecoder, load_archive};
use crate::error::{ReconstructError, Result};
use crate::profile::{Roster, resolve_roster};
use crate::routing::{SaveFileKind, route};
use crate::session::reconstruct;
use crate::state::SyncState;

/// Failure to hand an update to the presentation layer.
#[derive(Debug, thiserror::Error)]
pub enum PublishError {
    /// The sink cannot accept updates right now.
    #[error("update sink unavailable: {reason}")]
    Unavailable {
        /// Why the sink rejected the update.
        reason: String,
    },
}

/// Receiver of published character updates.
///
/// Implementations must return promptly; a failed publish is logged and
/// skipped, never retried.
pub trait UpdateSink: Send {
    /// Deliver one complete update.
    ///
    /// # Errors
    ///
    /// Returns [`PublishError`] when the update could not be delivered.
    fn publish(&mut self, update: &CharacterUpdate) -> std::result::Result<(), PublishError>;
}

/// What handling one changed path amounted to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeOutcome {
    /// The path is not a tracked save file.
    Ignored,
    /// State was refreshed but nothing was published.
    Stored,
    /// State was refreshed and the active character was published.
    Published,
}

const fn outcome(published: bool) -> ChangeOutcome {
    if published {
        ChangeOutcome::Published
    } else {
        ChangeOutcome::Stored
    }
}

/// Wait out the debounce window and drain the queue, keeping each
/// distinct path once in arrival order.
async fn collect_batch(
    first: PathBuf,
    rx: &mut mpsc::Receiver<PathBuf>,
    debounce: Duration,
) -> Vec<PathBuf> {
    let mut batch = vec![first];
    if debounce.is_zero() {
        return batch;
    }
    tokio::time::sleep(debounce).await;
    while let Ok(path) = rx.try_recv() {
        if !batch.contains(&path) {
            batch.push(path);
        }
    }
    batch
}

/// The live sync engine for one save folder.
pub struct Orchestrator<S> {
    folder: PathBuf,
    saves: SavesConfig,
    debounce: Duration,
    dump_json: bool,
    decoder: Box<dyn ArchiveDecoder>,
    sink: S,
    state: SyncState,
}

impl<S: UpdateSink> Orchestrator<S> {
    /// Create an orchestrator for `folder`. Nothing is read until
    /// [`bootstrap`](Self::bootstrap).
    pub fn new(
        folder: PathBuf,
        config: &RefinderConfig,
        decoder: Box<dyn ArchiveDecoder>,
        sink: S,
    ) -> Self {
        Self {
            folder,
            saves: config.saves.clone(),
            debounce: config.sync.debounce(),
            dump_json: config.debug.dump_json,
            decoder,
            sink,
            state: SyncState::new(),
        }
    }

    /// Current sync state.
    pub const fn state(&self) -> &SyncState {
        &self.state
    }

    /// The watched save folder.
    pub fn folder(&self) -> &Path {
        &self.folder
    }

    /// Path of the profile file.
    pub fn profile_path(&self) -> PathBuf {
        self.folder.join(&self.saves.profile_file)
    }

    /// Path of character `id`'s session save.
    pub fn character_path(&self, id: CharacterId) -> PathBuf {
        self.folder.join(self.saves.character_file(id))
    }

    /// Decode and resolve the profile at `path` without touching state.
    fn load_roster(&self, path: &Path) -> Result<Roster> {
        let archive = load_archive(path, self.decoder.as_ref(), self.dump_json)?;
        resolve_roster(&archive)
    }

    /// Reconstruct the session save at `path` against `owned`.
    fn load_session(&self, path: &Path, owned: &BTreeSet<String>) -> Result<ZoneInfo> {
        let archive = load_archive(path, self.decoder.as_ref(), self.dump_json)?;
        reconstruct(&archive, owned)
    }

    /// Reconstruct character `id` from `path` and store the result.
    fn refresh_character(&mut self, id: CharacterId, path: &Path) -> Result<()> {
        let empty = BTreeSet::new();
        let owned = self
            .state
            .character(id)
            .map_or(&empty, |c| &c.owned_item_ids);
        let zone = self.load_session(path, owned)?;
        debug!(character_id = %id, zones = zone.zone_count(), "session reconstructed");
        self.state.store_zone(id, zone);
        Ok(())
    }

    /// Reconstruct the active character of `roster` from its own save
    /// file. Nothing is stored.
    fn load_active(&self, roster: &Roster) -> Result<(CharacterId, ZoneInfo)> {
        let active = roster.active_id;
        if active.is_none() {
            return Err(ReconstructError::not_found("active character"));
        }
        let character = roster
            .active()
            .ok_or_else(|| ReconstructError::not_found("active character record"))?;
        let zone = self.load_session(&self.character_path(active), &character.owned_item_ids)?;
        debug!(character_id = %active, zones = zone.zone_count(), "session reconstructed");
        Ok((active, zone))
    }

    /// Reconstruct the active character of `roster`, then commit the
    /// roster and its session together.
    fn adopt_roster(&mut self, roster: Roster) -> Result<CharacterId> {
        let (active, zone) = self.load_active(&roster)?;
        self.state.replace_roster(roster);
        self.state.store_zone(active, zone);
        Ok(active)
    }

    /// Hand the active character's update to the sink. Returns whether it
    /// was delivered.
    fn publish_active(&mut self) -> bool {
        let Some(update) = self.state.active_update(Utc::now()) else {
            debug!(character_id = %self.state.active_id(), "nothing to publish");
            return false;
        };
        match self.sink.publish(&update) {
            Ok(()) => {
                info!(
                    character_id = %update.character.id,
                    zones = update.zone.zone_count(),
                    "character update published"
                );
                true
            }
            Err(e) => {
                warn!(character_id = %update.character.id, error = %e, "publish failed");
                false
            }
        }
    }

    /// Initial full pass: profile, active character, publish.
    ///
    /// # Errors
    ///
    /// Any failure to read or reconstruct the profile or the active
    /// character's session, including a profile without an active
    /// character or without a record for it.
    pub fn bootstrap(&mut self) -> Result<()> {
        info!(folder = %self.folder.display(), "bootstrap started");
        let roster = self.load_roster(&self.profile_path())?;
        let active = self.adopt_roster(roster)?;
        if !self.publish_active() {
            warn!(character_id = %active, "initial update not delivered");
        }
        info!(
            active_id = %active,
            characters = self.state.roster_len(),
            "bootstrap finished"
        );
        Ok(())
    }

    /// Handle one changed path.
    ///
    /// # Errors
    ///
    /// Any read or reconstruction failure for the affected entity. On
    /// failure the state is left exactly as it was; a profile change only
    /// takes effect once its active character has been reconstructed.
    pub fn handle_change(&mut self, path: &Path) -> Result<ChangeOutcome> {
        match route(path, &self.saves) {
            SaveFileKind::Ignored => {
                debug!(path = %path.display(), "ignoring non-save file");
                Ok(ChangeOutcome::Ignored)
            }
            SaveFileKind::Profile => {
                let roster = self.load_roster(path)?;
                if roster.active_id.is_none() {
                    info!("profile has no active character");
                    self.state.replace_roster(roster);
                    return Ok(ChangeOutcome::Stored);
                }
                self.adopt_roster(roster)?;
                Ok(outcome(self.publish_active()))
            }
            SaveFileKind::Character(id) => {
                self.refresh_character(id, path)?;
                let active = self.state.active_id();
                if id == active {
                    return Ok(outcome(self.publish_active()));
                }
                info!(
                    character_id = %id,
                    active_id = %active,
                    "inactive character update stored, not published"
                );
                Ok(ChangeOutcome::Stored)
            }
        }
    }

    /// Handle one changed path, logging and dropping failures.
    fn process(&mut self, path: &Path) {
        debug!(path = %path.display(), "save folder changed");
        if let Err(e) = self.handle_change(path) {
            warn!(path = %path.display(), error = %e, "refresh failed, notification dropped");
        }
    }

    /// Consume change notifications until shutdown is signalled, the
    /// shutdown sender is dropped, or the queue closes.
    pub async fn run(
        mut self,
        mut changes: mpsc::Receiver<PathBuf>,
        mut shutdown: watch::Receiver<bool>,
    ) -> SyncState {
        info!(folder = %self.folder.display(), "watching for save changes");
        while !*shutdown.borrow() {
            let first = tokio::select! {
                biased;
                changed = shutdown.changed() => {
                    if changed.is_err() {
                        break;
                    }
                    continue;
                }
                path = changes.recv() => match path {
                    Some(path) => path,
                    None => break,
                },
            };
            for path in collect_batch(first, &mut changes, self.debounce).await {
                if *shutdown.borrow() {
                    break;
                }
                self.process(&path);
            }
        }
        info!("sync loop stopped");
        self.state
    }
}

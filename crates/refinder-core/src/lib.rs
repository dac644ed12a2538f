//! Session reconstruction and live save synchronization for Refinder.
//!
//! This crate turns decoded save archives into the typed session tree
//! ([`ZoneInfo`](refinder_types::ZoneInfo)) and keeps it current while the
//! game writes its save files.
//!
//! # Modules
//!
//! - [`property`] -- Typed access to property bags ([`PropertyExt`]).
//! - [`names`] -- Normalization of namespace-qualified blueprint paths.
//! - [`locator`] -- Finds the active instance and its actor container.
//! - [`zone`] -- Zone actor extraction into zone nodes.
//! - [`classify`] -- Item/event classification of non-zone actors.
//! - [`tree`] -- Two-pass arena assembly of the zone tree.
//! - [`session`] -- The full reconstruction pass for one session save.
//! - [`profile`] -- Roster and inventory resolution from the profile.
//! - [`decoder`] -- [`ArchiveDecoder`] seam and the JSON decoder.
//! - [`config`] -- Configuration loading from `refinder-config.yaml`.
//! - [`discovery`] -- Save folder discovery.
//! - [`routing`] -- Changed-path routing to profile or character.
//! - [`state`] -- [`SyncState`], the orchestrator's process-wide state.
//! - [`orchestrator`] -- Bootstrap and the live sync loop.
//! - [`error`] -- [`ReconstructError`].
//!
//! [`PropertyExt`]: property::PropertyExt
//! [`ArchiveDecoder`]: decoder::ArchiveDecoder
//! [`SyncState`]: state::SyncState
//! [`ReconstructError`]: error::ReconstructError

pub mod classify;
pub mod config;
pub mod decoder;
pub mod discovery;
pub mod error;
pub mod locator;
pub mod names;
pub mod orchestrator;
pub mod profile;
pub mod property;
pub mod routing;
pub mod session;
pub mod state;
pub mod tree;
pub mod zone;

//! Process-wide sync state owned by the orchestrator.
//!
//! Holds the roster and the last reconstructed [`ZoneInfo`] per character.
//! Values are replaced wholesale on every refresh, never patched, and only
//! the orchestrator holds the state mutably.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use refinder_types::{Character, CharacterId, CharacterUpdate, ZoneInfo};

use crate::profile::Roster;

/// Roster plus per-character session trees.
#[derive(Debug, Clone, Default)]
pub struct SyncState {
    roster: Roster,
    zones: BTreeMap<CharacterId, ZoneInfo>,
}

impl SyncState {
    /// Empty state: no characters, no active id.
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the roster and active id.
    pub fn replace_roster(&mut self, roster: Roster) {
        self.roster = roster;
    }

    /// Store the latest session tree for `id`, replacing any previous one.
    pub fn store_zone(&mut self, id: CharacterId, zone: ZoneInfo) {
        self.zones.insert(id, zone);
    }

    /// The active character id.
    pub const fn active_id(&self) -> CharacterId {
        self.roster.active_id
    }

    /// A character from the roster.
    pub fn character(&self, id: CharacterId) -> Option<&Character> {
        self.roster.characters.get(&id)
    }

    /// The last stored session tree for `id`.
    pub fn zone(&self, id: CharacterId) -> Option<&ZoneInfo> {
        self.zones.get(&id)
    }

    /// Number of characters in the roster.
    pub fn roster_len(&self) -> usize {
        self.roster.characters.len()
    }

    /// The update to publish for the active character, if both its roster
    /// entry and its session tree are known.
    pub fn active_update(&self, published_at: DateTime<Utc>) -> Option<CharacterUpdate> {
        let id = self.active_id();
        Some(CharacterUpdate {
            character: self.character(id)?.clone(),
            zone: self.zone(id)?.clone(),
            published_at,
        })
    }
}

#[cfg(test)]
mod tests {
    use refinder_types::Character;

    use super::*;

    fn roster(active: i32, ids: &[i32]) -> Roster {
        Roster {
            characters: ids
                .iter()
                .map(|&id| (CharacterId(id), Character::new(CharacterId(id))))
                .collect(),
            active_id: CharacterId(active),
        }
    }

    #[test]
    fn active_update_needs_both_halves() {
        let mut state = SyncState::new();
        assert!(state.active_update(Utc::now()).is_none());

        state.replace_roster(roster(5, &[3, 5]));
        assert_eq!(state.active_id(), CharacterId(5));
        assert_eq!(state.roster_len(), 2);
        assert!(state.active_update(Utc::now()).is_none());

        state.store_zone(CharacterId(3), ZoneInfo::default());
        assert!(state.active_update(Utc::now()).is_none());

        state.store_zone(CharacterId(5), ZoneInfo::default());
        let update = state.active_update(Utc::now());
        assert_eq!(update.map(|u| u.character.id), Some(CharacterId(5)));
    }

    #[test]
    fn store_replaces_previous_zone() {
        let mut state = SyncState::new();
        state.store_zone(CharacterId(1), ZoneInfo::default());
        state.store_zone(
            CharacterId(1),
            ZoneInfo {
                biome: "Jungle".to_owned(),
                ..ZoneInfo::default()
            },
        );
        assert_eq!(
            state.zone(CharacterId(1)).map(|z| z.biome.as_str()),
            Some("Jungle")
        );
    }

    #[test]
    fn replacing_roster_keeps_zones() {
        let mut state = SyncState::new();
        state.replace_roster(roster(1, &[1]));
        state.store_zone(CharacterId(1), ZoneInfo::default());
        state.replace_roster(roster(2, &[1, 2]));
        assert!(state.zone(CharacterId(1)).is_some());
        assert!(state.character(CharacterId(2)).is_some());
        assert!(state.active_update(Utc::now()).is_none());
    }
}

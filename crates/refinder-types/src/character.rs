//! Characters from the player profile and the published update message.

use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::ids::CharacterId;
use crate::zone::ZoneInfo;

/// Character type assumed when a saved character carries none.
pub const DEFAULT_CHARACTER_TYPE: &str = "ERemnantCharacterType::Standard";

/// A character's primary and secondary archetype.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "bindings/")]
pub struct ArchetypePair {
    /// Primary archetype, e.g. `Hunter`.
    pub primary: String,
    /// Secondary archetype (empty when not chosen yet).
    pub secondary: String,
}

impl ArchetypePair {
    /// Display form: `"<primary> / <secondary>"`.
    pub fn label(&self) -> String {
        format!("{} / {}", self.primary, self.secondary)
    }
}

/// One saved character and a snapshot of its inventory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "bindings/")]
pub struct Character {
    /// Character id (matches `save_<id>.sav`).
    pub id: CharacterId,
    /// Archetypes.
    pub archetypes: ArchetypePair,
    /// Character type, e.g. `ERemnantCharacterType::Hardcore`.
    #[serde(rename = "type")]
    pub character_type: String,
    /// Blueprint-derived ids of every item in the inventory.
    pub owned_item_ids: BTreeSet<String>,
}

impl Character {
    /// A character with no archetypes and an empty inventory.
    pub fn new(id: CharacterId) -> Self {
        Self {
            id,
            archetypes: ArchetypePair::default(),
            character_type: DEFAULT_CHARACTER_TYPE.to_owned(),
            owned_item_ids: BTreeSet::new(),
        }
    }

    /// Whether the inventory contains `item_id`.
    pub fn owns(&self, item_id: &str) -> bool {
        self.owned_item_ids.contains(item_id)
    }
}

/// Notification emitted each time the active character is republished.
///
/// Always carries the complete recomputed state, never a diff.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "bindings/")]
pub struct CharacterUpdate {
    /// The active character.
    pub character: Character,
    /// The character's reconstructed session.
    pub zone: ZoneInfo,
    /// When the update was published.
    pub published_at: DateTime<Utc>,
}

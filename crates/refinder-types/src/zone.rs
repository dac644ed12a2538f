//! The reconstructed session tree published to the presentation layer.
//!
//! A [`ZoneInfo`] is rebuilt from scratch on every refresh. Its
//! [`ZoneNode`] tree owns its children outright; there is no sharing
//! between nodes and no back-pointers (a child refers to its parent only
//! by [`ZoneId`]).

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::ids::ZoneId;

/// Sentinel used by the save format for "no destination".
pub const NO_DESTINATION: &str = "None";

// ---------------------------------------------------------------------------
// Zone links
// ---------------------------------------------------------------------------

/// A traversable connection (e.g. a waypoint) out of a zone.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "bindings/")]
pub struct ZoneLink {
    /// Zone the link belongs to, as recorded on the link itself.
    pub target_zone_id: ZoneId,
    /// Display label.
    pub label: String,
    /// Link type, e.g. `EZoneLinkType::Waypoint`.
    pub link_type: String,
    /// Destination link name, or [`NO_DESTINATION`].
    pub destination_link_id: String,
    /// Destination zone name, or [`NO_DESTINATION`].
    pub destination_zone_id: String,
    /// Internal name of the link.
    pub name_id: String,
}

impl ZoneLink {
    /// Whether both destination fields point somewhere.
    pub fn has_destination(&self) -> bool {
        self.destination_link_id != NO_DESTINATION && self.destination_zone_id != NO_DESTINATION
    }
}

impl Default for ZoneLink {
    fn default() -> Self {
        Self {
            target_zone_id: ZoneId::NO_PARENT,
            label: String::new(),
            link_type: String::new(),
            destination_link_id: NO_DESTINATION.to_owned(),
            destination_zone_id: NO_DESTINATION.to_owned(),
            name_id: String::new(),
        }
    }
}

// ---------------------------------------------------------------------------
// Items, events, rewards
// ---------------------------------------------------------------------------

/// A collectible item lying in a zone.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "bindings/")]
pub struct Item {
    /// Id of the record the item was read from.
    pub id: i32,
    /// Blueprint-derived item name, e.g. `Ring_Foo_C`.
    pub name: String,
    /// Zone the item resolved to.
    pub source_zone_id: ZoneId,
    /// Quest that spawned the item (0 when none).
    pub parent_quest_id: i32,
    /// Spawn quantity.
    pub quantity: i32,
    /// Whether the current character already owns this item.
    pub owned_by_character: bool,
}

/// Addressing pair used by the game's persistence system.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "bindings/")]
pub struct PersistenceKey {
    /// Container the spawn lives in.
    pub container_key: String,
    /// Persistent id within the container.
    pub persistent_id: u64,
}

/// One reward spawn attached to a narrative event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "bindings/")]
pub struct LootReward {
    /// Position of the spawn within its reward group.
    pub sequence_id: usize,
    /// Position of the reward group within the event's rewards.
    pub reward_group_id: usize,
    /// Spawn type, e.g. `ELootSpawnType::Item`.
    #[serde(rename = "type")]
    pub reward_type: String,
    /// Blueprint-derived reward name.
    pub actor_blueprint_id: String,
    /// Spawn quantity.
    pub quantity: i32,
    /// Where the spawn is recorded in the save's persistence system.
    pub persistence_key: PersistenceKey,
    /// Whether the current character already owns this reward.
    pub owned_by_character: bool,
}

/// A narrative event (quest, encounter, point of interest) in a zone.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "bindings/")]
pub struct Event {
    /// Class name of the event record.
    pub name: String,
    /// Rewards granted by the event, possibly empty.
    pub rewards: Vec<LootReward>,
}

// ---------------------------------------------------------------------------
// Zone tree
// ---------------------------------------------------------------------------

/// A navigable area in the session hierarchy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "bindings/")]
pub struct ZoneNode {
    /// Zone id, unique within one reconstruction.
    pub id: ZoneId,
    /// Parent zone id, or [`ZoneId::NO_PARENT`].
    pub parent_id: ZoneId,
    /// Quest that owns the zone.
    pub quest_id: i32,
    /// Display label.
    pub label: String,
    /// Outbound links.
    pub links: Vec<ZoneLink>,
    /// Items located in this zone.
    pub items: Vec<Item>,
    /// Events located in this zone.
    pub events: Vec<Event>,
    /// Child zones.
    pub children: Vec<ZoneNode>,
}

impl ZoneNode {
    /// An empty zone with the given id and parent.
    pub const fn new(id: ZoneId, parent_id: ZoneId) -> Self {
        Self {
            id,
            parent_id,
            quest_id: 0,
            label: String::new(),
            links: Vec::new(),
            items: Vec::new(),
            events: Vec::new(),
            children: Vec::new(),
        }
    }

    /// Number of zones in this subtree, including `self`.
    pub fn zone_count(&self) -> usize {
        self.children
            .iter()
            .map(Self::zone_count)
            .fold(1_usize, usize::saturating_add)
    }

    /// Depth-first search for a zone by id.
    pub fn find(&self, id: ZoneId) -> Option<&Self> {
        if self.id == id {
            return Some(self);
        }
        self.children.iter().find_map(|child| child.find(id))
    }
}

/// The published reconstruction of one character's session.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "bindings/")]
pub struct ZoneInfo {
    /// Root of the zone tree; `None` means no active instance.
    pub root: Option<ZoneNode>,
    /// Biome code of the session, e.g. `Jungle`.
    pub biome: String,
    /// Special world state flag (blood moon).
    pub special_state_flag: bool,
}

impl ZoneInfo {
    /// Number of zones in the tree (0 without a root).
    pub fn zone_count(&self) -> usize {
        self.root.as_ref().map_or(0, ZoneNode::zone_count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn link(dest_link: &str, dest_zone: &str) -> ZoneLink {
        ZoneLink {
            destination_link_id: dest_link.to_owned(),
            destination_zone_id: dest_zone.to_owned(),
            ..ZoneLink::default()
        }
    }

    #[test]
    fn link_destination_requires_both_fields() {
        assert!(link("Y", "X").has_destination());
        assert!(!link("None", "X").has_destination());
        assert!(!link("Y", "None").has_destination());
        assert!(!ZoneLink::default().has_destination());
    }

    #[test]
    fn zone_count_and_find() {
        let mut root = ZoneNode::new(ZoneId(1), ZoneId::NO_PARENT);
        let mut child = ZoneNode::new(ZoneId(2), ZoneId(1));
        child.children.push(ZoneNode::new(ZoneId(3), ZoneId(2)));
        root.children.push(child);

        assert_eq!(root.zone_count(), 3);
        assert_eq!(root.find(ZoneId(3)).map(|z| z.parent_id), Some(ZoneId(2)));
        assert!(root.find(ZoneId(9)).is_none());

        let info = ZoneInfo {
            root: Some(root),
            ..ZoneInfo::default()
        };
        assert_eq!(info.zone_count(), 3);
        assert_eq!(ZoneInfo::default().zone_count(), 0);
    }

    #[test]
    fn reward_type_serializes_as_type() {
        let reward = LootReward {
            sequence_id: 0,
            reward_group_id: 1,
            reward_type: "ELootSpawnType::Item".to_owned(),
            actor_blueprint_id: "Ring_Foo_C".to_owned(),
            quantity: 1,
            persistence_key: PersistenceKey::default(),
            owned_by_character: false,
        };
        let json = serde_json::to_value(&reward).ok();
        let ty = json
            .as_ref()
            .and_then(|v| v.get("type"))
            .and_then(serde_json::Value::as_str);
        assert_eq!(ty, Some("ELootSpawnType::Item"));
    }
}

//! Item/event classification of non-zone actors.
//!
//! Every session-scoped actor that is not a zone is exactly one of:
//!
//! - an [`Item`], when it carries a non-empty `Loot` component spawn list;
//! - an [`Event`], otherwise, with rewards decoded from its `Reward_*`
//!   components (possibly none).
//!
//! Ownership flags are computed here from the caller's owned-item set; they
//! are never read from the save.

use std::collections::BTreeSet;

use refinder_types::{Actor, Event, Item, LootReward, PersistenceKey, Properties, Value, ZoneId};

use crate::error::{ReconstructError, Result};
use crate::names::{item_name, reward_name};
use crate::property::{PropertyExt, element_struct};

const LOOT_COMPONENT: &str = "Loot";
const ZONE_COMPONENT: &str = "Zone";
const POI_COMPONENT: &str = "POI";
const REWARD_PREFIX: &str = "Reward_";
const QUEST_OBJECTIVE_PREFIX: &str = "QuestObjective_";
const SPAWNS: &str = "Spawns";
const SPAWN_ENTRY: &str = "SpawnEntry";

/// Top-level properties of a classified actor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ActorProperties {
    /// Record id.
    pub id: i32,
    /// Zone id from the top-level `ZoneID`, if present.
    pub zone_id: Option<i32>,
    /// Owning quest (0 when absent).
    pub parent_quest_id: i32,
}

/// Components of interest, borrowed from the actor's records.
#[derive(Debug, Clone, Default)]
pub struct ActorComponents<'a> {
    /// `Loot.Spawns`, when the actor has a loot component.
    pub loot_spawns: Option<&'a [Value]>,
    /// Properties of the `Zone` component (zone-id override).
    pub zone: Option<&'a Properties>,
    /// Properties of the `POI` component.
    pub poi: Option<&'a Properties>,
    /// Properties of each `Reward_*` component, in save order.
    pub rewards: Vec<&'a Properties>,
    /// Properties of each `QuestObjective_*` component, in save order.
    pub quest_objectives: Vec<&'a Properties>,
}

/// What a non-zone actor turned out to be.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Classified {
    /// A collectible item.
    Item(Item),
    /// A narrative event.
    Event(Event),
}

/// A classified actor together with the zone it belongs to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassifiedEntry {
    /// Effective zone id.
    pub zone_id: ZoneId,
    /// The item or event.
    pub entry: Classified,
}

/// Read `ID`, `ZoneID` and `ParentQuestID` from the first record that has
/// any properties.
pub fn read_properties(actor: &Actor) -> Result<ActorProperties> {
    let empty = Properties::new();
    let props = actor
        .archive
        .objects
        .iter()
        .map(|r| &r.properties)
        .find(|p| !p.is_empty())
        .unwrap_or(&empty);

    Ok(ActorProperties {
        id: props.req_i32("ID")?,
        zone_id: props.opt_i32("ZoneID")?,
        parent_quest_id: props.opt_i32("ParentQuestID")?.unwrap_or_default(),
    })
}

/// Collect the components the classifier cares about.
pub fn read_components(actor: &Actor) -> Result<ActorComponents<'_>> {
    let mut components = ActorComponents::default();
    for component in actor.archive.objects.iter().flat_map(|r| &r.components) {
        let key = component.key.as_str();
        if key == LOOT_COMPONENT {
            if let Some(spawns) = component.properties.opt_struct_array(SPAWNS)? {
                components.loot_spawns = Some(spawns);
            }
        } else if key == ZONE_COMPONENT {
            components.zone = Some(&component.properties);
        } else if key == POI_COMPONENT {
            components.poi = Some(&component.properties);
        } else if key.starts_with(REWARD_PREFIX) {
            components.rewards.push(&component.properties);
        } else if key.starts_with(QUEST_OBJECTIVE_PREFIX) {
            components.quest_objectives.push(&component.properties);
        }
    }
    Ok(components)
}

/// Zone-component override first, then the top-level `ZoneID`.
fn effective_zone(props: &ActorProperties, components: &ActorComponents<'_>) -> Result<ZoneId> {
    let zone = match components.zone {
        Some(zone) => Some(zone.req_i32("ZoneID")?),
        None => props.zone_id,
    };
    zone.map(ZoneId)
        .ok_or_else(|| ReconstructError::not_found(format!("zone id for record {}", props.id)))
}

/// The `SpawnEntry` struct of one spawn element.
fn spawn_entry(spawn: &Value) -> Result<&Properties> {
    element_struct(spawn, SPAWNS)?.req_struct(SPAWN_ENTRY)
}

/// Build an item from the first loot spawn.
fn build_item(
    props: &ActorProperties,
    zone_id: ZoneId,
    first_spawn: &Value,
    owned: &BTreeSet<String>,
) -> Result<Item> {
    let entry = spawn_entry(first_spawn)?;
    let name = item_name(entry.req_str("ActorBP")?);
    Ok(Item {
        id: props.id,
        name: name.to_owned(),
        source_zone_id: zone_id,
        parent_quest_id: props.parent_quest_id,
        quantity: entry.req_i32("Quantity")?,
        owned_by_character: owned.contains(name),
    })
}

/// Decode one reward spawn.
fn build_reward(
    spawn: &Value,
    sequence_id: usize,
    reward_group_id: usize,
    owned: &BTreeSet<String>,
) -> Result<LootReward> {
    let fields = element_struct(spawn, SPAWNS)?;
    let entry = fields.req_struct(SPAWN_ENTRY)?;
    let key = fields.req_struct("Key")?;
    let name = reward_name(entry.req_str("ActorBP")?);
    Ok(LootReward {
        sequence_id,
        reward_group_id,
        reward_type: entry.opt_enum("Type")?.unwrap_or_default().to_owned(),
        actor_blueprint_id: name.to_owned(),
        quantity: entry.req_i32("Quantity")?,
        persistence_key: PersistenceKey {
            container_key: key.req_str("ContainerKey")?.to_owned(),
            persistent_id: key.req_u64("PersistentID")?,
        },
        owned_by_character: owned.contains(name),
    })
}

/// Build an event and its rewards.
fn build_event(
    actor: &Actor,
    components: &ActorComponents<'_>,
    owned: &BTreeSet<String>,
) -> Result<Event> {
    let mut rewards = Vec::new();
    for (reward_group_id, reward) in components.rewards.iter().enumerate() {
        let Some(spawns) = reward.opt_struct_array(SPAWNS)? else {
            continue;
        };
        for (sequence_id, spawn) in spawns.iter().enumerate() {
            rewards.push(build_reward(spawn, sequence_id, reward_group_id, owned)?);
        }
    }
    Ok(Event {
        name: actor.class_name.clone(),
        rewards,
    })
}

/// Classify one non-zone actor against the current owned-item set.
pub fn classify(actor: &Actor, owned: &BTreeSet<String>) -> Result<ClassifiedEntry> {
    let props = read_properties(actor)?;
    let components = read_components(actor)?;
    let zone_id = effective_zone(&props, &components)?;

    let entry = match components.loot_spawns.and_then(<[Value]>::first) {
        Some(first_spawn) => Classified::Item(build_item(&props, zone_id, first_spawn, owned)?),
        None => Classified::Event(build_event(actor, &components, owned)?),
    };
    Ok(ClassifiedEntry { zone_id, entry })
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::panic)]
mod tests {
    use refinder_types::{Component, Record};

    use super::*;

    fn spawn(actor_bp: &str, quantity: i32) -> Value {
        Value::map([
            (
                "SpawnEntry",
                Value::map([
                    ("ActorBP", Value::String(actor_bp.to_owned())),
                    ("Quantity", Value::Int32(quantity)),
                    ("Type", Value::enumeration("ELootSpawnType::Item")),
                ]),
            ),
            (
                "Key",
                Value::map([
                    ("ContainerKey", Value::String("/Game/Quest_1_Container".to_owned())),
                    ("PersistentID", Value::UInt64(555)),
                ]),
            ),
        ])
    }

    fn item_actor(zone_id: i32, actor_bp: &str) -> Actor {
        Actor::new(
            "Item_Pickup_C",
            vec![
                Record::new("Item")
                    .with_property("ID", Value::Int32(3))
                    .with_property("ZoneID", Value::Int32(zone_id))
                    .with_property("ParentQuestID", Value::Int32(8))
                    .with_component(Component::new("Loot").with_property(
                        "Spawns",
                        Value::ArrayOfStruct(vec![spawn(actor_bp, 2)]),
                    )),
            ],
        )
    }

    fn owned(ids: &[&str]) -> BTreeSet<String> {
        ids.iter().map(|s| (*s).to_owned()).collect()
    }

    #[test]
    fn loot_spawn_makes_an_item() {
        let result = classify(&item_actor(2, "Pkg.Sword"), &owned(&[])).unwrap();
        assert_eq!(result.zone_id, ZoneId(2));
        let Classified::Item(item) = result.entry else {
            panic!("expected an item");
        };
        assert_eq!(item.name, "Sword");
        assert_eq!(item.quantity, 2);
        assert_eq!(item.id, 3);
        assert_eq!(item.parent_quest_id, 8);
        assert!(!item.owned_by_character);
    }

    #[test]
    fn ownership_is_set_membership() {
        let result = classify(&item_actor(2, "Pkg.Sword"), &owned(&["Sword"])).ok();
        assert!(matches!(
            result.map(|r| r.entry),
            Some(Classified::Item(Item {
                owned_by_character: true,
                ..
            }))
        ));
    }

    #[test]
    fn zone_component_overrides_top_level_zone() {
        let mut actor = item_actor(2, "Pkg.Sword");
        if let Some(record) = actor.archive.objects.first_mut() {
            record
                .components
                .push(Component::new("Zone").with_property("ZoneID", Value::Int32(9)));
        }
        let result = classify(&actor, &owned(&[])).ok();
        assert_eq!(result.map(|r| r.zone_id), Some(ZoneId(9)));
    }

    #[test]
    fn unresolved_zone_is_rejected() {
        let actor = Actor::new(
            "Quest_Event_C",
            vec![Record::new("Event").with_property("ID", Value::Int32(4))],
        );
        assert!(matches!(
            classify(&actor, &owned(&[])),
            Err(ReconstructError::NotFound { .. })
        ));
    }

    #[test]
    fn missing_id_is_a_parse_error() {
        let actor = Actor::new(
            "Quest_Event_C",
            vec![Record::new("Event").with_property("ZoneID", Value::Int32(4))],
        );
        assert!(matches!(
            classify(&actor, &owned(&[])),
            Err(ReconstructError::Parse { .. })
        ));
    }

    #[test]
    fn empty_spawn_list_makes_an_event() {
        let actor = Actor::new(
            "Quest_Miniboss_Thing_C",
            vec![
                Record::new("Event")
                    .with_property("ID", Value::Int32(4))
                    .with_property("ZoneID", Value::Int32(1))
                    .with_component(
                        Component::new("Loot")
                            .with_property("Spawns", Value::ArrayOfStruct(vec![])),
                    ),
            ],
        );
        let result = classify(&actor, &owned(&[])).ok();
        assert!(matches!(
            result.map(|r| r.entry),
            Some(Classified::Event(Event { ref name, ref rewards }))
                if name == "Quest_Miniboss_Thing_C" && rewards.is_empty()
        ));
    }

    #[test]
    fn event_rewards_are_decoded_in_order() {
        let actor = Actor::new(
            "Quest_Event_Bridge_C",
            vec![
                Record::new("Event")
                    .with_property("ID", Value::Int32(4))
                    .with_property("ZoneID", Value::Int32(1))
                    .with_component(Component::new("Reward_NoSpawns"))
                    .with_component(Component::new("Reward_Main").with_property(
                        "Spawns",
                        Value::ArrayOfStruct(vec![spawn("Pkg.Ring_C", 1), spawn("Pkg.X", 3)]),
                    ))
                    .with_component(Component::new("QuestObjective_Kill"))
                    .with_component(Component::new("POI")),
            ],
        );
        let result = classify(&actor, &owned(&["Ring_C"])).ok();
        let Some(ClassifiedEntry {
            entry: Classified::Event(event),
            ..
        }) = result
        else {
            panic!("expected an event");
        };
        assert_eq!(event.rewards.len(), 2);
        let first = event.rewards.first();
        assert_eq!(first.map(|r| r.actor_blueprint_id.as_str()), Some("Ring_C"));
        assert_eq!(first.map(|r| (r.reward_group_id, r.sequence_id)), Some((1, 0)));
        assert_eq!(first.map(|r| r.owned_by_character), Some(true));
        assert_eq!(
            first.map(|r| r.persistence_key.persistent_id),
            Some(555)
        );
        let second = event.rewards.get(1);
        assert_eq!(
            second.map(|r| r.actor_blueprint_id.as_str()),
            Some(crate::names::UNKNOWN_EVENT_REWARD)
        );
        assert_eq!(second.map(|r| r.sequence_id), Some(1));
    }

    #[test]
    fn components_are_collected_by_key() {
        let actor = Actor::new(
            "X",
            vec![Record::new("A")
                .with_component(Component::new("POI"))
                .with_component(Component::new("QuestObjective_1"))
                .with_component(Component::new("QuestObjective_2"))
                .with_component(Component::new("Reward_1"))],
        );
        let components = read_components(&actor).ok();
        assert!(components.as_ref().is_some_and(|c| c.poi.is_some()));
        assert_eq!(components.as_ref().map(|c| c.quest_objectives.len()), Some(2));
        assert_eq!(components.as_ref().map(|c| c.rewards.len()), Some(1));
        assert!(components.is_some_and(|c| c.loot_spawns.is_none() && c.zone.is_none()));
    }
}

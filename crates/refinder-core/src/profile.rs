//! Character/inventory resolution from the player profile archive.
//!
//! The profile holds one `BP_RemnantSaveGameProfile_C` record naming the
//! active character and one `SavedCharacter` record per character. Each
//! character nests its own blob archive whose master player record carries
//! the inventory.

use std::collections::{BTreeMap, BTreeSet};

use refinder_types::{
    Archive, ArchetypePair, Character, CharacterId, DEFAULT_CHARACTER_TYPE, Properties, Record,
};
use tracing::debug;

use crate::error::{ReconstructError, Result};
use crate::names::{archetype_name, item_name};
use crate::property::{PropertyExt, element_struct};

/// Class name of the profile record.
pub const PROFILE_RECORD_CLASS: &str = "BP_RemnantSaveGameProfile_C";

/// Class name of saved character records.
pub const CHARACTER_RECORD_CLASS: &str = "SavedCharacter";

/// Class name of the master player record inside a character blob.
pub const MASTER_PLAYER_CLASS: &str = "Character_Master_Player_C";

const INVENTORY_COMPONENT: &str = "Inventory";
const INVENTORY_ITEMS: &str = "Items";

/// Every character in the profile plus the active character id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Roster {
    /// Characters keyed by id. Duplicate ids keep the last record.
    pub characters: BTreeMap<CharacterId, Character>,
    /// Active character, [`CharacterId::NONE`] when there is none.
    pub active_id: CharacterId,
}

impl Default for Roster {
    fn default() -> Self {
        Self {
            characters: BTreeMap::new(),
            active_id: CharacterId::NONE,
        }
    }
}

impl Roster {
    /// The active character, if it exists in the roster.
    pub fn active(&self) -> Option<&Character> {
        self.characters.get(&self.active_id)
    }
}

/// Normalize the archetype at `field`; empty when absent.
fn archetype(props: &Properties, field: &str) -> Result<String> {
    Ok(props
        .opt_str(field)?
        .map(archetype_name)
        .unwrap_or_default()
        .to_owned())
}

/// Owned item ids from a character's nested archive.
fn owned_items(blob: &Archive) -> Result<BTreeSet<String>> {
    let mut owned = BTreeSet::new();
    let Some(master) = blob
        .objects
        .iter()
        .find(|r| r.class_name == MASTER_PLAYER_CLASS)
    else {
        return Ok(owned);
    };
    for component in master
        .components
        .iter()
        .filter(|c| c.key == INVENTORY_COMPONENT)
    {
        let Some(items) = component.properties.opt_struct_array(INVENTORY_ITEMS)? else {
            continue;
        };
        for item in items {
            let blueprint = element_struct(item, INVENTORY_ITEMS)?
                .opt_object_class("ItemBP")?
                .ok_or_else(|| ReconstructError::parse("ItemBP", "Object", "nothing"))?;
            owned.insert(item_name(blueprint).to_owned());
        }
    }
    Ok(owned)
}

/// Decode one `SavedCharacter` record.
pub fn resolve_character(record: &Record) -> Result<Character> {
    let props = &record.properties;
    let owned_item_ids = match props.opt_blob("CharacterData")? {
        Some(blob) => owned_items(blob)?,
        None => BTreeSet::new(),
    };
    Ok(Character {
        id: CharacterId(props.req_i32("ID")?),
        archetypes: ArchetypePair {
            primary: archetype(props, "Archetype")?,
            secondary: archetype(props, "SecondaryArchetype")?,
        },
        character_type: props
            .opt_enum("CharacterType")?
            .unwrap_or(DEFAULT_CHARACTER_TYPE)
            .to_owned(),
        owned_item_ids,
    })
}

/// Resolve the roster and active character id from a profile archive.
///
/// # Errors
///
/// [`ReconstructError::NotFound`] without a profile record;
/// [`ReconstructError::Parse`] for a mistyped `ActiveCharacterIndex` or a
/// malformed character record.
pub fn resolve_roster(archive: &Archive) -> Result<Roster> {
    let profile = archive
        .objects
        .iter()
        .find(|r| r.class_name == PROFILE_RECORD_CLASS)
        .ok_or_else(|| ReconstructError::not_found("profile record"))?;
    let active_id = profile
        .properties
        .opt_i32("ActiveCharacterIndex")?
        .map_or(CharacterId::NONE, CharacterId);

    let mut characters = BTreeMap::new();
    for record in archive
        .objects
        .iter()
        .filter(|r| r.class_name == CHARACTER_RECORD_CLASS)
    {
        let character = resolve_character(record)?;
        characters.insert(character.id, character);
    }
    debug!(%active_id, characters = characters.len(), "roster resolved");
    Ok(Roster {
        characters,
        active_id,
    })
}

//! Shared type definitions for Refinder.
//!
//! This crate is the single source of truth for the types that cross crate
//! boundaries: the generic record model the save decoder produces, and the
//! reconstructed session tree the engine publishes. Published types flow
//! downstream to `TypeScript` via `ts-rs` for the frontend.
//!
//! # Modules
//!
//! - [`ids`] -- Type-safe integer wrappers for character and zone ids
//! - [`value`] -- Generic record model (values, records, archives, actors)
//! - [`zone`] -- Zone tree, items, events and loot rewards
//! - [`character`] -- Characters and the published update message

pub mod character;
pub mod ids;
pub mod value;
pub mod zone;

// Re-export all public types at crate root for convenience.
pub use character::{ArchetypePair, Character, CharacterUpdate, DEFAULT_CHARACTER_TYPE};
pub use ids::{CharacterId, ZoneId};
pub use value::{
    Actor, Archive, Component, Container, EnumValue, ObjectRef, Properties, Record, StructValue,
    TextValue, Value,
};
pub use zone::{Event, Item, LootReward, NO_DESTINATION, PersistenceKey, ZoneInfo, ZoneLink, ZoneNode};

#[cfg(test)]
mod tests {
    //! `TypeScript` binding generation.

    #[test]
    fn export_bindings() {
        // ts-rs generates TypeScript bindings when types with
        // #[ts(export)] are used. The files are written to the
        // `bindings/` directory relative to the crate root.
        use ts_rs::TS;

        // IDs
        let _ = crate::ids::CharacterId::export_all();
        let _ = crate::ids::ZoneId::export_all();

        // Zone tree
        let _ = crate::zone::ZoneLink::export_all();
        let _ = crate::zone::Item::export_all();
        let _ = crate::zone::PersistenceKey::export_all();
        let _ = crate::zone::LootReward::export_all();
        let _ = crate::zone::Event::export_all();
        let _ = crate::zone::ZoneNode::export_all();
        let _ = crate::zone::ZoneInfo::export_all();

        // Characters
        let _ = crate::character::ArchetypePair::export_all();
        let _ = crate::character::Character::export_all();
        let _ = crate::character::CharacterUpdate::export_all();
    }
}

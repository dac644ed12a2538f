//! Locating the active gameplay instance inside a session save.
//!
//! A session save is a flat list of top-level records. The instance is
//! found in three hops:
//!
//! 1. the record whose `Key` ends with [`PERSISTENT_LEVEL_SUFFIX`] holds the
//!    persistent level's actor container;
//! 2. the first actor in that container whose class starts with
//!    [`ADVENTURE_MODE_PREFIX`] is the adventure quest, and its `ID`
//!    property names the instance;
//! 3. the record whose `Key` starts with `/Game/Quest_<ID>_Container` holds
//!    every zone and item actor of the instance.
//!
//! Each hop is a required anchor: a miss is [`ReconstructError::NotFound`].

use refinder_types::{Actor, Archive, Container, Record, Value};
use tracing::debug;

use crate::error::{ReconstructError, Result};
use crate::names::ADVENTURE_MODE_PREFIX;
use crate::property::PropertyExt;

/// Key suffix identifying the persistent level record.
pub const PERSISTENT_LEVEL_SUFFIX: &str = "Main.Main:PersistentLevel";

/// Class prefix of actors that are not scoped to the session.
pub const GLOBAL_QUEST_PREFIX: &str = "Quest_Global_";

const KEY_PROPERTY: &str = "Key";
const BLOB_PROPERTY: &str = "Blob";
const ID_PROPERTY: &str = "ID";

/// Key prefix of the container record for instance `id`.
pub fn container_key_prefix(id: i32) -> String {
    format!("/Game/Quest_{id}_Container")
}

/// The located instance: its adventure actor, id and actor universe.
#[derive(Debug, Clone, Copy)]
pub struct Instance<'a> {
    /// The adventure quest actor.
    pub adventure: &'a Actor,
    /// The instance id read from the adventure actor.
    pub instance_id: i32,
    /// Every actor in the instance container, including global ones.
    pub actors: &'a [Actor],
}

impl<'a> Instance<'a> {
    /// Session-scoped actors: everything except [`GLOBAL_QUEST_PREFIX`]
    /// classes, in save order.
    pub fn session_actors(&self) -> impl Iterator<Item = &'a Actor> + use<'a> {
        self.actors
            .iter()
            .filter(|actor| !actor.class_name.starts_with(GLOBAL_QUEST_PREFIX))
    }
}

/// String value of a record's `Key` property, if it has one.
fn record_key(record: &Record) -> Option<&str> {
    record.property(KEY_PROPERTY).and_then(Value::as_str)
}

/// The actor container nested in a record's `Blob` property.
fn blob_container<'a>(record: &'a Record, what: &str) -> Result<&'a Container> {
    record
        .properties
        .opt_container(BLOB_PROPERTY)?
        .ok_or_else(|| ReconstructError::not_found(format!("actor container in {what}")))
}

/// Find the active instance in a decoded session archive.
pub fn locate(archive: &Archive) -> Result<Instance<'_>> {
    let level = archive
        .objects
        .iter()
        .find(|r| record_key(r).is_some_and(|k| k.ends_with(PERSISTENT_LEVEL_SUFFIX)))
        .ok_or_else(|| ReconstructError::not_found("persistent level record"))?;

    let adventure = blob_container(level, "persistent level")?
        .actors
        .iter()
        .find(|a| a.class_name.starts_with(ADVENTURE_MODE_PREFIX))
        .ok_or_else(|| ReconstructError::not_found("adventure actor"))?;

    let instance_id = adventure
        .archive
        .objects
        .iter()
        .find_map(|r| r.properties.opt_i32(ID_PROPERTY).transpose())
        .transpose()?
        .ok_or_else(|| ReconstructError::not_found("adventure instance id"))?;

    let prefix = container_key_prefix(instance_id);
    let container_record = archive
        .objects
        .iter()
        .find(|r| record_key(r).is_some_and(|k| k.starts_with(&prefix)))
        .ok_or_else(|| ReconstructError::not_found(format!("instance container {prefix}")))?;

    let container = blob_container(container_record, "instance container")?;
    debug!(
        adventure = adventure.class_name,
        instance_id,
        actors = container.actors.len(),
        "instance located"
    );

    Ok(Instance {
        adventure,
        instance_id,
        actors: &container.actors,
    })
}

//! Session reconstruction: one decoded session archive into a [`ZoneInfo`].
//!
//! Runs the locator, then extracts every zone actor and classifies every
//! other session-scoped actor, and finally assembles the tree. Locator
//! failures and zone extraction failures abort the pass; a malformed
//! item/event actor is skipped with a warning.

use std::collections::BTreeSet;

use refinder_types::{Actor, Archive, ZoneInfo};
use tracing::{debug, warn};

use crate::classify::classify;
use crate::error::Result;
use crate::locator::locate;
use crate::names::biome_name;
use crate::property::PropertyExt;
use crate::tree::assemble;
use crate::zone::{ZONE_ACTOR_CLASS, extract_zone};

const VARIABLES: &str = "Variables";
const BLOOD_MOON: &str = "IsBloodMoon";

/// Read the blood-moon flag from the adventure actor's `Variables`
/// component. Absent means `false`.
pub fn special_state_flag(adventure: &Actor) -> Result<bool> {
    let variables = adventure
        .archive
        .objects
        .iter()
        .flat_map(|r| &r.components)
        .find(|c| c.key == VARIABLES);
    let Some(variables) = variables else {
        return Ok(false);
    };
    let Some(vars) = variables.properties.opt_struct(VARIABLES)? else {
        return Ok(false);
    };
    Ok(vars.opt_bool(BLOOD_MOON)?.unwrap_or(false))
}

/// Reconstruct the session tree, computing ownership against `owned`.
pub fn reconstruct(archive: &Archive, owned: &BTreeSet<String>) -> Result<ZoneInfo> {
    let instance = locate(archive)?;

    let mut zones = Vec::new();
    let mut entries = Vec::new();
    let mut skipped = 0_usize;
    for actor in instance.session_actors() {
        if actor.class_name == ZONE_ACTOR_CLASS {
            zones.push(extract_zone(&actor.archive)?);
            continue;
        }
        match classify(actor, owned) {
            Ok(entry) => entries.push(entry),
            Err(e) => {
                skipped = skipped.saturating_add(1);
                warn!(class = actor.class_name, error = %e, "skipping malformed record");
            }
        }
    }
    debug!(
        zones = zones.len(),
        entries = entries.len(),
        skipped,
        "session actors processed"
    );

    let special_state_flag = special_state_flag(instance.adventure)?;
    let root = assemble(zones, entries)?;
    Ok(ZoneInfo {
        root,
        biome: biome_name(&instance.adventure.class_name).to_owned(),
        special_state_flag,
    })
}

//! Tree assembly: flat zone nodes and classified entries into one tree.
//!
//! Built in two passes over an arena. First every zone is placed in a slot
//! and indexed by id, and each classified entry is attached to the zone it
//! resolved to. Then parent-to-child edges are resolved by id lookup and
//! the owned tree is materialized from the root by moving nodes out of
//! their slots. A node is moved at most once, so malformed parent chains
//! (self-parents, cycles) can never be reached twice.

use std::collections::BTreeMap;

use refinder_types::{ZoneId, ZoneNode};
use tracing::debug;

use crate::classify::{Classified, ClassifiedEntry};
use crate::error::{ReconstructError, Result};

/// Whether a zone qualifies as the tree root: parentless, with at least
/// one link whose destination fields are both set.
pub fn is_root_candidate(zone: &ZoneNode) -> bool {
    zone.parent_id.is_no_parent() && zone.links.iter().any(|link| link.has_destination())
}

/// Move `slot` and its reachable descendants out of the arena.
fn materialize(
    arena: &mut [Option<ZoneNode>],
    children: &[Vec<usize>],
    slot: usize,
) -> Option<ZoneNode> {
    let mut node = arena.get_mut(slot)?.take()?;
    for &child in children.get(slot).map_or(&[][..], Vec::as_slice) {
        if let Some(child_node) = materialize(arena, children, child) {
            node.children.push(child_node);
        }
    }
    Some(node)
}

/// Link zones into a rooted tree and distribute entries to their zones.
///
/// Returns `Ok(None)` when no zone qualifies as root (no active instance).
/// Zones whose parent id is unknown are dropped silently, as are entries
/// whose zone id matches no zone.
///
/// # Errors
///
/// [`ReconstructError::AmbiguousRoot`] when more than one zone qualifies.
pub fn assemble(zones: Vec<ZoneNode>, entries: Vec<ClassifiedEntry>) -> Result<Option<ZoneNode>> {
    let index: BTreeMap<ZoneId, usize> = zones
        .iter()
        .enumerate()
        .map(|(slot, zone)| (zone.id, slot))
        .collect();

    let candidates: Vec<usize> = zones
        .iter()
        .enumerate()
        .filter(|(_, zone)| is_root_candidate(zone))
        .map(|(slot, _)| slot)
        .collect();

    let mut children: Vec<Vec<usize>> = vec![Vec::new(); zones.len()];
    let mut orphans = 0_usize;
    for (slot, zone) in zones.iter().enumerate() {
        if zone.parent_id.is_no_parent() {
            continue;
        }
        match index
            .get(&zone.parent_id)
            .and_then(|&parent| children.get_mut(parent))
        {
            Some(siblings) => siblings.push(slot),
            None => orphans = orphans.saturating_add(1),
        }
    }

    let mut arena: Vec<Option<ZoneNode>> = zones.into_iter().map(Some).collect();

    let mut unplaced = 0_usize;
    for ClassifiedEntry { zone_id, entry } in entries {
        let Some(zone) = index
            .get(&zone_id)
            .and_then(|&slot| arena.get_mut(slot))
            .and_then(Option::as_mut)
        else {
            unplaced = unplaced.saturating_add(1);
            continue;
        };
        match entry {
            Classified::Item(item) => zone.items.push(item),
            Classified::Event(event) => zone.events.push(event),
        }
    }

    if orphans > 0 || unplaced > 0 {
        debug!(orphans, unplaced, "zones or entries without a known zone dropped");
    }

    match candidates.as_slice() {
        [] => Ok(None),
        [root] => Ok(materialize(&mut arena, &children, *root)),
        many => Err(ReconstructError::AmbiguousRoot {
            candidates: many.len(),
        }),
    }
}

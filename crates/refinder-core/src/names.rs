//! Normalization of namespace-qualified blueprint paths.
//!
//! Save data refers to classes by path, e.g.
//! `/Game/World_Jungle/Items/Ring_Foo.Ring_Foo_C`. Items are identified by
//! the segment after the namespace separator (`Ring_Foo_C`), and that
//! same derived id is what inventory snapshots contain, so ownership is a
//! plain string comparison.

/// Separator between a blueprint's package path and its class name.
pub const NAMESPACE_SEPARATOR: char = '.';

/// Name given to event rewards whose blueprint id is unusable.
pub const UNKNOWN_EVENT_REWARD: &str = "Unknown Event Reward";

/// Prefix of adventure-mode quest classes; stripped to obtain the biome.
pub const ADVENTURE_MODE_PREFIX: &str = "Quest_AdventureMode_";

/// Suffix of generated blueprint classes.
const CLASS_SUFFIX: &str = "_C";

const ARCHETYPE_PREFIX: &str = "Archetype_";
const ARCHETYPE_SUFFIX: &str = "_UI_C";

/// The segment after the namespace separator, if there is one.
pub fn blueprint_id(path: &str) -> Option<&str> {
    path.split(NAMESPACE_SEPARATOR).nth(1)
}

/// Item name derived from a loot-spawn blueprint path. Paths without a
/// separator are kept whole.
pub fn item_name(path: &str) -> &str {
    blueprint_id(path).unwrap_or(path)
}

/// Reward name derived from a loot-spawn blueprint path, falling back to
/// [`UNKNOWN_EVENT_REWARD`] when the derived name is shorter than two
/// characters.
pub fn reward_name(path: &str) -> &str {
    let name = item_name(path);
    if name.chars().count() < 2 {
        UNKNOWN_EVENT_REWARD
    } else {
        name
    }
}

/// Archetype name from a namespace-qualified archetype path, e.g.
/// `/Game/.../Archetype_Hunter_UI.Archetype_Hunter_UI_C` -> `Hunter`.
/// Empty when the path carries no class segment.
pub fn archetype_name(path: &str) -> &str {
    blueprint_id(path).map_or("", |class| {
        let class = class.strip_prefix(ARCHETYPE_PREFIX).unwrap_or(class);
        class.strip_suffix(ARCHETYPE_SUFFIX).unwrap_or(class)
    })
}

/// Biome code from an adventure quest class name, e.g.
/// `Quest_AdventureMode_Jungle_C` -> `Jungle`.
pub fn biome_name(class_name: &str) -> &str {
    let name = class_name
        .strip_prefix(ADVENTURE_MODE_PREFIX)
        .unwrap_or(class_name);
    name.strip_suffix(CLASS_SUFFIX).unwrap_or(name)
}

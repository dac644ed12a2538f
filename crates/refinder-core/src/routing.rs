//! Routing of changed paths to the entity they belong to.

use std::path::Path;

use refinder_types::CharacterId;

use crate::config::SavesConfig;

/// What a changed file means to the orchestrator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SaveFileKind {
    /// The profile file: roster and active character.
    Profile,
    /// A character's session save.
    Character(CharacterId),
    /// Anything else in the folder.
    Ignored,
}

/// Classify `path` by file name.
///
/// Only files carrying the save extension are considered; the profile file
/// is matched by exact name, character saves by `<prefix>_<id>.<ext>`.
pub fn route(path: &Path, saves: &SavesConfig) -> SaveFileKind {
    if path.extension().and_then(|e| e.to_str()) != Some(saves.extension.as_str()) {
        return SaveFileKind::Ignored;
    }
    let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
        return SaveFileKind::Ignored;
    };
    if name == saves.profile_file {
        return SaveFileKind::Profile;
    }
    path.file_stem()
        .and_then(|s| s.to_str())
        .and_then(|stem| stem.strip_prefix(saves.character_file_prefix.as_str()))
        .and_then(|rest| rest.strip_prefix('_'))
        .and_then(|id| id.parse::<i32>().ok())
        .map_or(SaveFileKind::Ignored, |id| SaveFileKind::Character(CharacterId(id)))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kind(path: &str) -> SaveFileKind {
        route(Path::new(path), &SavesConfig::default())
    }

    #[test]
    fn profile_is_recognized() {
        assert_eq!(kind("/saves/123/profile.sav"), SaveFileKind::Profile);
    }

    #[test]
    fn character_saves_carry_their_id() {
        assert_eq!(
            kind("/saves/123/save_3.sav"),
            SaveFileKind::Character(CharacterId(3))
        );
        assert_eq!(kind("save_0.sav"), SaveFileKind::Character(CharacterId(0)));
    }

    #[test]
    fn other_files_are_ignored() {
        assert_eq!(kind("/saves/123/save_3.sav.json"), SaveFileKind::Ignored);
        assert_eq!(kind("/saves/123/save_3.bak"), SaveFileKind::Ignored);
        assert_eq!(kind("/saves/123/save_x.sav"), SaveFileKind::Ignored);
        assert_eq!(kind("/saves/123/save.sav"), SaveFileKind::Ignored);
        assert_eq!(kind("/saves/123/profile.sav.tmp"), SaveFileKind::Ignored);
        assert_eq!(kind("/saves/123/other_1.sav"), SaveFileKind::Ignored);
    }
}

use pm_core::{ActiveLevelRef, EntityKind, GameDefinition, Level, PmError, Scene};

use crate::SceneHost;

/// Host-side handle for a loadable scene.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BuildTarget(pub usize);

fn expect_unique<'a, T>(
    mut matches: impl Iterator<Item = &'a T>,
    kind: EntityKind,
    key: &str,
) -> Result<&'a T, PmError> {
    let Some(first) = matches.next() else {
        return Err(PmError::not_found(kind, key));
    };
    if matches.next().is_some() {
        return Err(PmError::ambiguous(kind, key));
    }
    Ok(first)
}

pub fn find_scene<'a>(definition: &'a GameDefinition, name: &str) -> Result<&'a Scene, PmError> {
    expect_unique(
        definition.scenes.iter().filter(|scene| scene.name == name),
        EntityKind::Scene,
        name,
    )
}

pub fn find_level<'a>(scene: &'a Scene, id: &str) -> Result<&'a Level, PmError> {
    expect_unique(
        scene.levels.iter().filter(|level| level.id == id),
        EntityKind::Level,
        id,
    )
}

pub fn active_level(
    definition: &GameDefinition,
    index: usize,
) -> Result<&ActiveLevelRef, PmError> {
    definition.active_levels.get(index).ok_or_else(|| {
        PmError::precondition(format!(
            "level index {} is out of range ({} active levels)",
            index,
            definition.active_levels.len()
        ))
    })
}

pub fn resolve_build_target(
    host: &dyn SceneHost,
    scene_name: &str,
) -> Result<BuildTarget, PmError> {
    host.build_target(scene_name)
        .ok_or_else(|| PmError::UnboundScene(scene_name.to_string()))
}

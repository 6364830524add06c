use std::fs;
use std::path::PathBuf;

use pm_core::{GameDefinition, PmError};

pub const GAME_FILE_SUFFIX: &str = ".game.json";

pub fn workspace_root() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("..")
        .join("..")
}

pub fn games_root() -> PathBuf {
    workspace_root().join("demos").join("games")
}

pub fn game_path(name: &str) -> PathBuf {
    games_root().join(format!("{}{}", name, GAME_FILE_SUFFIX))
}

pub fn load_game(name: &str) -> Result<GameDefinition, PmError> {
    let path = game_path(name);
    let raw = fs::read_to_string(&path).map_err(|error| {
        PmError::Definition(format!("failed to read {}: {}", path.display(), error))
    })?;
    GameDefinition::from_json_str(&raw)
}

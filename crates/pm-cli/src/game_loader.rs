use std::fs;
use std::path::{Path, PathBuf};

use pm_core::{GameDefinition, GlobalDefaults};
use walkdir::WalkDir;

use crate::{
    map_cli_defaults_read, map_cli_game_path, map_cli_game_read, map_cli_games_scan, CliError,
};

pub(crate) const GAME_FILE_SUFFIX: &str = ".game.json";

fn absolute(raw: &str) -> Result<PathBuf, CliError> {
    let path = PathBuf::from(raw);
    if path.is_absolute() {
        return Ok(path);
    }
    Ok(std::env::current_dir().map_err(map_cli_game_path)?.join(path))
}

pub(crate) fn resolve_game_file(game: &str) -> Result<PathBuf, CliError> {
    let path = absolute(game)?;
    if !path.exists() {
        return Err(CliError::new(
            "CLI_GAME_NOT_FOUND",
            format!("game file does not exist: {}", path.display()),
        ));
    }
    if !path.is_file() {
        return Err(CliError::new(
            "CLI_GAME_NOT_FILE",
            format!("game path is not a file: {}", path.display()),
        ));
    }
    Ok(path)
}

pub(crate) fn resolve_games_dir(games_dir: &str) -> Result<PathBuf, CliError> {
    let path = absolute(games_dir)?;
    if !path.is_dir() {
        return Err(CliError::new(
            "CLI_GAMES_DIR_NOT_FOUND",
            format!("games-dir is not a directory: {}", path.display()),
        ));
    }
    Ok(path)
}

pub(crate) fn load_game_file(path: &Path) -> Result<GameDefinition, CliError> {
    let raw = fs::read_to_string(path).map_err(map_cli_game_read)?;
    Ok(GameDefinition::from_json_str(&raw)?)
}

pub(crate) fn load_defaults(path: Option<&str>) -> Result<GlobalDefaults, CliError> {
    let Some(path) = path else {
        return Ok(GlobalDefaults::default());
    };
    let raw = fs::read_to_string(absolute(path)?).map_err(map_cli_defaults_read)?;
    Ok(GlobalDefaults::from_json_str(&raw)?)
}

/// Every `*.game.json` below `games_dir`, sorted by path.
pub(crate) fn find_game_files(games_dir: &Path) -> Result<Vec<PathBuf>, CliError> {
    let mut games = Vec::new();
    for entry in WalkDir::new(games_dir).follow_links(false) {
        let entry = entry.map_err(map_cli_games_scan)?;
        if !entry.file_type().is_file() {
            continue;
        }
        let is_game = entry
            .file_name()
            .to_str()
            .is_some_and(|name| name.ends_with(GAME_FILE_SUFFIX));
        if is_game {
            games.push(entry.into_path());
        }
    }
    games.sort();

    if games.is_empty() {
        return Err(CliError::new(
            "CLI_GAMES_EMPTY",
            format!("No {} files under {}", GAME_FILE_SUFFIX, games_dir.display()),
        ));
    }
    Ok(games)
}

pub(crate) fn relative_display(root: &Path, path: &Path) -> String {
    path.strip_prefix(root)
        .unwrap_or(path)
        .to_string_lossy()
        .replace('\\', "/")
}

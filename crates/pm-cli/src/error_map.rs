use std::fmt::Display;

use pm_core::PmError;
use thiserror::Error;

#[derive(Debug, Error)]
pub(crate) enum CliError {
    #[error(transparent)]
    Game(#[from] PmError),
    #[error("{message}")]
    Host { code: &'static str, message: String },
}

impl CliError {
    pub(crate) fn new(code: &'static str, message: impl Into<String>) -> Self {
        Self::Host {
            code,
            message: message.into(),
        }
    }

    pub(crate) fn code(&self) -> &'static str {
        match self {
            Self::Game(error) => error.code(),
            Self::Host { code, .. } => *code,
        }
    }
}

fn map_error(code: &'static str, error: impl Display) -> CliError {
    CliError::new(code, error.to_string())
}

pub(crate) fn json_line(value: &impl serde::Serialize) -> String {
    serde_json::to_string(value).unwrap_or_else(|_| "null".to_string())
}

pub(crate) fn emit_error(error: CliError) -> i32 {
    println!("RESULT:ERROR");
    println!("ERROR_CODE:{}", error.code());
    println!("ERROR_MSG_JSON:{}", json_line(&error.to_string()));
    1
}

pub(crate) fn map_cli_game_path(error: std::io::Error) -> CliError {
    map_error("CLI_GAME_PATH", error)
}

pub(crate) fn map_cli_game_read(error: std::io::Error) -> CliError {
    map_error("CLI_GAME_READ", error)
}

pub(crate) fn map_cli_games_scan(error: walkdir::Error) -> CliError {
    map_error("CLI_GAMES_SCAN", error)
}

pub(crate) fn map_cli_defaults_read(error: std::io::Error) -> CliError {
    map_error("CLI_DEFAULTS_READ", error)
}

pub(crate) fn map_cli_config_json(error: serde_json::Error) -> CliError {
    map_error("CLI_CONFIG_JSON", error)
}

#[cfg(test)]
mod error_map_tests {
    use super::*;

    #[test]
    fn emit_error_returns_non_zero_exit_code() {
        let code = emit_error(CliError::new("ERR", "failed"));
        assert_eq!(code, 1);
    }

    #[test]
    fn game_errors_keep_their_own_codes() {
        let error = CliError::from(PmError::UnknownFunction("Hoppa".to_string()));
        assert_eq!(error.code(), "FUNCTION_UNKNOWN");
        assert!(error.to_string().contains("Hoppa"));
    }

    #[test]
    fn mapping_helpers_keep_error_codes() {
        assert_eq!(
            map_cli_game_path(std::io::Error::other("path")).code(),
            "CLI_GAME_PATH"
        );
        assert_eq!(
            map_cli_game_read(std::io::Error::other("read")).code(),
            "CLI_GAME_READ"
        );
        assert_eq!(
            map_cli_defaults_read(std::io::Error::other("read")).code(),
            "CLI_DEFAULTS_READ"
        );

        let scan_error = walkdir::WalkDir::new("/definitely/not/here")
            .into_iter()
            .find_map(Result::err)
            .expect("missing root should fail to scan");
        assert_eq!(map_cli_games_scan(scan_error).code(), "CLI_GAMES_SCAN");

        let invalid = serde_json::from_str::<serde_json::Value>("{").expect_err("invalid json");
        assert_eq!(map_cli_config_json(invalid).code(), "CLI_CONFIG_JSON");
    }
}

use std::ffi::OsString;

use clap::Parser;

mod cli_args;
mod commands;
mod error_map;
mod game_loader;
mod headless;
mod logging;

pub(crate) use cli_args::{CheckArgs, CheckDirArgs, Cli, InspectArgs, Mode, SessionArgs};
#[cfg(test)]
pub(crate) use commands::{build_session, check_session, CheckSummary};
pub(crate) use error_map::{
    emit_error, json_line, map_cli_config_json, map_cli_defaults_read, map_cli_game_path,
    map_cli_game_read, map_cli_games_scan, CliError,
};
pub(crate) use game_loader::{
    find_game_files, load_defaults, load_game_file, relative_display, resolve_game_file,
    resolve_games_dir,
};
pub(crate) use headless::{function_table_with, HeadlessHost, HeadlessUi};
pub(crate) use logging::{init_logging, LogLevel};

pub fn run_cli_from_args<I, T>(args: I) -> i32
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
{
    let cli = match Cli::try_parse_from(args) {
        Ok(cli) => cli,
        Err(error) => return error.exit_code(),
    };
    init_logging(cli.log_level);
    match run(cli) {
        Ok(code) => code,
        Err(error) => emit_error(error),
    }
}

fn run(cli: Cli) -> Result<i32, CliError> {
    match cli.command {
        Mode::Check(args) => commands::run_check(args),
        Mode::Inspect(args) => commands::run_inspect(args),
        Mode::CheckDir(args) => commands::run_check_dir(args),
    }
}

use clap::{Args, Parser, Subcommand};

use crate::LogLevel;

#[derive(Debug, Parser)]
#[command(name = "pm-cli")]
#[command(about = "Pythonmaskinen game definition checker")]
pub(crate) struct Cli {
    #[arg(long = "log-level", value_enum, global = true, default_value_t = LogLevel::Warn)]
    pub(crate) log_level: LogLevel,
    #[command(subcommand)]
    pub(crate) command: Mode,
}

#[derive(Debug, Subcommand)]
pub(crate) enum Mode {
    Check(CheckArgs),
    Inspect(InspectArgs),
    CheckDir(CheckDirArgs),
}

#[derive(Debug, Clone, Default, Args)]
pub(crate) struct SessionArgs {
    #[arg(long = "defaults")]
    pub(crate) defaults: Option<String>,
    #[arg(long = "allow-function")]
    pub(crate) allow_functions: Vec<String>,
    #[arg(long = "bound-scene")]
    pub(crate) bound_scenes: Vec<String>,
}

#[derive(Debug, Args)]
pub(crate) struct CheckArgs {
    #[arg(long = "game")]
    pub(crate) game: String,
    #[command(flatten)]
    pub(crate) session: SessionArgs,
}

#[derive(Debug, Args)]
pub(crate) struct InspectArgs {
    #[arg(long = "game")]
    pub(crate) game: String,
    #[arg(long = "level")]
    pub(crate) level: usize,
    #[arg(long = "case", conflicts_with = "sandbox")]
    pub(crate) case: Option<usize>,
    #[arg(long = "sandbox")]
    pub(crate) sandbox: bool,
    #[command(flatten)]
    pub(crate) session: SessionArgs,
}

#[derive(Debug, Args)]
pub(crate) struct CheckDirArgs {
    #[arg(long = "games-dir")]
    pub(crate) games_dir: String,
    #[command(flatten)]
    pub(crate) session: SessionArgs,
}

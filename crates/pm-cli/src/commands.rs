use std::cell::RefCell;
use std::path::Path;
use std::rc::Rc;

use pm_core::{GameDefinition, LevelMode, PmError};
use pm_runtime::IdleWalker;
use pm_session::{Session, SessionOptions};
use tracing::info;

use crate::{
    emit_error, find_game_files, function_table_with, json_line, load_defaults, load_game_file,
    map_cli_config_json, relative_display, resolve_game_file, resolve_games_dir, CheckArgs,
    CheckDirArgs, CliError, HeadlessHost, HeadlessUi, InspectArgs, SessionArgs,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub(crate) struct CheckSummary {
    pub(crate) levels: usize,
    pub(crate) configurations: usize,
}

pub(crate) fn build_session(
    definition: GameDefinition,
    args: &SessionArgs,
) -> Result<(Session, Rc<RefCell<HeadlessUi>>), CliError> {
    let defaults = load_defaults(args.defaults.as_deref())?;
    let function_table = function_table_with(&args.allow_functions)?;
    let scenes = if args.bound_scenes.is_empty() {
        definition
            .scenes
            .iter()
            .map(|scene| scene.name.clone())
            .collect()
    } else {
        args.bound_scenes.clone()
    };

    let ui = Rc::new(RefCell::new(HeadlessUi::default()));
    let session = Session::new(
        definition,
        Box::new(IdleWalker::finishing()),
        Box::new(HeadlessHost::new(scenes)),
        ui.clone(),
        SessionOptions {
            defaults,
            function_table,
        },
    );
    Ok((session, ui))
}

/// Starts every active level and visits each of its cases, running the compiler once per
/// configuration.
pub(crate) fn check_session(session: &mut Session) -> Result<CheckSummary, PmError> {
    let levels = session.definition().level_count();
    let mut configurations = 0usize;

    for index in 0..levels {
        session.start_level(index)?;
        session.start_compiler()?;
        configurations += 1;

        if session.mode() == Some(LevelMode::Sandbox) && session.case_handler().is_some() {
            session.switch_mode(LevelMode::Case)?;
            session.start_compiler()?;
            configurations += 1;
        }
        if session.mode() == Some(LevelMode::Case) {
            let cases = session.case_handler().map(|h| h.case_count()).unwrap_or(0);
            for case in 1..cases {
                session.switch_case(case)?;
                session.start_compiler()?;
                configurations += 1;
            }
        }
        info!(level = index, "level_checked");
    }

    Ok(CheckSummary {
        levels,
        configurations,
    })
}

fn check_game_file(path: &Path, args: &SessionArgs) -> Result<CheckSummary, CliError> {
    let definition = load_game_file(path)?;
    let (mut session, _ui) = build_session(definition, args)?;
    let summary = check_session(&mut session)?;
    info!(game = %path.display(), levels = summary.levels, "game_checked");
    Ok(summary)
}

pub(crate) fn run_check(args: CheckArgs) -> Result<i32, CliError> {
    let path = resolve_game_file(&args.game)?;
    let summary = check_game_file(&path, &args.session)?;
    println!("RESULT:OK");
    println!("LEVELS:{}", summary.levels);
    println!("CONFIGURATIONS:{}", summary.configurations);
    Ok(0)
}

pub(crate) fn run_inspect(args: InspectArgs) -> Result<i32, CliError> {
    let path = resolve_game_file(&args.game)?;
    let definition = load_game_file(&path)?;
    let (mut session, _ui) = build_session(definition, &args.session)?;

    session.start_level(args.level)?;
    if args.sandbox {
        session.switch_mode(LevelMode::Sandbox)?;
    }
    if let Some(case) = args.case {
        session.switch_mode(LevelMode::Case)?;
        session.switch_case(case)?;
    }

    let config = session
        .config()
        .ok_or_else(|| CliError::new("CLI_CONFIG_MISSING", "no configuration was applied"))?;
    let config_json = serde_json::to_string(config).map_err(map_cli_config_json)?;
    let functions = session.compiler().functions();

    println!("RESULT:OK");
    println!("LEVEL:{}", args.level);
    println!("CONFIG_JSON:{}", config_json);
    println!("FUNCTIONS_JSON:{}", json_line(&functions.names()));
    Ok(0)
}

pub(crate) fn run_check_dir(args: CheckDirArgs) -> Result<i32, CliError> {
    let root = resolve_games_dir(&args.games_dir)?;
    let games = find_game_files(&root)?;

    let mut lines = Vec::with_capacity(games.len());
    let mut failed = 0usize;
    for path in &games {
        let name = relative_display(&root, path);
        match check_game_file(path, &args.session) {
            Ok(summary) => lines.push(format!("GAME:{}|OK|{}", name, summary.levels)),
            Err(error) => {
                failed += 1;
                lines.push(format!("GAME:{}|ERROR|{}", name, error.code()));
            }
        }
    }

    let exit_code = if failed == 0 {
        println!("RESULT:OK");
        0
    } else {
        emit_error(CliError::new(
            "CLI_CHECK_FAILED",
            format!("{} of {} games failed the check", failed, games.len()),
        ))
    };
    for line in lines {
        println!("{}", line);
    }
    Ok(exit_code)
}

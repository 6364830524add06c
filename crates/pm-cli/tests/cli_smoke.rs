use std::process::{Command, Output};

use pm_test_example::{game_path, games_root};

fn run(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_pm-cli"))
        .args(args)
        .output()
        .expect("cli should execute")
}

fn stdout_lines(output: &Output) -> Vec<String> {
    String::from_utf8_lossy(&output.stdout)
        .lines()
        .map(str::to_string)
        .collect()
}

#[test]
fn check_dir_passes_every_demo_game() {
    let games = games_root();
    let output = run(&["check-dir", "--games-dir", games.to_str().unwrap_or_default()]);
    let lines = stdout_lines(&output);

    assert!(
        output.status.success(),
        "check-dir failed\nstdout:\n{}\nstderr:\n{}",
        String::from_utf8_lossy(&output.stdout),
        String::from_utf8_lossy(&output.stderr)
    );
    assert_eq!(lines.first().map(String::as_str), Some("RESULT:OK"));
    assert!(lines.contains(&"GAME:intro.game.json|OK|1".to_string()));
    assert!(lines.contains(&"GAME:kassan.game.json|OK|3".to_string()));
}

#[test]
fn inspect_prints_the_effective_configuration() {
    let game = game_path("kassan");
    let output = run(&[
        "inspect",
        "--game",
        game.to_str().unwrap_or_default(),
        "--level",
        "1",
        "--case",
        "1",
    ]);
    let lines = stdout_lines(&output);
    assert_eq!(lines[0], "RESULT:OK");

    let config_line = lines
        .iter()
        .find_map(|line| line.strip_prefix("CONFIG_JSON:"))
        .expect("config line");
    let config: serde_json::Value = serde_json::from_str(config_line).expect("config json");
    assert_eq!(config["precode"], "betalat = 100");
    assert_eq!(config["walkerStepTime"], 0.3);
    assert_eq!(config["theme"], "light");
    assert_eq!(config["caseIndex"], 1);
    assert_eq!(config["mode"], "case");

    let functions_line = lines
        .iter()
        .find_map(|line| line.strip_prefix("FUNCTIONS_JSON:"))
        .expect("functions line");
    let functions: Vec<String> = serde_json::from_str(functions_line).expect("functions json");
    assert_eq!(functions.len(), 13);
    assert_eq!(functions[0], "abs");
}

#[test]
fn inspect_sandbox_of_a_level_without_one_is_an_error() {
    let game = game_path("intro");
    let output = run(&[
        "inspect",
        "--game",
        game.to_str().unwrap_or_default(),
        "--level",
        "0",
        "--sandbox",
    ]);
    assert_eq!(output.status.code(), Some(1));
    let lines = stdout_lines(&output);
    assert_eq!(lines[0], "RESULT:ERROR");
    assert_eq!(lines[1], "ERROR_CODE:SESSION_PRECONDITION");
}

#[test]
fn missing_game_file_reports_error_code() {
    let output = run(&["check", "--game", "/definitely/not/a.game.json"]);
    assert_eq!(output.status.code(), Some(1));
    assert!(stdout_lines(&output).contains(&"ERROR_CODE:CLI_GAME_NOT_FOUND".to_string()));
}

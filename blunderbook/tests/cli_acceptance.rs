use blunderbook_core::{Database, GameStore};
use std::ffi::OsString;
use std::fs;
use std::path::PathBuf;
use std::process::{Command, Output};
use tempfile::TempDir;

struct CliTestEnv {
    _temp_dir: TempDir,
    home: PathBuf,
    xdg_data: PathBuf,
    xdg_config: PathBuf,
    xdg_state: PathBuf,
}

impl CliTestEnv {
    fn new() -> Self {
        let temp_dir = TempDir::new().expect("failed to create temp dir");
        let base = temp_dir.path().to_path_buf();
        let home = base.join("home");
        let xdg_data = base.join("xdg-data");
        let xdg_config = base.join("xdg-config");
        let xdg_state = base.join("xdg-state");

        fs::create_dir_all(&home).expect("failed to create HOME");
        fs::create_dir_all(&xdg_data).expect("failed to create XDG_DATA_HOME");
        fs::create_dir_all(&xdg_config).expect("failed to create XDG_CONFIG_HOME");
        fs::create_dir_all(&xdg_state).expect("failed to create XDG_STATE_HOME");

        Self {
            _temp_dir: temp_dir,
            home,
            xdg_data,
            xdg_config,
            xdg_state,
        }
    }

    fn db_path(&self) -> PathBuf {
        self.xdg_data.join("blunderbook/data.db")
    }

    fn write_config(&self, content: &str) {
        let dir = self.xdg_config.join("blunderbook");
        fs::create_dir_all(&dir).expect("failed to create config dir");
        fs::write(dir.join("config.toml"), content).expect("failed to write config");
    }
}

fn run(env: &CliTestEnv, args: &[&str]) -> Output {
    let bin_path = PathBuf::from(assert_cmd::cargo::cargo_bin!("blunderbook"));

    Command::new(bin_path)
        .args(args)
        .env("HOME", &env.home)
        .env("XDG_DATA_HOME", &env.xdg_data)
        .env("XDG_CONFIG_HOME", &env.xdg_config)
        .env("XDG_STATE_HOME", &env.xdg_state)
        .env_remove("RUST_LOG")
        .output()
        .unwrap_or_else(|e| panic!("failed to execute blunderbook: {e}"))
}

fn assert_success(args: &[&str], output: &Output) {
    if output.status.success() {
        return;
    }

    let rendered_args = args
        .iter()
        .map(|arg| OsString::from(arg).to_string_lossy().into_owned())
        .collect::<Vec<_>>()
        .join(" ");
    let stdout = String::from_utf8_lossy(&output.stdout);
    let stderr = String::from_utf8_lossy(&output.stderr);
    panic!(
        "blunderbook {rendered_args} failed\nstatus: {}\nstdout:\n{}\nstderr:\n{}",
        output.status, stdout, stderr
    );
}

fn run_ok(env: &CliTestEnv, args: &[&str]) -> String {
    let output = run(env, args);
    assert_success(args, &output);
    String::from_utf8_lossy(&output.stdout).into_owned()
}

/// Adds a game and returns its id as printed by the CLI
fn add_game(env: &CliTestEnv, date: &str, result: &str, opening: &str) -> String {
    let stdout = run_ok(
        env,
        &[
            "add-game",
            "--date",
            date,
            "--color",
            "white",
            "--rating",
            "1600",
            "--result",
            result,
            "--opening",
            opening,
            "--time-control",
            "blitz",
        ],
    );
    stdout
        .trim()
        .strip_prefix("Added game ")
        .unwrap_or_else(|| panic!("unexpected add-game output: {stdout}"))
        .to_string()
}

#[test]
fn insights_on_empty_store_prints_single_hint() {
    let env = CliTestEnv::new();

    let stdout = run_ok(&env, &["insights"]);
    assert!(
        stdout.contains("No games logged yet. Add your first game to start seeing insights."),
        "got:\n{stdout}"
    );
    assert!(env.db_path().exists(), "database should be created on first run");
}

#[test]
fn add_game_and_mistakes_then_export_insights_json() {
    let env = CliTestEnv::new();

    let first = add_game(&env, "2024-05-01", "loss", "Sicilian");
    let second = add_game(&env, "2024-05-02", "win", "");

    run_ok(
        &env,
        &[
            "add-mistake",
            &first,
            "--tactic",
            "fork",
            "--phase",
            "middlegame",
            "--time-pressure",
        ],
    );
    run_ok(
        &env,
        &[
            "add-mistake",
            &first[..8],
            "--positional",
            "weak-squares",
            "--phase",
            "middlegame",
        ],
    );
    run_ok(
        &env,
        &[
            "add-mistake",
            &second,
            "--tactic",
            "fork",
            "--phase",
            "endgame",
            "--note",
            "missed Nc7+",
        ],
    );

    let stdout = run_ok(&env, &["insights", "--export", "json"]);
    let report: serde_json::Value = serde_json::from_str(&stdout).expect("invalid JSON report");

    assert_eq!(report["total_games"], 2);
    assert_eq!(report["total_mistakes"], 3);
    assert_eq!(report["top_categories"][0]["category"], "fork");
    assert_eq!(report["top_categories"][0]["count"], 2);
    assert_eq!(report["phases"]["middlegame"], 2);

    let insights = report["insights"].as_array().expect("insights array");
    assert_eq!(insights.len(), 8);
    let first_line = insights[0].as_str().unwrap();
    assert!(first_line.starts_with("You've logged 2 games"), "got {first_line}");
    assert!(insights
        .iter()
        .any(|s| s.as_str().unwrap().contains("Practice knight coordination")));

    let openings = report["openings"].as_array().expect("openings array");
    assert!(openings.iter().any(|row| row["opening"] == "Unknown"));
}

#[test]
fn stats_markdown_lists_openings() {
    let env = CliTestEnv::new();
    add_game(&env, "2024-05-01", "loss", "French");
    add_game(&env, "2024-05-02", "draw", "French");

    let stdout = run_ok(&env, &["stats", "--export", "md"]);
    assert!(stdout.starts_with("# Chess Mistake Statistics"));
    assert!(stdout.contains("| French | 0% | 2 |"), "got:\n{stdout}");
}

#[test]
fn unknown_export_format_fails() {
    let env = CliTestEnv::new();
    let output = run(&env, &["stats", "--export", "csv"]);
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Unknown export format"), "got:\n{stderr}");
}

#[test]
fn add_mistake_requires_exactly_one_category() {
    let env = CliTestEnv::new();
    let id = add_game(&env, "2024-05-01", "loss", "Dutch");

    let neither = run(&env, &["add-mistake", &id, "--phase", "opening"]);
    assert!(!neither.status.success());

    let both = run(
        &env,
        &[
            "add-mistake",
            &id,
            "--tactic",
            "pin",
            "--positional",
            "bad_bishop",
            "--phase",
            "opening",
        ],
    );
    assert!(!both.status.success());
}

#[test]
fn edit_and_delete_persist_to_store() {
    let env = CliTestEnv::new();
    let keep = add_game(&env, "2024-05-01", "loss", "London");
    let drop = add_game(&env, "2024-05-02", "loss", "Scandinavian");

    run_ok(&env, &["edit-game", &keep, "--result", "win", "--opening", "London System"]);
    let stdout = run_ok(&env, &["delete-game", &drop]);
    assert!(stdout.contains("0 mistakes removed"), "got:\n{stdout}");

    let db = Database::open(&env.db_path()).expect("failed to open db");
    db.migrate().expect("failed to migrate db");
    let games = db.load().expect("failed to load games");
    assert_eq!(games.len(), 1);
    assert_eq!(games[0].id, keep);
    assert_eq!(games[0].opening, "London System");
    assert!(games[0].is_win());
}

#[test]
fn unknown_game_id_is_reported() {
    let env = CliTestEnv::new();
    let output = run(&env, &["delete-game", "does-not-exist"]);
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("does-not-exist"), "got:\n{stderr}");
}

#[test]
fn insights_respect_disabled_cache() {
    let env = CliTestEnv::new();
    env.write_config("[store]\ncache_insights = false\n");
    add_game(&env, "2024-05-01", "win", "Italian");

    let cached = run_ok(&env, &["insights"]);
    let fresh = run_ok(&env, &["insights", "--no-cache"]);
    assert_eq!(cached, fresh);
    assert!(cached.contains("100.0% win rate"), "got:\n{cached}");
}

//! blunderbook - chess mistake journal CLI
//!
//! Log games and the mistakes you made in them, then get statistics and
//! improvement recommendations.
//!
//! Uses XDG Base Directory specification for file locations:
//! - Database: $XDG_DATA_HOME/blunderbook/data.db (~/.local/share/blunderbook/data.db)
//! - Config: $XDG_CONFIG_HOME/blunderbook/config.toml (~/.config/blunderbook/config.toml)

use anyhow::{Context, Result};
use blunderbook_core::analytics::{InsightReport, Trend, TREND_WINDOW};
use blunderbook_core::collection::{
    add_game, add_mistake, delete_game, edit_game, find_game, GameEdit, NewGame, NewMistake,
};
use blunderbook_core::format::{format_delta, plural, round2};
use blunderbook_core::types::{
    Color, Game, GamePhase, GameResult, MistakeKind, PositionalType, TacticType, TimeControl,
};
use blunderbook_core::{Config, Database, GameStore};
use chrono::{Local, NaiveDate};
use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "blunderbook")]
#[command(about = "Chess mistake journal - log games, learn from mistakes")]
#[command(version)]
struct Args {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Log a new game
    AddGame {
        /// Date played (YYYY-MM-DD, default: today)
        #[arg(long)]
        date: Option<NaiveDate>,

        /// Your color (white/black)
        #[arg(long)]
        color: Color,

        /// Opponent rating
        #[arg(long)]
        rating: i32,

        /// Result from your side (win/loss/draw)
        #[arg(long)]
        result: GameResult,

        /// Opening name
        #[arg(long, default_value = "")]
        opening: String,

        /// Time control (blitz/rapid/classical)
        #[arg(long = "time-control")]
        time_control: TimeControl,

        /// Link to the game
        #[arg(long)]
        link: Option<String>,

        /// PGN text
        #[arg(long)]
        pgn: Option<String>,
    },

    /// Change fields of a logged game (id or unique id prefix)
    EditGame {
        id: String,

        #[arg(long)]
        date: Option<NaiveDate>,

        #[arg(long)]
        color: Option<Color>,

        #[arg(long)]
        rating: Option<i32>,

        #[arg(long)]
        result: Option<GameResult>,

        #[arg(long)]
        opening: Option<String>,

        #[arg(long = "time-control")]
        time_control: Option<TimeControl>,

        #[arg(long)]
        link: Option<String>,

        #[arg(long)]
        pgn: Option<String>,
    },

    /// Delete a game and all of its mistakes
    DeleteGame { id: String },

    /// Log a mistake against a game
    AddMistake {
        /// Game id or unique id prefix
        game: String,

        /// Tactical category (e.g. fork, back_rank)
        #[arg(long, conflicts_with = "positional", required_unless_present = "positional")]
        tactic: Option<TacticType>,

        /// Positional category (e.g. weak_squares, bad_bishop)
        #[arg(long)]
        positional: Option<PositionalType>,

        /// Phase of the game (opening/middlegame/endgame)
        #[arg(long)]
        phase: GamePhase,

        /// The mistake was made short on time
        #[arg(long)]
        time_pressure: bool,

        /// Free-form note
        #[arg(long)]
        note: Option<String>,
    },

    /// List logged games, oldest first
    List,

    /// List the mistake categories that can be logged
    Categories,

    /// Show aggregate statistics
    Stats {
        /// Export format (md = markdown, json = JSON)
        #[arg(long)]
        export: Option<String>,
    },

    /// Show improvement insights
    Insights {
        /// Export format (md = markdown, json = JSON)
        #[arg(long)]
        export: Option<String>,

        /// Recompute even if insights for this exact collection are cached
        #[arg(long)]
        no_cache: bool,
    },
}

fn main() -> Result<()> {
    let args = Args::parse();

    let config = Config::load().context("failed to load configuration")?;
    let _log_guard = blunderbook_core::logging::init(&config.logging)
        .context("failed to initialize logging")?;

    let db_path = config.resolved_database_path();
    tracing::info!(path = %db_path.display(), "Opening database");
    let db = Database::open(&db_path).context("failed to open database")?;
    db.migrate().context("failed to run database migrations")?;

    let mut games = db.load().context("failed to load games")?;

    match args.command {
        Command::AddGame {
            date,
            color,
            rating,
            result,
            opening,
            time_control,
            link,
            pgn,
        } => {
            let game = add_game(
                &mut games,
                NewGame {
                    date: date.unwrap_or_else(|| Local::now().date_naive()),
                    color,
                    opponent_rating: rating,
                    result,
                    opening,
                    time_control,
                    game_link: link,
                    pgn,
                },
            );
            db.save(&games).context("failed to save games")?;
            println!("Added game {}", game.id);
        }
        Command::EditGame {
            id,
            date,
            color,
            rating,
            result,
            opening,
            time_control,
            link,
            pgn,
        } => {
            let id = find_game(&games, &id)?.id.clone();
            edit_game(
                &mut games,
                &id,
                GameEdit {
                    date,
                    color,
                    opponent_rating: rating,
                    result,
                    opening,
                    time_control,
                    game_link: link,
                    pgn,
                },
            )?;
            db.save(&games).context("failed to save games")?;
            println!("Updated game {}", id);
        }
        Command::DeleteGame { id } => {
            let id = find_game(&games, &id)?.id.clone();
            let removed = delete_game(&mut games, &id)?;
            db.save(&games).context("failed to save games")?;
            println!(
                "Deleted game {} ({} removed)",
                removed.id,
                plural(removed.mistakes.len(), "mistake")
            );
        }
        Command::AddMistake {
            game,
            tactic,
            positional,
            phase,
            time_pressure,
            note,
        } => {
            let kind = match (tactic, positional) {
                (Some(t), None) => MistakeKind::Tactical(t),
                (None, Some(p)) => MistakeKind::Positional(p),
                _ => anyhow::bail!("Give exactly one of --tactic or --positional"),
            };
            let game_id = find_game(&games, &game)?.id.clone();
            let mistake = add_mistake(
                &mut games,
                &game_id,
                NewMistake {
                    kind,
                    game_phase: phase,
                    time_pressure,
                    note,
                },
            )?;
            db.save(&games).context("failed to save games")?;
            println!("Added {} mistake {} to game {}", kind.label(), mistake.id, game_id);
        }
        Command::List => print_games(&games),
        Command::Categories => print_categories(),
        Command::Stats { export } => {
            let report = InsightReport::build(&games);
            match export.as_deref() {
                Some("json") => print_json(&report)?,
                Some("md") => print_stats_markdown(&report),
                Some(other) => anyhow::bail!("Unknown export format: {}. Use 'md' or 'json'", other),
                None => print_stats_terminal(&report),
            }
        }
        Command::Insights { export, no_cache } => {
            let insights = if config.store.cache_insights && !no_cache {
                db.insights_for(&games)
                    .context("failed to compute insights")?
            } else {
                blunderbook_core::analytics::generate_insights(&games)
            };
            match export.as_deref() {
                Some("json") => print_json(&InsightReport::with_insights(&games, insights))?,
                Some("md") => {
                    println!("# Insights");
                    println!();
                    for line in &insights {
                        println!("- {}", line);
                    }
                }
                Some(other) => anyhow::bail!("Unknown export format: {}. Use 'md' or 'json'", other),
                None => {
                    for (i, line) in insights.iter().enumerate() {
                        println!("{:>2}. {}", i + 1, line);
                    }
                }
            }
        }
    }

    Ok(())
}

fn print_games(games: &[Game]) {
    if games.is_empty() {
        println!("No games logged yet.");
        return;
    }

    let mut sorted: Vec<&Game> = games.iter().collect();
    sorted.sort_by_key(|g| g.date);

    println!(
        "{:<8}  {:<10}  {:<5}  {:>6}  {:<6}  {:<9}  {:>8}  OPENING",
        "ID", "DATE", "COLOR", "OPP", "RESULT", "TIME", "MISTAKES"
    );
    for game in sorted {
        let short_id: String = game.id.chars().take(8).collect();
        let opening = blunderbook_core::analytics::aggregate::opening_label(&game.opening);
        println!(
            "{:<8}  {:<10}  {:<5}  {:>6}  {:<6}  {:<9}  {:>8}  {}",
            short_id,
            game.date,
            game.color,
            game.opponent_rating,
            game.result,
            game.time_control,
            game.mistake_count(),
            opening
        );
    }
}

fn print_categories() {
    println!("TACTICAL");
    for tactic in TacticType::ALL {
        println!("   {}", tactic.as_str());
    }
    println!();
    println!("POSITIONAL");
    for positional in PositionalType::ALL {
        println!("   {}", positional.as_str());
    }
}

fn print_stats_terminal(report: &InsightReport) {
    println!();
    println!("SUMMARY");
    if report.total_games == 0 {
        println!("   No games logged yet.");
        println!();
        return;
    }
    println!(
        "   Games:    {:<12} Win rate: {:.1}%",
        report.total_games, report.win_rate
    );
    println!(
        "   Mistakes: {:<12} Per game: {:.2}",
        report.total_mistakes,
        round2(report.avg_mistakes_per_game)
    );
    println!(
        "   Under time pressure: {}",
        plural(report.time_pressure_mistakes, "mistake")
    );
    println!();

    if !report.top_categories.is_empty() {
        println!("TOP MISTAKES");
        for (i, entry) in report.top_categories.iter().enumerate() {
            println!("   {}. {:<24} {:>4}", i + 1, entry.label, entry.count);
        }
        println!();
    }

    println!("BY PHASE");
    println!("   Opening:    {}", report.phases.opening);
    println!("   Middlegame: {}", report.phases.middlegame);
    println!("   Endgame:    {}", report.phases.endgame);
    println!();

    println!("OPENINGS");
    for row in &report.openings {
        println!(
            "   {:<28} {:>3}%  ({})",
            row.opening,
            row.win_rate_percent,
            plural(row.game_count, "game")
        );
    }
    println!();

    println!("RECENT FORM");
    println!("   {}", trend_line(report.trend.as_ref()));
    println!();
}

fn print_stats_markdown(report: &InsightReport) {
    println!("# Chess Mistake Statistics");
    println!();

    if report.total_games == 0 {
        println!("*No games logged yet.*");
        return;
    }

    println!("## Summary");
    println!();
    println!("| Metric | Value |");
    println!("|--------|-------|");
    println!("| Games | {} |", report.total_games);
    println!("| Win rate | {:.1}% |", report.win_rate);
    println!("| Mistakes | {} |", report.total_mistakes);
    println!(
        "| Mistakes per game | {:.2} |",
        round2(report.avg_mistakes_per_game)
    );
    println!(
        "| Under time pressure | {} |",
        report.time_pressure_mistakes
    );
    println!();

    if !report.top_categories.is_empty() {
        println!("## Top Mistakes");
        println!();
        for (i, entry) in report.top_categories.iter().enumerate() {
            println!("{}. **{}** - {}", i + 1, entry.label, plural(entry.count, "time"));
        }
        println!();
    }

    println!("## Openings");
    println!();
    println!("| Opening | Win rate | Games |");
    println!("|---------|----------|-------|");
    for row in &report.openings {
        println!(
            "| {} | {}% | {} |",
            row.opening, row.win_rate_percent, row.game_count
        );
    }
    println!();

    println!("## Recent Form");
    println!();
    println!("{}", trend_line(report.trend.as_ref()));
    println!();

    println!("---");
    println!("*Generated by blunderbook*");
}

fn trend_line(trend: Option<&Trend>) -> String {
    match trend {
        None => "No games yet".to_string(),
        Some(Trend::Insufficient { last_avg }) => format!(
            "{:.2} mistakes/game (need {} earlier games to compare)",
            round2(*last_avg),
            TREND_WINDOW
        ),
        Some(Trend::Change {
            last_avg,
            prev_avg,
            change_percent,
        }) => format!(
            "{:.2} mistakes/game vs {:.2} in the {} games before ({})",
            round2(*last_avg),
            round2(*prev_avg),
            TREND_WINDOW,
            format_delta(*change_percent)
        ),
    }
}

fn print_json(report: &InsightReport) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(report)?);
    Ok(())
}

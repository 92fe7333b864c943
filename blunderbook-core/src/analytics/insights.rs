//! Insight generation
//!
//! Turns a game collection into an ordered list of plain-language statements:
//! a summary, the weakest categories with a drill for each, time pressure,
//! the worst phase, the opening to watch, recent form and a closing tip.
//!
//! Everything is re-derived from the snapshot on every call; the output is a
//! pure function of the input.

use serde::Serialize;

use super::aggregate::{opening_table, tactic_ranking, win_rate, OpeningRow};
use super::breakdown::{MistakeBreakdown, PhaseCounts};
use super::trend::{detect_trend, Trend, TREND_WINDOW};
use crate::format::{humanize_key, percent, plural, round2};
use crate::types::{Game, GamePhase, MistakeKind, PositionalType, TacticType};

/// Share of mistakes under time pressure above which the stronger advice is given.
pub const TIME_PRESSURE_THRESHOLD: f64 = 0.25;

/// Games an opening needs before it can be called out as the one to watch.
pub const MIN_OPENING_GAMES: usize = 2;

pub const NO_GAMES_INSIGHT: &str =
    "No games logged yet. Add your first game to start seeing insights.";

pub const CLOSING_INSIGHT: &str = "Keep reviewing each game soon after you play it, \
     and solve a few tactics puzzles every day.";

/// Training suggestion for a tactical weakness.
pub fn drill_suggestion(tactic: TacticType) -> &'static str {
    match tactic {
        TacticType::Fork => "Practice fork puzzles and knight coordination drills.",
        TacticType::Pin => "Solve pin and skewer puzzles to spot lines through pieces.",
        TacticType::BackRank => {
            "Drill back-rank mating patterns and make luft for your king in time."
        }
        TacticType::Zwischenzug => {
            "Train zwischenzug recognition: look for an in-between move before recapturing."
        }
        TacticType::Xray => "Study x-ray attacks and battery tactics on files and diagonals.",
        TacticType::Skewer
        | TacticType::DiscoveredAttack
        | TacticType::DoubleCheck
        | TacticType::HangingPiece
        | TacticType::Overloading
        | TacticType::Deflection
        | TacticType::Decoy
        | TacticType::Interference
        | TacticType::RemovingTheDefender
        | TacticType::TrappedPiece
        | TacticType::MissedMate
        | TacticType::Clearance
        | TacticType::Desperado => "Mix in themed puzzle sets that cover a variety of motifs.",
    }
}

/// What to work on when most mistakes fall in `phase`.
pub fn phase_focus(phase: GamePhase) -> &'static str {
    match phase {
        GamePhase::Opening => {
            "Drill your opening repertoire and review the first moves of your games."
        }
        GamePhase::Middlegame => {
            "Work on planning and calculation in complex middlegame positions."
        }
        GamePhase::Endgame => "Sharpen your endgame technique with practical endgame studies.",
        GamePhase::Unrecognized => "Review the critical moments of your games.",
    }
}

/// Generate the ordered insight statements for a game collection.
///
/// An empty collection yields exactly one "no games" statement. Otherwise
/// the summary comes first and the closing recommendation last.
pub fn generate_insights(games: &[Game]) -> Vec<String> {
    if games.is_empty() {
        return vec![NO_GAMES_INSIGHT.to_string()];
    }

    let breakdown = MistakeBreakdown::tally(games);
    let openings = opening_table(games);
    let trend = detect_trend(games, TREND_WINDOW);

    tracing::trace!(
        games = games.len(),
        mistakes = breakdown.total,
        "Generating insights"
    );

    let mut insights = Vec::new();

    insights.push(format!(
        "You've logged {} with {} and a {:.1}% win rate.",
        plural(games.len(), "game"),
        plural(breakdown.total, "mistake"),
        win_rate(games)
    ));

    insights.push(format!(
        "You average {:.2} mistakes per game.",
        round2(average_mistakes(games, &breakdown))
    ));

    if let Some((tactic, count)) = breakdown.tactical.top() {
        insights.push(format!(
            "Your most common tactical mistake is {} ({}). {}",
            humanize_key(tactic.as_str()),
            plural(count, "time"),
            drill_suggestion(tactic)
        ));
    }

    if let Some((positional, count)) = breakdown.positional.top() {
        insights.push(positional_insight(positional, count));
    }

    if breakdown.total > 0 {
        insights.push(time_pressure_insight(&breakdown));
    }

    if let Some(insight) = phase_insight(&breakdown.phases) {
        insights.push(insight);
    }

    if let Some(row) = opening_to_watch(&openings) {
        insights.push(format!(
            "Opening to watch: {} ({}% win rate over {}). Review its main lines and the common traps.",
            row.opening,
            row.win_rate_percent,
            plural(row.game_count, "game")
        ));
    }

    if let Some(trend) = trend {
        insights.push(trend_insight(&trend, TREND_WINDOW));
    }

    insights.push(CLOSING_INSIGHT.to_string());
    insights
}

fn average_mistakes(games: &[Game], breakdown: &MistakeBreakdown) -> f64 {
    if games.is_empty() {
        0.0
    } else {
        breakdown.total as f64 / games.len() as f64
    }
}

fn positional_insight(positional: PositionalType, count: usize) -> String {
    format!(
        "Your most common positional mistake is {} ({}). Study typical plans and positional motifs so you recognize these positions earlier.",
        humanize_key(positional.as_str()),
        plural(count, "time")
    )
}

fn time_pressure_insight(breakdown: &MistakeBreakdown) -> String {
    let fraction = breakdown.time_pressure_fraction();
    let shown = percent(fraction * 100.0);
    if fraction > TIME_PRESSURE_THRESHOLD {
        format!(
            "{}% of your mistakes happen under time pressure. Practice faster tactics with timed puzzle sprints and budget your clock for the critical moments.",
            shown
        )
    } else {
        format!("{}% of your mistakes happen under time pressure.", shown)
    }
}

fn phase_insight(phases: &PhaseCounts) -> Option<String> {
    let (phase, count) = phases.worst()?;
    Some(format!(
        "Most of your mistakes happen in the {} ({}). {}",
        phase,
        plural(count, "mistake"),
        phase_focus(phase)
    ))
}

/// Lowest win-rate opening among those played at least [`MIN_OPENING_GAMES`]
/// times. Ties go to the row that comes first in the table.
pub fn opening_to_watch(openings: &[OpeningRow]) -> Option<&OpeningRow> {
    openings
        .iter()
        .filter(|row| row.game_count >= MIN_OPENING_GAMES)
        .fold(None, |worst: Option<&OpeningRow>, row| match worst {
            Some(w) if w.win_rate_percent <= row.win_rate_percent => Some(w),
            _ => Some(row),
        })
}

fn trend_insight(trend: &Trend, window: usize) -> String {
    match trend {
        Trend::Insufficient { .. } => format!(
            "Play {} more games to unlock trend analysis of your mistakes.",
            window
        ),
        Trend::Change {
            last_avg,
            change_percent,
            ..
        } => {
            let direction = if *change_percent > 0.0 {
                "increased"
            } else if *change_percent < 0.0 {
                "decreased"
            } else {
                return format!(
                    "Your mistakes per game have stayed the same over your last {} games (recent average: {:.2}).",
                    window,
                    round2(*last_avg)
                );
            };
            format!(
                "Your mistakes per game have {} by {}% over your last {} games (recent average: {:.2}).",
                direction,
                percent(change_percent.abs()),
                window,
                round2(*last_avg)
            )
        }
    }
}

/// A ranked mistake category, ready for export.
#[derive(Debug, Clone, Serialize)]
pub struct RankedCategory {
    pub category: MistakeKind,
    pub label: String,
    pub count: usize,
}

/// Everything the engine computes for a snapshot, in one serializable value.
#[derive(Debug, Clone, Serialize)]
pub struct InsightReport {
    pub total_games: usize,
    pub total_mistakes: usize,
    pub win_rate: f64,
    pub avg_mistakes_per_game: f64,
    pub top_categories: Vec<RankedCategory>,
    pub openings: Vec<OpeningRow>,
    pub phases: PhaseCounts,
    pub time_pressure_mistakes: usize,
    pub trend: Option<Trend>,
    pub insights: Vec<String>,
}

impl InsightReport {
    pub fn build(games: &[Game]) -> Self {
        let insights = generate_insights(games);
        Self::with_insights(games, insights)
    }

    /// Build the report around statements that were already generated
    /// (e.g. read back from the insight cache).
    pub fn with_insights(games: &[Game], insights: Vec<String>) -> Self {
        let breakdown = MistakeBreakdown::tally(games);
        let top_categories = tactic_ranking(games)
            .into_iter()
            .map(|(category, count)| RankedCategory {
                category,
                label: category.label(),
                count,
            })
            .collect();

        Self {
            total_games: games.len(),
            total_mistakes: breakdown.total,
            win_rate: win_rate(games),
            avg_mistakes_per_game: average_mistakes(games, &breakdown),
            top_categories,
            openings: opening_table(games),
            phases: breakdown.phases,
            time_pressure_mistakes: breakdown.time_pressure,
            trend: detect_trend(games, TREND_WINDOW),
            insights,
        }
    }
}

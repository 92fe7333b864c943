//! Analytics module for blunderbook
//!
//! The insight engine: pure functions from a game collection to statistics
//! and recommendations.
//!
//! - [`aggregate`]: win rate, category ranking, per-opening table
//! - [`breakdown`]: single-pass mistake tally by category, phase and clock
//! - [`trend`]: trailing-window comparison of mistakes per game
//! - [`insights`]: the statement pipeline and the exportable report
//! - [`cache`]: content-hash keys for storing generated insights
//!
//! None of these hold state or touch storage; the caller hands in a snapshot.

pub mod aggregate;
pub mod breakdown;
pub mod cache;
pub mod insights;
pub mod trend;

#[cfg(test)]
pub(crate) mod testing;

pub use aggregate::{opening_table, tactic_ranking, win_rate, OpeningRow, Tally};
pub use breakdown::{MistakeBreakdown, PhaseCounts};
pub use cache::SnapshotKey;
pub use insights::{
    drill_suggestion, generate_insights, InsightReport, RankedCategory, MIN_OPENING_GAMES,
    TIME_PRESSURE_THRESHOLD,
};
pub use trend::{detect_trend, Trend, TREND_WINDOW};

#[cfg(test)]
mod proptests {
    use super::*;
    use crate::analytics::testing::{date, in_phase, mistake, under_time_pressure};
    use crate::types::{
        Color, Game, GamePhase, GameResult, MistakeKind, PositionalType, TacticType,
        TimeControl,
    };
    use proptest::prelude::*;

    fn arb_kind() -> impl Strategy<Value = MistakeKind> {
        prop_oneof![
            (0..TacticType::ALL.len()).prop_map(|i| MistakeKind::Tactical(TacticType::ALL[i])),
            (0..PositionalType::ALL.len())
                .prop_map(|i| MistakeKind::Positional(PositionalType::ALL[i])),
        ]
    }

    fn arb_game() -> impl Strategy<Value = Game> {
        (
            0i64..60,
            prop_oneof![
                Just(GameResult::Win),
                Just(GameResult::Loss),
                Just(GameResult::Draw)
            ],
            prop_oneof![Just(""), Just("London"), Just("Sicilian"), Just("French")],
            prop::collection::vec((arb_kind(), 0usize..4, any::<bool>()), 0..6),
        )
            .prop_map(|(day, result, opening, mistakes)| Game {
                id: uuid::Uuid::new_v4().to_string(),
                date: date("2024-01-01") + chrono::Duration::days(day),
                color: Color::Black,
                opponent_rating: 1600,
                result,
                opening: opening.to_string(),
                time_control: TimeControl::Blitz,
                game_link: None,
                pgn: None,
                mistakes: mistakes
                    .into_iter()
                    .map(|(kind, phase, pressured)| {
                        let phase = [
                            GamePhase::Opening,
                            GamePhase::Middlegame,
                            GamePhase::Endgame,
                            GamePhase::Unrecognized,
                        ][phase];
                        let m = in_phase(mistake(kind), phase);
                        if pressured {
                            under_time_pressure(m)
                        } else {
                            m
                        }
                    })
                    .collect(),
            })
    }

    proptest! {
        /// Ranking never exceeds five entries and never increases
        #[test]
        fn prop_ranking_is_short_and_sorted(games in prop::collection::vec(arb_game(), 0..30)) {
            let ranking = tactic_ranking(&games);
            prop_assert!(ranking.len() <= 5);
            for pair in ranking.windows(2) {
                prop_assert!(pair[0].1 >= pair[1].1);
            }
        }

        /// Opening table covers every game exactly once
        #[test]
        fn prop_opening_counts_sum_to_games(games in prop::collection::vec(arb_game(), 0..30)) {
            let table = opening_table(&games);
            let total: usize = table.iter().map(|r| r.game_count).sum();
            prop_assert_eq!(total, games.len());
            for row in &table {
                prop_assert!(row.win_rate_percent <= 100);
            }
        }

        /// Win rate stays within 0-100
        #[test]
        fn prop_win_rate_in_range(games in prop::collection::vec(arb_game(), 0..30)) {
            let rate = win_rate(&games);
            prop_assert!((0.0..=100.0).contains(&rate));
        }

        /// Same snapshot, same statements; summary first, closing tip last
        #[test]
        fn prop_insights_are_deterministic(games in prop::collection::vec(arb_game(), 0..30)) {
            let first = generate_insights(&games);
            let second = generate_insights(&games);
            prop_assert_eq!(&first, &second);
            prop_assert!(first.iter().all(|s| !s.is_empty()));
            if !games.is_empty() {
                prop_assert!(first[0].starts_with("You've logged"));
                prop_assert_eq!(first.last().map(String::as_str), Some(insights::CLOSING_INSIGHT));
            }
        }

        /// Breakdown buckets never exceed the total
        #[test]
        fn prop_breakdown_is_consistent(games in prop::collection::vec(arb_game(), 0..30)) {
            let breakdown = MistakeBreakdown::tally(&games);
            let all: usize = games.iter().map(|g| g.mistakes.len()).sum();
            prop_assert_eq!(breakdown.total, all);
            prop_assert_eq!(breakdown.tactical.total() + breakdown.positional.total(), all);
            let phases = breakdown.phases;
            prop_assert!(phases.opening + phases.middlegame + phases.endgame <= all);
            prop_assert!(breakdown.time_pressure <= all);
        }
    }
}

//! Single-pass mistake tally shared by the insight pipeline.

use serde::Serialize;

use super::aggregate::Tally;
use crate::types::{Game, GamePhase, MistakeKind, PositionalType, TacticType};

/// Mistake counts per phase bucket.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct PhaseCounts {
    pub opening: usize,
    pub middlegame: usize,
    pub endgame: usize,
}

impl PhaseCounts {
    /// Count for a phase; unrecognized phases have no bucket and read as 0.
    pub fn get(&self, phase: GamePhase) -> usize {
        match phase {
            GamePhase::Opening => self.opening,
            GamePhase::Middlegame => self.middlegame,
            GamePhase::Endgame => self.endgame,
            GamePhase::Unrecognized => 0,
        }
    }

    fn record(&mut self, phase: GamePhase) {
        match phase {
            GamePhase::Opening => self.opening += 1,
            GamePhase::Middlegame => self.middlegame += 1,
            GamePhase::Endgame => self.endgame += 1,
            GamePhase::Unrecognized => {}
        }
    }

    /// Phase with the most mistakes, `None` if every bucket is empty.
    /// Ties go to the earlier phase.
    pub fn worst(&self) -> Option<(GamePhase, usize)> {
        let mut worst: Option<(GamePhase, usize)> = None;
        for phase in GamePhase::BUCKETED {
            let count = self.get(phase);
            if count > worst.map(|(_, c)| c).unwrap_or(0) {
                worst = Some((phase, count));
            }
        }
        worst
    }
}

/// Snapshot of every mistake in a collection, tallied once.
#[derive(Debug, Clone, Default)]
pub struct MistakeBreakdown {
    pub tactical: Tally<TacticType>,
    pub positional: Tally<PositionalType>,
    pub phases: PhaseCounts,
    /// Mistakes flagged as made under time pressure
    pub time_pressure: usize,
    pub total: usize,
}

impl MistakeBreakdown {
    /// Walk all games and their mistakes once.
    pub fn tally(games: &[Game]) -> Self {
        let mut breakdown = Self::default();

        for mistake in games.iter().flat_map(|g| g.mistakes.iter()) {
            match mistake.kind {
                MistakeKind::Tactical(t) => breakdown.tactical.add(t),
                MistakeKind::Positional(p) => breakdown.positional.add(p),
            }
            breakdown.phases.record(mistake.game_phase);
            if mistake.time_pressure {
                breakdown.time_pressure += 1;
            }
            breakdown.total += 1;
        }

        breakdown
    }

    /// Fraction of mistakes made under time pressure (0.0 when there are none).
    pub fn time_pressure_fraction(&self) -> f64 {
        if self.total == 0 {
            0.0
        } else {
            self.time_pressure as f64 / self.total as f64
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analytics::testing::{
        in_phase, mistake_game, positional, tactical, under_time_pressure,
    };

    #[test]
    fn test_empty_breakdown() {
        let breakdown = MistakeBreakdown::tally(&[]);
        assert_eq!(breakdown.total, 0);
        assert!(breakdown.tactical.is_empty());
        assert!(breakdown.positional.is_empty());
        assert_eq!(breakdown.phases.worst(), None);
        assert_eq!(breakdown.time_pressure_fraction(), 0.0);
    }

    #[test]
    fn test_tally_splits_by_kind_phase_and_clock() {
        let games = vec![
            mistake_game(
                "2024-02-01",
                vec![
                    in_phase(tactical(TacticType::Fork), GamePhase::Opening),
                    under_time_pressure(in_phase(
                        tactical(TacticType::Fork),
                        GamePhase::Endgame,
                    )),
                ],
            ),
            mistake_game(
                "2024-02-02",
                vec![under_time_pressure(positional(PositionalType::KingSafety))],
            ),
        ];

        let breakdown = MistakeBreakdown::tally(&games);
        assert_eq!(breakdown.total, 3);
        assert_eq!(breakdown.tactical.get(TacticType::Fork), 2);
        assert_eq!(breakdown.positional.get(PositionalType::KingSafety), 1);
        assert_eq!(
            breakdown.phases,
            PhaseCounts {
                opening: 1,
                middlegame: 1,
                endgame: 1,
            }
        );
        assert_eq!(breakdown.time_pressure, 2);
    }

    #[test]
    fn test_unrecognized_phase_is_skipped_but_counted_in_total() {
        let games = vec![mistake_game(
            "2024-02-01",
            vec![in_phase(tactical(TacticType::Pin), GamePhase::Unrecognized)],
        )];
        let breakdown = MistakeBreakdown::tally(&games);
        assert_eq!(breakdown.total, 1);
        assert_eq!(breakdown.phases, PhaseCounts::default());
        assert_eq!(breakdown.phases.worst(), None);
    }

    #[test]
    fn test_worst_phase_ties_go_to_earlier_phase() {
        let counts = PhaseCounts {
            opening: 0,
            middlegame: 3,
            endgame: 3,
        };
        assert_eq!(counts.worst(), Some((GamePhase::Middlegame, 3)));
    }
}

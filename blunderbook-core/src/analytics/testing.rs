//! Record builders shared by the analytics unit tests.

use chrono::NaiveDate;

use crate::types::{
    Color, Game, GamePhase, GameResult, Mistake, MistakeKind, PositionalType, TacticType,
    TimeControl,
};

pub fn date(s: &str) -> NaiveDate {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").expect("valid test date")
}

pub fn game(day: &str, result: GameResult, opening: &str) -> Game {
    Game {
        id: uuid::Uuid::new_v4().to_string(),
        date: date(day),
        color: Color::White,
        opponent_rating: 1500,
        result,
        opening: opening.to_string(),
        time_control: TimeControl::Rapid,
        game_link: None,
        pgn: None,
        mistakes: Vec::new(),
    }
}

pub fn mistake_game(day: &str, mistakes: Vec<Mistake>) -> Game {
    Game {
        mistakes,
        ..game(day, GameResult::Loss, "Italian")
    }
}

/// A game with `count` middlegame tactical mistakes.
pub fn game_with_mistakes(day: &str, count: usize) -> Game {
    mistake_game(
        day,
        (0..count).map(|_| tactical(TacticType::Fork)).collect(),
    )
}

pub fn tactical(tactic: TacticType) -> Mistake {
    mistake(MistakeKind::Tactical(tactic))
}

pub fn positional(positional: PositionalType) -> Mistake {
    mistake(MistakeKind::Positional(positional))
}

pub fn mistake(kind: MistakeKind) -> Mistake {
    Mistake {
        id: uuid::Uuid::new_v4().to_string(),
        kind,
        game_phase: GamePhase::Middlegame,
        time_pressure: false,
        note: None,
    }
}

pub fn in_phase(mut mistake: Mistake, phase: GamePhase) -> Mistake {
    mistake.game_phase = phase;
    mistake
}

pub fn under_time_pressure(mut mistake: Mistake) -> Mistake {
    mistake.time_pressure = true;
    mistake
}

/// `day` days after 2024-01-01, formatted for [`game`].
pub fn nth_day(day: u32) -> String {
    (date("2024-01-01") + chrono::Duration::days(i64::from(day)))
        .format("%Y-%m-%d")
        .to_string()
}

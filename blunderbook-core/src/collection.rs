//! In-memory mutations of the game collection.
//!
//! Games are created whole, edited whole and deleted whole. Mistakes are only
//! ever appended to a game; they go away with the game that owns them.

use chrono::NaiveDate;

use crate::error::{Error, Result};
use crate::types::{Color, Game, GamePhase, GameResult, Mistake, MistakeKind, TimeControl};

/// Fields for a new game; the id is assigned on insert.
#[derive(Debug, Clone)]
pub struct NewGame {
    pub date: NaiveDate,
    pub color: Color,
    pub opponent_rating: i32,
    pub result: GameResult,
    pub opening: String,
    pub time_control: TimeControl,
    pub game_link: Option<String>,
    pub pgn: Option<String>,
}

/// Replacement values for an existing game. `None` keeps the current value.
#[derive(Debug, Clone, Default)]
pub struct GameEdit {
    pub date: Option<NaiveDate>,
    pub color: Option<Color>,
    pub opponent_rating: Option<i32>,
    pub result: Option<GameResult>,
    pub opening: Option<String>,
    pub time_control: Option<TimeControl>,
    pub game_link: Option<String>,
    pub pgn: Option<String>,
}

/// Fields for a new mistake; the id is assigned on insert.
#[derive(Debug, Clone)]
pub struct NewMistake {
    pub kind: MistakeKind,
    pub game_phase: GamePhase,
    pub time_pressure: bool,
    pub note: Option<String>,
}

fn new_id() -> String {
    uuid::Uuid::new_v4().to_string()
}

/// Append a game and return a copy of it.
pub fn add_game(games: &mut Vec<Game>, new: NewGame) -> Game {
    let game = Game {
        id: new_id(),
        date: new.date,
        color: new.color,
        opponent_rating: new.opponent_rating,
        result: new.result,
        opening: new.opening,
        time_control: new.time_control,
        game_link: new.game_link,
        pgn: new.pgn,
        mistakes: Vec::new(),
    };
    tracing::debug!(game_id = %game.id, date = %game.date, "Adding game");
    games.push(game.clone());
    game
}

/// Apply an edit to the game with `id`. Mistakes are kept.
pub fn edit_game(games: &mut [Game], id: &str, edit: GameEdit) -> Result<()> {
    let game = games
        .iter_mut()
        .find(|g| g.id == id)
        .ok_or_else(|| Error::GameNotFound(id.to_string()))?;

    if let Some(date) = edit.date {
        game.date = date;
    }
    if let Some(color) = edit.color {
        game.color = color;
    }
    if let Some(rating) = edit.opponent_rating {
        game.opponent_rating = rating;
    }
    if let Some(result) = edit.result {
        game.result = result;
    }
    if let Some(opening) = edit.opening {
        game.opening = opening;
    }
    if let Some(time_control) = edit.time_control {
        game.time_control = time_control;
    }
    if let Some(link) = edit.game_link {
        game.game_link = Some(link);
    }
    if let Some(pgn) = edit.pgn {
        game.pgn = Some(pgn);
    }

    tracing::debug!(game_id = %id, "Edited game");
    Ok(())
}

/// Remove the game with `id`, together with its mistakes.
pub fn delete_game(games: &mut Vec<Game>, id: &str) -> Result<Game> {
    let index = games
        .iter()
        .position(|g| g.id == id)
        .ok_or_else(|| Error::GameNotFound(id.to_string()))?;
    let game = games.remove(index);
    tracing::debug!(game_id = %id, mistakes = game.mistakes.len(), "Deleted game");
    Ok(game)
}

/// Append a mistake to the game with `game_id`.
pub fn add_mistake(games: &mut [Game], game_id: &str, new: NewMistake) -> Result<Mistake> {
    let game = games
        .iter_mut()
        .find(|g| g.id == game_id)
        .ok_or_else(|| Error::GameNotFound(game_id.to_string()))?;

    let mistake = Mistake {
        id: new_id(),
        kind: new.kind,
        game_phase: new.game_phase,
        time_pressure: new.time_pressure,
        note: new.note,
    };
    game.mistakes.push(mistake.clone());
    tracing::debug!(game_id = %game_id, mistake_id = %mistake.id, kind = %mistake.kind, "Added mistake");
    Ok(mistake)
}

/// Find a game by full id or unique id prefix.
pub fn find_game<'a>(games: &'a [Game], id_or_prefix: &str) -> Result<&'a Game> {
    if let Some(game) = games.iter().find(|g| g.id == id_or_prefix) {
        return Ok(game);
    }

    let mut matches = games.iter().filter(|g| g.id.starts_with(id_or_prefix));
    match (matches.next(), matches.next()) {
        (Some(game), None) if !id_or_prefix.is_empty() => Ok(game),
        (Some(_), _) => Err(Error::AmbiguousId(id_or_prefix.to_string())),
        (None, _) => Err(Error::GameNotFound(id_or_prefix.to_string())),
    }
}

//! Aggregate statistics over a game collection.
//!
//! Win rate, category frequency ranking and the per-opening table. All of
//! these are total over any collection, including an empty one.

use serde::Serialize;

use crate::format::round1;
use crate::types::{Game, MistakeKind};

/// Number of entries kept by [`tactic_ranking`].
pub const TOP_CATEGORIES: usize = 5;

/// Label used for games logged without an opening name.
pub const UNKNOWN_OPENING: &str = "Unknown";

/// Count of occurrences per key, in first-seen order.
///
/// Ties in later rankings are broken by this order, so it is part of the
/// result and not an implementation detail.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tally<K> {
    entries: Vec<(K, usize)>,
}

impl<K> Default for Tally<K> {
    fn default() -> Self {
        Self {
            entries: Vec::new(),
        }
    }
}

impl<K: PartialEq + Copy> Tally<K> {
    pub fn add(&mut self, key: K) {
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some((_, count)) => *count += 1,
            None => self.entries.push((key, 1)),
        }
    }

    pub fn get(&self, key: K) -> usize {
        self.entries
            .iter()
            .find(|(k, _)| *k == key)
            .map(|(_, count)| *count)
            .unwrap_or(0)
    }

    /// Entries in first-seen order.
    pub fn entries(&self) -> &[(K, usize)] {
        &self.entries
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn total(&self) -> usize {
        self.entries.iter().map(|(_, count)| count).sum()
    }

    /// Entries sorted by count descending; ties keep first-seen order.
    pub fn ranked(&self) -> Vec<(K, usize)> {
        let mut ranked = self.entries.clone();
        ranked.sort_by(|a, b| b.1.cmp(&a.1));
        ranked
    }

    /// The most frequent key, the earliest seen on ties.
    pub fn top(&self) -> Option<(K, usize)> {
        self.ranked().into_iter().next()
    }
}

/// Percentage of games won, rounded to one decimal place. `0.0` when empty.
pub fn win_rate(games: &[Game]) -> f64 {
    if games.is_empty() {
        return 0.0;
    }
    let wins = games.iter().filter(|g| g.is_win()).count();
    round1(100.0 * wins as f64 / games.len() as f64)
}

/// The most frequent mistake categories across all games, at most five.
///
/// Every mistake counts under its active category, tactical or positional.
/// Sorted by count descending; equal counts keep the order in which the
/// categories were first met while walking games and their mistakes.
pub fn tactic_ranking(games: &[Game]) -> Vec<(MistakeKind, usize)> {
    let mut tally = Tally::default();
    for mistake in games.iter().flat_map(|g| g.mistakes.iter()) {
        tally.add(mistake.kind);
    }
    let mut ranked = tally.ranked();
    ranked.truncate(TOP_CATEGORIES);
    ranked
}

/// One row of the per-opening table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OpeningRow {
    pub opening: String,
    /// Win percentage rounded to a whole number (0-100)
    pub win_rate_percent: u32,
    pub game_count: usize,
}

/// Win rate per opening, most played first.
///
/// Empty or blank opening names are grouped under `"Unknown"`. Openings
/// played equally often keep the order in which they were first met.
pub fn opening_table(games: &[Game]) -> Vec<OpeningRow> {
    // (opening, games, wins) in encounter order
    let mut groups: Vec<(&str, usize, usize)> = Vec::new();

    for game in games {
        let name = opening_label(&game.opening);
        let win = usize::from(game.is_win());
        match groups.iter_mut().find(|(opening, _, _)| *opening == name) {
            Some((_, count, wins)) => {
                *count += 1;
                *wins += win;
            }
            None => groups.push((name, 1, win)),
        }
    }

    let mut rows: Vec<OpeningRow> = groups
        .into_iter()
        .map(|(opening, count, wins)| OpeningRow {
            opening: opening.to_string(),
            win_rate_percent: (100.0 * wins as f64 / count as f64).round() as u32,
            game_count: count,
        })
        .collect();

    rows.sort_by(|a, b| b.game_count.cmp(&a.game_count));
    rows
}

/// Display label for an opening name.
pub fn opening_label(opening: &str) -> &str {
    let trimmed = opening.trim();
    if trimmed.is_empty() {
        UNKNOWN_OPENING
    } else {
        trimmed
    }
}

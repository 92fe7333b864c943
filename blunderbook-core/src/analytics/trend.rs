//! Recent-form trend: mistakes per game in the latest window vs the one before.

use serde::Serialize;

use crate::types::Game;

/// Default number of games per comparison window.
pub const TREND_WINDOW: usize = 10;

/// Outcome of comparing the two trailing windows.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Trend {
    /// Fewer than a full window of games precede the latest window.
    Insufficient { last_avg: f64 },
    /// Both windows are full.
    Change {
        last_avg: f64,
        prev_avg: f64,
        /// Relative change of `last_avg` against `prev_avg`, in percent
        change_percent: f64,
    },
}

impl Trend {
    /// Average mistakes per game in the most recent window.
    pub fn last_avg(&self) -> f64 {
        match self {
            Trend::Insufficient { last_avg } | Trend::Change { last_avg, .. } => *last_avg,
        }
    }
}

/// Compare mistakes per game in the last `window` games with the `window`
/// games before them.
///
/// Games are ordered by date; games sharing a date keep collection order.
/// Returns `None` for an empty collection (or a zero window).
/// A trend is only reported when a full `window` of games precedes the
/// latest window; anything short of that is [`Trend::Insufficient`].
pub fn detect_trend(games: &[Game], window: usize) -> Option<Trend> {
    if games.is_empty() || window == 0 {
        return None;
    }

    let mut sorted: Vec<&Game> = games.iter().collect();
    sorted.sort_by_key(|g| g.date);

    let last_start = sorted.len().saturating_sub(window);
    let last = &sorted[last_start..];
    let prev = if last_start >= window {
        &sorted[last_start - window..last_start]
    } else {
        &sorted[..0]
    };

    let last_avg = average_mistakes(last);
    if prev.is_empty() {
        return Some(Trend::Insufficient { last_avg });
    }

    let prev_avg = average_mistakes(prev);
    Some(Trend::Change {
        last_avg,
        prev_avg,
        change_percent: calc_delta(last_avg, prev_avg),
    })
}

/// Percentage change from `previous` to `current`.
///
/// A zero baseline reads as 0% when nothing changed and 100% otherwise.
pub fn calc_delta(current: f64, previous: f64) -> f64 {
    if previous == 0.0 {
        if current == 0.0 {
            0.0
        } else {
            100.0
        }
    } else {
        (current - previous) / previous * 100.0
    }
}

fn average_mistakes(games: &[&Game]) -> f64 {
    if games.is_empty() {
        return 0.0;
    }
    let total: usize = games.iter().map(|g| g.mistake_count()).sum();
    total as f64 / games.len() as f64
}

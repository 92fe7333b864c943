//! Formatting helpers shared by the insight text and the CLI.

/// Render an internal category key for people.
///
/// A space goes before every internal capital letter and underscores become
/// spaces: `back_rank` and `backRank` both read as "back rank" / "back Rank".
pub fn humanize_key(key: &str) -> String {
    let mut out = String::with_capacity(key.len() + 4);
    for (i, ch) in key.chars().enumerate() {
        if ch == '_' {
            out.push(' ');
        } else {
            if i > 0 && ch.is_uppercase() && !out.ends_with(' ') {
                out.push(' ');
            }
            out.push(ch);
        }
    }
    out
}

/// Round to one decimal place (e.g. 66.666 -> 66.7).
pub fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

/// Round to two decimal places, halves away from zero (0.125 -> 0.13).
///
/// Every figure in user-facing text goes through `round1`, `round2` or
/// `percent` first; `{:.N}` alone rounds ties to even.
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Whole-number percentage, halves away from zero (12.5 -> 13).
pub fn percent(value: f64) -> i64 {
    value.round() as i64
}

/// Format a signed percentage change for display (e.g., "+23%" or "-15%").
pub fn format_delta(delta: f64) -> String {
    let rounded = percent(delta);
    if rounded >= 0 {
        format!("+{}%", rounded)
    } else {
        format!("{}%", rounded)
    }
}

/// Pluralize a count with its noun (e.g., "1 game", "3 games").
pub fn plural(count: usize, noun: &str) -> String {
    if count == 1 {
        format!("{} {}", count, noun)
    } else {
        format!("{} {}s", count, noun)
    }
}

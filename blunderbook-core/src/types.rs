//! Core domain types for blunderbook
//!
//! These types are the record model every statistic is computed from.
//!
//! ## Terminology
//!
//! | Term | Definition |
//! |------|------------|
//! | **Game** | One logged game, owned by the collection |
//! | **Mistake** | A single error logged against a game, owned by that game |
//! | **Category** | The tactic or positional motif a mistake is filed under |
//! | **Phase** | Opening, middlegame or endgame |
//!
//! A mistake carries exactly one active category, modeled as [`MistakeKind`].
//! The stored JSON keeps the flat `mistake_type` / `tactic_type` /
//! `positional_type` layout; whichever category field is inactive is ignored
//! when reading.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::format::humanize_key;

// ============================================
// Game
// ============================================

/// A single logged game.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Game {
    /// Unique identifier (uuid v4 for games created here)
    pub id: String,
    /// Day the game was played
    pub date: NaiveDate,
    /// Side the player had
    pub color: Color,
    /// Opponent rating at the time of the game
    pub opponent_rating: i32,
    /// Outcome from the player's point of view
    pub result: GameResult,
    /// Free-text opening label (may be empty)
    #[serde(default)]
    pub opening: String,
    pub time_control: TimeControl,
    /// Link to the game on a server (optional)
    #[serde(default)]
    pub game_link: Option<String>,
    /// Raw PGN text, stored as-is
    #[serde(default)]
    pub pgn: Option<String>,
    /// Mistakes in insertion order
    #[serde(default)]
    pub mistakes: Vec<Mistake>,
}

impl Game {
    /// Number of mistakes logged against this game.
    pub fn mistake_count(&self) -> usize {
        self.mistakes.len()
    }

    pub fn is_win(&self) -> bool {
        self.result == GameResult::Win
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Color {
    White,
    Black,
}

impl Color {
    pub fn as_str(&self) -> &'static str {
        match self {
            Color::White => "white",
            Color::Black => "black",
        }
    }
}

impl std::fmt::Display for Color {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for Color {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "white" | "w" => Ok(Color::White),
            "black" | "b" => Ok(Color::Black),
            _ => Err(format!("unknown color: {}", s)),
        }
    }
}

/// Game outcome for the player.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GameResult {
    Win,
    Loss,
    Draw,
}

impl GameResult {
    pub fn as_str(&self) -> &'static str {
        match self {
            GameResult::Win => "win",
            GameResult::Loss => "loss",
            GameResult::Draw => "draw",
        }
    }
}

impl std::fmt::Display for GameResult {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for GameResult {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "win" | "1-0" => Ok(GameResult::Win),
            "loss" | "0-1" => Ok(GameResult::Loss),
            "draw" | "1/2-1/2" => Ok(GameResult::Draw),
            _ => Err(format!("unknown result: {}", s)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TimeControl {
    Blitz,
    Rapid,
    Classical,
}

impl TimeControl {
    pub fn as_str(&self) -> &'static str {
        match self {
            TimeControl::Blitz => "blitz",
            TimeControl::Rapid => "rapid",
            TimeControl::Classical => "classical",
        }
    }
}

impl std::fmt::Display for TimeControl {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for TimeControl {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "blitz" => Ok(TimeControl::Blitz),
            "rapid" => Ok(TimeControl::Rapid),
            "classical" => Ok(TimeControl::Classical),
            _ => Err(format!("unknown time control: {}", s)),
        }
    }
}

// ============================================
// Mistake
// ============================================

/// A mistake logged against a game. Immutable once added.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "MistakeRecord", into = "MistakeRecord")]
pub struct Mistake {
    pub id: String,
    /// The active category
    pub kind: MistakeKind,
    pub game_phase: GamePhase,
    /// Whether the player was short on time
    pub time_pressure: bool,
    pub note: Option<String>,
}

/// Which category a mistake is filed under.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MistakeKind {
    Tactical(TacticType),
    Positional(PositionalType),
}

impl MistakeKind {
    /// Internal snake_case key of the active category.
    pub fn key(&self) -> &'static str {
        match self {
            MistakeKind::Tactical(t) => t.as_str(),
            MistakeKind::Positional(p) => p.as_str(),
        }
    }

    /// Human-readable category name (e.g. "back rank").
    pub fn label(&self) -> String {
        humanize_key(self.key())
    }

    pub fn mistake_type(&self) -> MistakeType {
        match self {
            MistakeKind::Tactical(_) => MistakeType::Tactical,
            MistakeKind::Positional(_) => MistakeType::Positional,
        }
    }
}

impl std::fmt::Display for MistakeKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.key())
    }
}

impl Serialize for MistakeKind {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.key())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MistakeType {
    Tactical,
    Positional,
}

/// Flat on-disk shape of a [`Mistake`].
///
/// Both category fields are kept as raw strings; only the one named by
/// `mistake_type` is parsed.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct MistakeRecord {
    id: String,
    mistake_type: MistakeType,
    #[serde(
        default,
        deserialize_with = "any_string",
        skip_serializing_if = "Option::is_none"
    )]
    tactic_type: Option<String>,
    #[serde(
        default,
        deserialize_with = "any_string",
        skip_serializing_if = "Option::is_none"
    )]
    positional_type: Option<String>,
    game_phase: GamePhase,
    #[serde(default)]
    time_pressure: bool,
    #[serde(default)]
    note: Option<String>,
}

/// Any JSON value; strings are kept, everything else reads as absent.
fn any_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(serde_json::Value::String(s)) => Some(s),
        _ => None,
    })
}

impl TryFrom<MistakeRecord> for Mistake {
    type Error = String;

    fn try_from(record: MistakeRecord) -> Result<Self, Self::Error> {
        let kind = match record.mistake_type {
            MistakeType::Tactical => {
                let raw = record.tactic_type.as_deref().ok_or_else(|| {
                    format!("mistake {} is tactical but has no tactic_type", record.id)
                })?;
                MistakeKind::Tactical(raw.parse()?)
            }
            MistakeType::Positional => {
                let raw = record.positional_type.as_deref().ok_or_else(|| {
                    format!(
                        "mistake {} is positional but has no positional_type",
                        record.id
                    )
                })?;
                MistakeKind::Positional(raw.parse()?)
            }
        };
        Ok(Mistake {
            id: record.id,
            kind,
            game_phase: record.game_phase,
            time_pressure: record.time_pressure,
            note: record.note,
        })
    }
}

impl From<Mistake> for MistakeRecord {
    fn from(mistake: Mistake) -> Self {
        let (tactic_type, positional_type) = match mistake.kind {
            MistakeKind::Tactical(t) => (Some(t.as_str().to_string()), None),
            MistakeKind::Positional(p) => (None, Some(p.as_str().to_string())),
        };
        MistakeRecord {
            id: mistake.id,
            mistake_type: mistake.kind.mistake_type(),
            tactic_type,
            positional_type,
            game_phase: mistake.game_phase,
            time_pressure: mistake.time_pressure,
            note: mistake.note,
        }
    }
}

/// Phase of the game a mistake happened in.
///
/// Stored values outside the three known phases read as `Unrecognized` and
/// are left out of phase statistics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GamePhase {
    Opening,
    Middlegame,
    Endgame,
    #[serde(other)]
    Unrecognized,
}

impl GamePhase {
    /// The phases that have a statistics bucket, in reporting order.
    pub const BUCKETED: [GamePhase; 3] =
        [GamePhase::Opening, GamePhase::Middlegame, GamePhase::Endgame];

    pub fn as_str(&self) -> &'static str {
        match self {
            GamePhase::Opening => "opening",
            GamePhase::Middlegame => "middlegame",
            GamePhase::Endgame => "endgame",
            GamePhase::Unrecognized => "unrecognized",
        }
    }
}

impl std::fmt::Display for GamePhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for GamePhase {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "opening" => Ok(GamePhase::Opening),
            "middlegame" => Ok(GamePhase::Middlegame),
            "endgame" => Ok(GamePhase::Endgame),
            _ => Err(format!("unknown game phase: {}", s)),
        }
    }
}

// ============================================
// Categories
// ============================================

/// Tactical motif that was missed or walked into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TacticType {
    Fork,
    Pin,
    Skewer,
    DiscoveredAttack,
    DoubleCheck,
    BackRank,
    HangingPiece,
    Overloading,
    Deflection,
    Decoy,
    Interference,
    Zwischenzug,
    Xray,
    RemovingTheDefender,
    TrappedPiece,
    MissedMate,
    Clearance,
    Desperado,
}

impl TacticType {
    pub const ALL: [TacticType; 18] = [
        TacticType::Fork,
        TacticType::Pin,
        TacticType::Skewer,
        TacticType::DiscoveredAttack,
        TacticType::DoubleCheck,
        TacticType::BackRank,
        TacticType::HangingPiece,
        TacticType::Overloading,
        TacticType::Deflection,
        TacticType::Decoy,
        TacticType::Interference,
        TacticType::Zwischenzug,
        TacticType::Xray,
        TacticType::RemovingTheDefender,
        TacticType::TrappedPiece,
        TacticType::MissedMate,
        TacticType::Clearance,
        TacticType::Desperado,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            TacticType::Fork => "fork",
            TacticType::Pin => "pin",
            TacticType::Skewer => "skewer",
            TacticType::DiscoveredAttack => "discovered_attack",
            TacticType::DoubleCheck => "double_check",
            TacticType::BackRank => "back_rank",
            TacticType::HangingPiece => "hanging_piece",
            TacticType::Overloading => "overloading",
            TacticType::Deflection => "deflection",
            TacticType::Decoy => "decoy",
            TacticType::Interference => "interference",
            TacticType::Zwischenzug => "zwischenzug",
            TacticType::Xray => "xray",
            TacticType::RemovingTheDefender => "removing_the_defender",
            TacticType::TrappedPiece => "trapped_piece",
            TacticType::MissedMate => "missed_mate",
            TacticType::Clearance => "clearance",
            TacticType::Desperado => "desperado",
        }
    }
}

impl std::str::FromStr for TacticType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.to_lowercase().replace(['-', ' '], "_");
        TacticType::ALL
            .iter()
            .copied()
            .find(|t| t.as_str() == wanted || (wanted == "x_ray" && *t == TacticType::Xray))
            .ok_or_else(|| format!("unknown tactic type: {}", s))
    }
}

/// Positional error category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PositionalType {
    WeakSquares,
    PawnStructure,
    BadBishop,
    PassivePieces,
    KingSafety,
    SpaceDisadvantage,
    OpenFileControl,
    MissedOutpost,
    PieceCoordination,
    LackOfProphylaxis,
    Overextension,
    WrongPlan,
    PrematureAttack,
    BadTrade,
    SlowDevelopment,
    CenterControl,
}

impl PositionalType {
    pub const ALL: [PositionalType; 16] = [
        PositionalType::WeakSquares,
        PositionalType::PawnStructure,
        PositionalType::BadBishop,
        PositionalType::PassivePieces,
        PositionalType::KingSafety,
        PositionalType::SpaceDisadvantage,
        PositionalType::OpenFileControl,
        PositionalType::MissedOutpost,
        PositionalType::PieceCoordination,
        PositionalType::LackOfProphylaxis,
        PositionalType::Overextension,
        PositionalType::WrongPlan,
        PositionalType::PrematureAttack,
        PositionalType::BadTrade,
        PositionalType::SlowDevelopment,
        PositionalType::CenterControl,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            PositionalType::WeakSquares => "weak_squares",
            PositionalType::PawnStructure => "pawn_structure",
            PositionalType::BadBishop => "bad_bishop",
            PositionalType::PassivePieces => "passive_pieces",
            PositionalType::KingSafety => "king_safety",
            PositionalType::SpaceDisadvantage => "space_disadvantage",
            PositionalType::OpenFileControl => "open_file_control",
            PositionalType::MissedOutpost => "missed_outpost",
            PositionalType::PieceCoordination => "piece_coordination",
            PositionalType::LackOfProphylaxis => "lack_of_prophylaxis",
            PositionalType::Overextension => "overextension",
            PositionalType::WrongPlan => "wrong_plan",
            PositionalType::PrematureAttack => "premature_attack",
            PositionalType::BadTrade => "bad_trade",
            PositionalType::SlowDevelopment => "slow_development",
            PositionalType::CenterControl => "center_control",
        }
    }
}

impl std::str::FromStr for PositionalType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.to_lowercase().replace(['-', ' '], "_");
        PositionalType::ALL
            .iter()
            .copied()
            .find(|p| p.as_str() == wanted)
            .ok_or_else(|| format!("unknown positional type: {}", s))
    }
}

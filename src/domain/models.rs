use serde::{Deserialize, Serialize};

/// One raw rating measurement as delivered by the rating-history endpoint.
/// The month is 0-based (0 = January) on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RatingSample {
    pub year: i32,
    pub month: u32,
    pub day: u32,
    pub rating: i32,
}

/// One variant's rating history from the Lichess API.
///
/// The endpoint returns `[{"name": "Blitz", "points": [[2023, 0, 1, 1500], ...]}, ...]`.
#[derive(Debug, Clone, Deserialize)]
pub struct RatingHistoryEntry {
    pub name: String,
    pub points: Vec<[i32; 4]>,
}

impl RatingHistoryEntry {
    pub fn samples(&self) -> Vec<RatingSample> {
        self.points
            .iter()
            .map(|p| RatingSample {
                year: p[0],
                month: p[1] as u32,
                day: p[2] as u32,
                rating: p[3],
            })
            .collect()
    }
}

/// One decoded unit of the NDJSON game stream. Consumed once and discarded.
#[derive(Debug, Clone, Deserialize)]
pub struct GameRecord {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub pgn: Option<String>,
}

/// Which side the subject played in a game.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
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

/// Game result from the subject's perspective.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameResultKind {
    Win,
    Loss,
    Draw,
    /// Ongoing or unresolved result: counts toward games only.
    Unknown,
}

/// Classification of one game that involves the subject.
#[derive(Debug, Clone, PartialEq)]
pub struct GameOutcome {
    pub color: Color,
    pub opening_key: String,
    pub result: GameResultKind,
}

/// Additive per-color, per-opening counters. Never decremented.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct OpeningBucket {
    pub games: u32,
    pub wins: u32,
    pub losses: u32,
    pub draws: u32,
}

impl OpeningBucket {
    pub fn win_rate(&self) -> f64 {
        if self.games > 0 {
            self.wins as f64 / self.games as f64 * 100.0
        } else {
            0.0
        }
    }
}

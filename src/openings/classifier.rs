use std::collections::HashMap;

use anyhow::{Context, Result};
use regex::Regex;

use crate::domain::{Color, GameOutcome, GameRecord, GameResultKind};
use crate::errors::AnalyticsError;

const DEFAULT_ECO: &str = "Unknown";
const DEFAULT_OPENING: &str = "Unknown Opening";

/// Classifies one game's PGN headers against a subject player: which color
/// they played, which opening was on the board and how the game ended from
/// their perspective.
pub struct OpeningClassifier {
    subject: String,
    header_regex: Regex,
}

impl OpeningClassifier {
    pub fn new(subject: &str) -> Result<Self> {
        // PGN header tag pair: [Tag "Value"]
        let header_regex =
            Regex::new(r#"(?m)^\[(\w+)\s+"([^"]*)"\]"#).context("Failed to compile PGN header regex")?;
        Ok(Self {
            subject: subject.to_lowercase(),
            header_regex,
        })
    }

    /// Classify one record. `Ok(None)` means the subject played in neither
    /// seat and the game must not be counted anywhere.
    pub fn classify(&self, record: &GameRecord) -> Result<Option<GameOutcome>, AnalyticsError> {
        let pgn = record.pgn.as_deref().unwrap_or("");
        let headers = self.parse_headers(pgn);
        if headers.is_empty() {
            return Err(AnalyticsError::UnparseableGame {
                game_id: record.id.clone().unwrap_or_else(|| "<unknown>".to_string()),
            });
        }

        let Some(color) = self.determine_color(&headers) else {
            return Ok(None);
        };

        let eco = headers.get("ECO").map_or(DEFAULT_ECO, String::as_str);
        let opening = headers
            .get("Opening")
            .map_or(DEFAULT_OPENING, String::as_str);
        let result_tag = headers.get("Result").map_or("*", String::as_str);

        Ok(Some(GameOutcome {
            color,
            opening_key: format!("{eco} - {opening}"),
            result: map_result(result_tag, color),
        }))
    }

    fn parse_headers(&self, pgn: &str) -> HashMap<String, String> {
        self.header_regex
            .captures_iter(pgn)
            .map(|caps| (caps[1].to_string(), caps[2].to_string()))
            .collect()
    }

    /// Player tags are matched case-insensitively against the subject.
    fn determine_color(&self, headers: &HashMap<String, String>) -> Option<Color> {
        let white = headers.get("White").map(|s| s.to_lowercase());
        let black = headers.get("Black").map(|s| s.to_lowercase());

        if white.as_deref() == Some(self.subject.as_str()) {
            Some(Color::White)
        } else if black.as_deref() == Some(self.subject.as_str()) {
            Some(Color::Black)
        } else {
            None
        }
    }
}

/// Map a PGN result tag to the subject's perspective. Anything other than
/// the three standard tags is an unresolved/ongoing game.
fn map_result(result_tag: &str, color: Color) -> GameResultKind {
    match result_tag {
        "1-0" => match color {
            Color::White => GameResultKind::Win,
            Color::Black => GameResultKind::Loss,
        },
        "0-1" => match color {
            Color::Black => GameResultKind::Win,
            Color::White => GameResultKind::Loss,
        },
        "1/2-1/2" => GameResultKind::Draw,
        _ => GameResultKind::Unknown,
    }
}

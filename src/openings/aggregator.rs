use std::collections::HashMap;

use crate::domain::{Color, GameOutcome, GameResultKind, OpeningBucket};

/// Per-color opening buckets plus the order keys were first seen in,
/// so reports are reproducible for identical input streams.
#[derive(Debug, Default)]
pub struct ColorStats {
    buckets: HashMap<String, OpeningBucket>,
    first_seen: Vec<String>,
}

impl ColorStats {
    pub fn len(&self) -> usize {
        self.buckets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buckets.is_empty()
    }

    pub fn get(&self, opening_key: &str) -> Option<&OpeningBucket> {
        self.buckets.get(opening_key)
    }

    pub fn buckets(&self) -> &HashMap<String, OpeningBucket> {
        &self.buckets
    }

    /// Buckets sorted by game count descending; ties keep first-seen order
    /// (sort_by is stable).
    pub fn ranked(&self) -> Vec<(&str, &OpeningBucket)> {
        let mut rows: Vec<(&str, &OpeningBucket)> = self
            .first_seen
            .iter()
            .map(|key| (key.as_str(), &self.buckets[key]))
            .collect();
        rows.sort_by(|a, b| b.1.games.cmp(&a.1.games));
        rows
    }

    fn bucket_mut(&mut self, opening_key: &str) -> &mut OpeningBucket {
        if !self.buckets.contains_key(opening_key) {
            self.first_seen.push(opening_key.to_string());
        }
        self.buckets.entry(opening_key.to_string()).or_default()
    }
}

/// Accumulates classified game outcomes into per-color, per-opening
/// counters. Buckets only ever grow; skipped games never reach here.
#[derive(Debug, Default)]
pub struct OpeningAggregator {
    white: ColorStats,
    black: ColorStats,
}

impl OpeningAggregator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Count one outcome: `games` unconditionally, and exactly one of
    /// wins/losses/draws unless the result is unresolved.
    pub fn record(&mut self, outcome: &GameOutcome) {
        let bucket = self.stats_mut(outcome.color).bucket_mut(&outcome.opening_key);
        bucket.games += 1;
        match outcome.result {
            GameResultKind::Win => bucket.wins += 1,
            GameResultKind::Loss => bucket.losses += 1,
            GameResultKind::Draw => bucket.draws += 1,
            GameResultKind::Unknown => {}
        }
    }

    pub fn stats(&self, color: Color) -> &ColorStats {
        match color {
            Color::White => &self.white,
            Color::Black => &self.black,
        }
    }

    fn stats_mut(&mut self, color: Color) -> &mut ColorStats {
        match color {
            Color::White => &mut self.white,
            Color::Black => &mut self.black,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn outcome(color: Color, key: &str, result: GameResultKind) -> GameOutcome {
        GameOutcome {
            color,
            opening_key: key.to_string(),
            result,
        }
    }

    #[test]
    fn test_counts_split_by_color_and_key() {
        let mut aggregator = OpeningAggregator::new();
        aggregator.record(&outcome(Color::White, "B20 - Sicilian Defense", GameResultKind::Win));
        aggregator.record(&outcome(Color::White, "B20 - Sicilian Defense", GameResultKind::Loss));
        aggregator.record(&outcome(Color::Black, "B20 - Sicilian Defense", GameResultKind::Draw));

        let white = aggregator.stats(Color::White).get("B20 - Sicilian Defense").unwrap();
        assert_eq!((white.games, white.wins, white.losses, white.draws), (2, 1, 1, 0));

        let black = aggregator.stats(Color::Black).get("B20 - Sicilian Defense").unwrap();
        assert_eq!((black.games, black.wins, black.losses, black.draws), (1, 0, 0, 1));
    }

    #[test]
    fn test_unknown_result_counts_games_only() {
        let mut aggregator = OpeningAggregator::new();
        aggregator.record(&outcome(Color::White, "C00 - French Defense", GameResultKind::Unknown));
        aggregator.record(&outcome(Color::White, "C00 - French Defense", GameResultKind::Win));

        let bucket = aggregator.stats(Color::White).get("C00 - French Defense").unwrap();
        assert_eq!(bucket.games, 2);
        assert_eq!(bucket.wins + bucket.losses + bucket.draws, 1);
        assert!(bucket.games > bucket.wins + bucket.losses + bucket.draws);
    }

    #[test]
    fn test_decisive_buckets_balance_exactly() {
        let mut aggregator = OpeningAggregator::new();
        for result in [GameResultKind::Win, GameResultKind::Loss, GameResultKind::Draw] {
            aggregator.record(&outcome(Color::Black, "A04 - Zukertort Opening", result));
        }

        let bucket = aggregator.stats(Color::Black).get("A04 - Zukertort Opening").unwrap();
        assert_eq!(bucket.games, bucket.wins + bucket.losses + bucket.draws);
    }

    #[test]
    fn test_ranked_sorts_by_games_with_first_seen_ties() {
        let mut aggregator = OpeningAggregator::new();
        aggregator.record(&outcome(Color::White, "A00 - Rare", GameResultKind::Win));
        aggregator.record(&outcome(Color::White, "B20 - Sicilian Defense", GameResultKind::Win));
        aggregator.record(&outcome(Color::White, "B20 - Sicilian Defense", GameResultKind::Loss));
        aggregator.record(&outcome(Color::White, "C00 - French Defense", GameResultKind::Draw));

        let ranked = aggregator.stats(Color::White).ranked();
        let keys: Vec<&str> = ranked.iter().map(|(key, _)| *key).collect();
        // 2 games first, then the two single-game keys in first-seen order
        assert_eq!(keys, vec!["B20 - Sicilian Defense", "A00 - Rare", "C00 - French Defense"]);
    }

    #[test]
    fn test_win_rate() {
        let mut aggregator = OpeningAggregator::new();
        for _ in 0..3 {
            aggregator.record(&outcome(Color::White, "D02 - London System", GameResultKind::Win));
        }
        aggregator.record(&outcome(Color::White, "D02 - London System", GameResultKind::Loss));

        let bucket = aggregator.stats(Color::White).get("D02 - London System").unwrap();
        assert!((bucket.win_rate() - 75.0).abs() < 1e-9);
        assert_eq!(OpeningBucket::default().win_rate(), 0.0);
    }

    #[test]
    fn test_untouched_color_has_no_buckets() {
        let mut aggregator = OpeningAggregator::new();
        aggregator.record(&outcome(Color::White, "B20 - Sicilian Defense", GameResultKind::Win));

        assert!(aggregator.stats(Color::Black).is_empty());
        assert_eq!(aggregator.stats(Color::White).len(), 1);
    }
}

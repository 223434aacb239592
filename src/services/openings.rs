use anyhow::Result;
use log::info;

use crate::api::LichessClient;
use crate::config::settings::AppConfig;
use crate::openings::{OpeningAggregator, OpeningClassifier};

/// Opening statistics pipeline: stream recent games, classify each against
/// the subject, aggregate per-color buckets.
pub struct OpeningAnalysisService {
    config: AppConfig,
}

impl OpeningAnalysisService {
    pub fn new(config: AppConfig) -> Self {
        Self { config }
    }

    /// Analyze the subject's recent games.
    ///
    /// A record or move-text decoding failure aborts the run: a report over
    /// a silently truncated game set would mislead the caller, so no partial
    /// aggregate is returned. Games not involving the subject are skipped
    /// silently.
    pub async fn analyze(
        &self,
        client: &mut LichessClient,
        subject: &str,
        max_games: Option<usize>,
    ) -> Result<OpeningAggregator> {
        let max_games = max_games.unwrap_or(self.config.lichess.default_max_games);
        let classifier = OpeningClassifier::new(subject)?;

        let mut stream = client.stream_games(subject, max_games).await?;
        let mut aggregator = OpeningAggregator::new();
        let mut analyzed = 0usize;
        let mut skipped = 0usize;

        while let Some(record) = stream.next().await {
            match classifier.classify(&record?)? {
                Some(outcome) => {
                    aggregator.record(&outcome);
                    analyzed += 1;
                }
                None => skipped += 1,
            }
        }

        info!(
            "Aggregated {} games for {} ({} not involving the subject)",
            analyzed, subject, skipped
        );
        Ok(aggregator)
    }
}

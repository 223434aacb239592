use anyhow::{Context, Result};
use log::info;

use crate::config::settings::LichessSettings;
use crate::domain::RatingHistoryEntry;
use crate::http::RateLimitedClient;
use crate::openings::GameStream;

/// Lichess public API client.
pub struct LichessClient {
    client: RateLimitedClient,
    base_url: String,
}

impl LichessClient {
    pub fn new(settings: &LichessSettings) -> Result<Self> {
        let client = RateLimitedClient::new(
            settings.user_agent,
            settings.timeout_secs,
            settings.rate_limit_ms,
        )?;
        Ok(Self {
            client,
            base_url: settings.api_base_url.to_string(),
        })
    }

    /// Fetch the per-variant rating history for a user.
    ///
    /// The response is one entry per game variant, each carrying
    /// `(year, month, day, rating)` points with 0-based months.
    pub async fn fetch_rating_history(&mut self, username: &str) -> Result<Vec<RatingHistoryEntry>> {
        let url = self.build_rating_history_url(username);
        info!("Fetching rating history for {} from {}", username, url);

        let response = self.client.get(&url).await?;
        if !response.status().is_success() {
            anyhow::bail!("Lichess API returned status: {}", response.status());
        }

        response
            .json()
            .await
            .with_context(|| format!("Failed to parse rating history for {username}"))
    }

    /// Open the bulk game-history stream for a user.
    ///
    /// The returned [`GameStream`] is not restartable; consuming the games
    /// again requires a fresh call. Dropping it mid-way releases the
    /// connection.
    pub async fn stream_games(&mut self, username: &str, max_games: usize) -> Result<GameStream> {
        let url = self.build_games_url(username, max_games);
        info!("Streaming up to {} games for {}", max_games, username);

        let response = self.client.get_ndjson(&url).await?;
        if !response.status().is_success() {
            anyhow::bail!("Lichess API returned status: {}", response.status());
        }

        Ok(GameStream::new(response))
    }

    // --- Helper Methods ---

    fn build_rating_history_url(&self, username: &str) -> String {
        format!(
            "{}/user/{}/rating-history",
            self.base_url,
            urlencoding::encode(username)
        )
    }

    fn build_games_url(&self, username: &str, max_games: usize) -> String {
        format!(
            "{}/games/user/{}?max={}&moves=false&pgnInJson=true&opening=true&clocks=false&evals=false&perfType=all",
            self.base_url,
            urlencoding::encode(username),
            max_games
        )
    }
}

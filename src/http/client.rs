use anyhow::{Context, Result};
use reqwest::Client;
use reqwest::header::ACCEPT;
use std::time::Duration;
use tokio::time::{Instant, sleep_until};

/// HTTP client with built-in request pacing to stay under the Lichess
/// public API rate limits.
pub struct RateLimitedClient {
    client: Client,
    pacer: RequestPacer,
}

impl RateLimitedClient {
    pub fn new(user_agent: &str, timeout_secs: u64, rate_limit_ms: u64) -> Result<Self> {
        let client = Self::build_client(user_agent, timeout_secs)?;
        Ok(Self {
            client,
            pacer: RequestPacer::new(rate_limit_ms),
        })
    }

    pub async fn get(&mut self, url: &str) -> Result<reqwest::Response> {
        self.pacer.pace().await;
        self.client
            .get(url)
            .send()
            .await
            .context("Failed to send GET request")
    }

    /// GET requesting a newline-delimited JSON body.
    pub async fn get_ndjson(&mut self, url: &str) -> Result<reqwest::Response> {
        self.pacer.pace().await;
        self.client
            .get(url)
            .header(ACCEPT, "application/x-ndjson")
            .send()
            .await
            .context("Failed to send NDJSON GET request")
    }

    fn build_client(user_agent: &str, timeout_secs: u64) -> Result<Client> {
        Client::builder()
            .user_agent(user_agent)
            .timeout(Duration::from_secs(timeout_secs))
            .build()
            .context("Failed to build HTTP client")
    }
}

/// Enforces a minimum delay between consecutive requests.
struct RequestPacer {
    delay: Duration,
    earliest_next: Option<Instant>,
}

impl RequestPacer {
    fn new(delay_ms: u64) -> Self {
        Self {
            delay: Duration::from_millis(delay_ms),
            earliest_next: None,
        }
    }

    async fn pace(&mut self) {
        if let Some(earliest) = self.earliest_next {
            sleep_until(earliest).await;
        }
        self.earliest_next = Some(Instant::now() + self.delay);
    }
}

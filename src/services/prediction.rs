use anyhow::{Result, anyhow};
use log::info;

use crate::api::LichessClient;
use crate::config::settings::AppConfig;
use crate::domain::RatingSample;
use crate::errors::AnalyticsError;
use crate::prediction::RatingPredictor;

/// Rating trajectory pipeline: normalize samples, fit the logistic curve,
/// project it forward.
pub struct PredictionService {
    config: AppConfig,
}

impl PredictionService {
    pub fn new(config: AppConfig) -> Self {
        Self { config }
    }

    /// Project `horizon_months` future ratings from raw history samples.
    ///
    /// Pure: builds a fresh per-request predictor and discards it. Core
    /// error kinds propagate unmodified for the caller to translate.
    pub fn predict(
        &self,
        samples: &[RatingSample],
        horizon_months: usize,
    ) -> Result<Vec<f64>, AnalyticsError> {
        let mut predictor = RatingPredictor::new(self.config.fitter.clone());
        predictor.train(samples)?;
        predictor.predict_next(horizon_months)
    }

    /// Fetch one variant's rating history for a user and project it.
    pub async fn predict_variant(
        &self,
        client: &mut LichessClient,
        username: &str,
        variant: &str,
        horizon_months: Option<usize>,
    ) -> Result<Vec<f64>> {
        let history = client.fetch_rating_history(username).await?;
        let entry = history
            .iter()
            .find(|entry| entry.name.eq_ignore_ascii_case(variant))
            .ok_or_else(|| anyhow!("No rating history for variant '{variant}'"))?;

        let samples = entry.samples();
        info!(
            "Projecting {} ratings from {} {} samples",
            username,
            samples.len(),
            entry.name
        );

        let horizon = horizon_months.unwrap_or(self.config.fitter.default_horizon_months);
        Ok(self.predict(&samples, horizon)?)
    }
}

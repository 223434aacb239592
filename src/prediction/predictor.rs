use log::info;

use super::fitter;
use super::logistic::LogisticModel;
use super::normalize;
use crate::config::settings::FitterSettings;
use crate::domain::RatingSample;
use crate::errors::AnalyticsError;

/// Per-request rating predictor: normalizes raw samples, fits the logistic
/// model and projects it into the future.
///
/// Each prediction request constructs, trains and discards its own instance;
/// there is no shared fitted-model state across requests.
pub struct RatingPredictor {
    settings: FitterSettings,
    model: Option<LogisticModel>,
}

impl RatingPredictor {
    pub fn new(settings: FitterSettings) -> Self {
        Self {
            settings,
            model: None,
        }
    }

    /// Normalize and fit. On success the predictor holds a model for
    /// [`predict_next`](Self::predict_next); on failure it holds none.
    pub fn train(&mut self, samples: &[RatingSample]) -> Result<(), AnalyticsError> {
        self.model = None;
        let series = normalize::normalize(samples)?;
        let model = fitter::fit(&series, &self.settings)?;
        info!(
            "Trained logistic model: L={:.1} k={:.4} t0={:.2}",
            model.l, model.k, model.t0
        );
        self.model = Some(model);
        Ok(())
    }

    pub fn model(&self) -> Option<&LogisticModel> {
        self.model.as_ref()
    }

    /// Evaluate the fitted curve at `n_months` future months, one month
    /// apart, starting one month after the last training sample.
    ///
    /// Every value is clipped to the configured ceiling. The asymptote is
    /// already bounded by it, so the clip is an invariant, not a correction.
    pub fn predict_next(&self, n_months: usize) -> Result<Vec<f64>, AnalyticsError> {
        let model = self.model.as_ref().ok_or(AnalyticsError::ModelNotFitted)?;
        let ceiling = self.settings.rating_ceiling;

        let predictions = (1..=n_months)
            .map(|offset| {
                let t = model.t_max + offset as f64;
                model.evaluate(t).min(ceiling)
            })
            .collect();

        Ok(predictions)
    }
}

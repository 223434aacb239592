use chrono::NaiveDate;
use ndarray::Array1;

use crate::domain::RatingSample;
use crate::errors::AnalyticsError;

pub const MIN_SAMPLES: usize = 5;

/// Rating samples on a numeric time axis: fractional months since the
/// earliest sample, sorted ascending by calendar date.
#[derive(Debug, Clone)]
pub struct NormalizedSeries {
    times: Array1<f64>,
    ratings: Array1<f64>,
}

impl NormalizedSeries {
    pub fn len(&self) -> usize {
        self.times.len()
    }

    pub fn is_empty(&self) -> bool {
        self.times.is_empty()
    }

    pub fn times(&self) -> &Array1<f64> {
        &self.times
    }

    pub fn ratings(&self) -> &Array1<f64> {
        &self.ratings
    }

    pub fn t_min(&self) -> f64 {
        self.times[0]
    }

    pub fn t_max(&self) -> f64 {
        self.times[self.times.len() - 1]
    }

    pub fn max_rating(&self) -> f64 {
        self.ratings.iter().copied().fold(f64::MIN, f64::max)
    }

    /// Median of the time axis (times are already sorted).
    pub fn median_time(&self) -> f64 {
        let n = self.times.len();
        if n % 2 == 1 {
            self.times[n / 2]
        } else {
            (self.times[n / 2 - 1] + self.times[n / 2]) / 2.0
        }
    }
}

/// Convert raw `(year, month, day, rating)` samples into a [`NormalizedSeries`].
///
/// Input months are 0-based (0 = January). Samples are sorted ascending by
/// calendar date with a stable sort, so samples sharing a date keep their
/// relative input order. The caller's slice is never mutated.
pub fn normalize(samples: &[RatingSample]) -> Result<NormalizedSeries, AnalyticsError> {
    if samples.len() < MIN_SAMPLES {
        return Err(AnalyticsError::InsufficientData {
            got: samples.len(),
            needed: MIN_SAMPLES,
        });
    }

    let mut dated: Vec<(NaiveDate, f64)> = Vec::with_capacity(samples.len());
    for sample in samples {
        let date = build_date(sample)?;
        dated.push((date, sample.rating as f64));
    }

    // sort_by_key is stable
    dated.sort_by_key(|(date, _)| *date);

    let min_date = dated[0].0;
    let times: Array1<f64> = dated
        .iter()
        .map(|(date, _)| (*date - min_date).num_days() as f64 / 30.0)
        .collect();
    let ratings: Array1<f64> = dated.iter().map(|(_, rating)| *rating).collect();

    Ok(NormalizedSeries { times, ratings })
}

/// The wire format uses 0-based months; shift to calendar months before
/// building the date. Invalid components (e.g. April 31) are rejected
/// outright rather than wrapped into the next month.
fn build_date(sample: &RatingSample) -> Result<NaiveDate, AnalyticsError> {
    let month = sample.month + 1;
    NaiveDate::from_ymd_opt(sample.year, month, sample.day).ok_or(AnalyticsError::InvalidSample {
        year: sample.year,
        month,
        day: sample.day,
    })
}

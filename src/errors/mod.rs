use thiserror::Error;

/// Failure kinds of the analytics core.
///
/// Every variant surfaces to the immediate caller unmodified; none are
/// retried internally. The CLI boundary translates them into user-facing
/// messages via anyhow context.
#[derive(Debug, Error)]
pub enum AnalyticsError {
    /// Fewer rating samples than the fitter minimum.
    #[error("not enough rating samples: got {got}, need at least {needed}")]
    InsufficientData { got: usize, needed: usize },

    /// A sample's calendar components do not form a valid date.
    #[error("invalid rating sample date: {year}-{month}-{day}")]
    InvalidSample { year: i32, month: u32, day: u32 },

    /// The optimizer exhausted its iteration budget without converging.
    #[error("logistic fit did not converge within {iterations} iterations")]
    FitDivergence { iterations: usize },

    /// A projection was requested before a successful fit.
    #[error("model is not trained yet")]
    ModelNotFitted,

    /// A line of the NDJSON game stream could not be decoded.
    #[error("malformed game record: {reason}")]
    MalformedRecord { reason: String },

    /// A game's move-text carried no parseable header tags.
    #[error("unparseable move-text for game {game_id}")]
    UnparseableGame { game_id: String },
}

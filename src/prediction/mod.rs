pub mod fitter;
pub mod logistic;
pub mod normalize;
pub mod predictor;

pub use logistic::LogisticModel;
pub use normalize::NormalizedSeries;
pub use predictor::RatingPredictor;

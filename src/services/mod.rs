pub mod openings;
pub mod prediction;

pub use openings::OpeningAnalysisService;
pub use prediction::PredictionService;

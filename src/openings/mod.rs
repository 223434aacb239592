pub mod aggregator;
pub mod classifier;
pub mod stream;

pub use aggregator::{ColorStats, OpeningAggregator};
pub use classifier::OpeningClassifier;
pub use stream::GameStream;

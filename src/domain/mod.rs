pub mod models;

pub use models::{
    Color, GameOutcome, GameRecord, GameResultKind, OpeningBucket, RatingHistoryEntry,
    RatingSample,
};

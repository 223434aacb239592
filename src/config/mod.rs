pub mod settings;

pub use settings::{AppConfig, FitterSettings, LichessSettings};

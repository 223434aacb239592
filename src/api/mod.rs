pub mod lichess_client;

pub use lichess_client::LichessClient;

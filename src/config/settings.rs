#[derive(Debug, Clone)]
pub struct FitterSettings {
    pub rating_ceiling: f64,
    pub min_samples: usize,
    pub max_iterations: usize,
    pub gradient_tolerance: f64,
    pub default_horizon_months: usize,
}

impl Default for FitterSettings {
    fn default() -> Self {
        Self {
            rating_ceiling: 2700.0,
            min_samples: 5,
            max_iterations: 10_000,
            gradient_tolerance: 1e-6,
            default_horizon_months: 60,
        }
    }
}

#[derive(Debug, Clone)]
pub struct LichessSettings {
    pub api_base_url: &'static str,
    pub user_agent: &'static str,
    pub timeout_secs: u64,
    pub rate_limit_ms: u64,
    pub default_max_games: usize,
}

impl Default for LichessSettings {
    fn default() -> Self {
        Self {
            api_base_url: "https://lichess.org/api",
            user_agent: "ChessInsights/0.1",
            timeout_secs: 30,
            rate_limit_ms: 100, // 10 req/sec
            default_max_games: 100,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct AppConfig {
    pub fitter: FitterSettings,
    pub lichess: LichessSettings,
}

impl AppConfig {
    pub fn new() -> Self {
        Self::default()
    }
}

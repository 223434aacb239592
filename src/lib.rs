pub mod api;
pub mod cli;
pub mod config;
pub mod domain;
pub mod errors;
pub mod http;
pub mod openings;
pub mod prediction;
pub mod services;

use anyhow::Result;
use clap::Parser;
use cli::Cli;

use crate::api::LichessClient;
use crate::cli::Command;
use crate::config::settings::AppConfig;
use crate::domain::Color;
use crate::openings::OpeningAggregator;
use crate::services::{OpeningAnalysisService, PredictionService};

pub fn interpret() -> Command {
    let cli = Cli::parse();
    cli.command
}

pub fn handle_predict(username: &str, variant: &str, months: Option<usize>) -> Result<()> {
    let runtime = tokio::runtime::Runtime::new()?;
    runtime.block_on(async {
        let config = AppConfig::new();
        let mut client = LichessClient::new(&config.lichess)?;
        let service = PredictionService::new(config);

        let predictions = service
            .predict_variant(&mut client, username, variant, months)
            .await?;
        print_trajectory(variant, &predictions);
        Ok(())
    })
}

pub fn handle_openings(username: &str, max_games: Option<usize>) -> Result<()> {
    let runtime = tokio::runtime::Runtime::new()?;
    runtime.block_on(async {
        let config = AppConfig::new();
        let mut client = LichessClient::new(&config.lichess)?;
        let service = OpeningAnalysisService::new(config);

        let stats = service.analyze(&mut client, username, max_games).await?;
        print_opening_stats(&stats);
        Ok(())
    })
}

fn print_trajectory(variant: &str, predictions: &[f64]) {
    println!("Projected {variant} rating trajectory:");
    for (offset, rating) in predictions.iter().enumerate() {
        println!("  +{:>2} months: {:.0}", offset + 1, rating);
    }
}

fn print_opening_stats(stats: &OpeningAggregator) {
    for color in [Color::White, Color::Black] {
        println!("\nOpening statistics for {} games:", color.as_str());
        for (opening, bucket) in stats.stats(color).ranked() {
            println!(
                "  {}: Games={}, Wins={}, Losses={}, Draws={}, WinRate={:.1}%",
                opening,
                bucket.games,
                bucket.wins,
                bucket.losses,
                bucket.draws,
                bucket.win_rate()
            );
        }
    }
}

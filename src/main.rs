use anyhow::Result;

use chess_insights::cli::Command;
use chess_insights::{handle_openings, handle_predict, interpret};

fn main() {
    setup_logging();
    parse_and_execute().unwrap_or_else(|e| {
        eprintln!("Error: {e}");
        std::process::exit(1);
    });
}

fn setup_logging() {
    sensible_env_logger::init!();
}

fn parse_and_execute() -> Result<()> {
    let command = interpret();
    execute_command(&command)
}

fn execute_command(command: &Command) -> Result<()> {
    match command {
        Command::Predict {
            username,
            variant,
            months,
        } => handle_predict(username, variant, *months),
        Command::Openings { username, max } => handle_openings(username, *max),
    }
}

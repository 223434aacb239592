use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(author, version, about = "chess-insights analytics backend")]
pub struct Cli {
    /// Command
    #[clap(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone, PartialEq)]
#[clap(rename_all = "lower_case")]
pub enum Command {
    /// Project a player's future rating trajectory for one game variant
    Predict {
        /// Lichess username
        username: String,
        /// Game variant, e.g. Blitz or Rapid
        #[arg(short, long, default_value = "Blitz")]
        variant: String,
        /// Projection horizon in months (defaults to 60)
        #[arg(short, long)]
        months: Option<usize>,
    },
    /// Break down opening performance per color over recent games
    Openings {
        /// Lichess username
        username: String,
        /// Maximum number of recent games to analyze (defaults to 100)
        #[arg(short, long)]
        max: Option<usize>,
    },
}

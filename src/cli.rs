//! Command-line interface for proposal_game.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Proposal Game - a riddle, a photo and one question
#[derive(Parser, Debug)]
#[command(name = "proposal_game")]
#[command(about = "Stage-driven proposal game in the terminal", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Subcommand to run
    #[command(subcommand)]
    pub command: Command,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Play the proposal flow in the terminal
    Play {
        /// Path to the TOML config (defaults are used if it does not exist)
        #[arg(short, long, default_value = "proposal_game.toml")]
        config: PathBuf,

        /// Override the recipient name
        #[arg(long)]
        recipient: Option<String>,

        /// Image file served as the camera feed
        #[arg(long)]
        still_image: Option<PathBuf>,
    },

    /// Print the resolved configuration as TOML
    PrintConfig {
        /// Path to the TOML config (defaults are used if it does not exist)
        #[arg(short, long, default_value = "proposal_game.toml")]
        config: PathBuf,
    },
}

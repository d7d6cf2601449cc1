//! Proposal Game - CLI entry point.

#![warn(missing_docs)]

mod cli;

use std::path::Path;

use anyhow::Result;
use clap::Parser;
use cli::{Cli, Command};
use proposal_game::{GameConfig, run_tui};

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    // Load .env file
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    match cli.command {
        Command::Play {
            config,
            recipient,
            still_image,
        } => {
            let mut config = load_config(&config)?;
            if let Some(recipient) = recipient {
                config = config.with_recipient(recipient);
            }
            if let Some(path) = still_image {
                let camera = config.camera().clone().with_still_image(path);
                config = config.with_camera(camera);
            }
            run_tui(config).await
        }
        Command::PrintConfig { config } => {
            let config = load_config(&config)?;
            print!("{}", config.to_toml()?);
            Ok(())
        }
    }
}

fn load_config(path: &Path) -> Result<GameConfig> {
    Ok(GameConfig::load_or_default(path)?)
}

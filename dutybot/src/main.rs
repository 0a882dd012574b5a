mod commands;
mod config;
mod render;
mod slack;

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing::info;

use crate::config::{open_config, write_default_config};

#[derive(Parser)]
#[command(name = "dutybot")]
#[command(about = "Posts the daily on-duty roster to Slack and announces schedule changes")]
struct Cli {
    #[arg(long, default_value = "dutybot.toml")]
    config: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Write a default configuration file and exit
    Init,

    /// Run the scheduler: periodic change checks plus the daily roster post
    Run,

    /// Post the duty roster for one day and exit
    Roster {
        /// Day to post (YYYY-MM-DD); defaults to today
        #[arg(long)]
        date: Option<String>,
    },

    /// Fetch and parse the feed once, printing today's roster
    Check,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Init => {
            write_default_config(&cli.config)?;
            info!(path = ?cli.config, "Created default configuration");
            Ok(())
        }
        Commands::Run => {
            let config = open_config(&cli.config)?;
            commands::run::run(config).await
        }
        Commands::Roster { date } => {
            let config = open_config(&cli.config)?;
            commands::roster::run(config, date).await
        }
        Commands::Check => {
            let config = open_config(&cli.config)?;
            commands::check::run(config).await
        }
    }
}

//! Headless agent that tracks municipal waste pickups for one address and
//! keeps the derived next-pickup facts fresh on a daily schedule.

mod agent;
mod config;

use anyhow::Result;
use clap::{Parser, Subcommand};
use reqwest::Client;
use tracing_subscriber::EnvFilter;

use crate::agent::Agent;
use crate::config::Config;

#[derive(Parser)]
#[command(name = "renova-agent")]
#[command(about = "Tracks municipal waste pickups and derives next-pickup facts", long_about = None)]
struct Cli {
    /// Path to the configuration file
    #[arg(long, global = true)]
    config: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the daily refresh schedule in the foreground
    Run,
    /// Run a single refresh cycle and report the outcome
    Refresh,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Configuration first: a broken config should fail before anything else
    // starts.
    let config = Config::load(cli.config.clone())?;

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let client = Client::builder().user_agent("renova/0.1").build()?;
    let service = renova_provider_norkart::service(client, config.norkart());
    let agent = Agent::new(service, &config)?;

    match cli.command {
        Commands::Run => agent.run().await,
        Commands::Refresh => agent.refresh_once().await,
    }
}

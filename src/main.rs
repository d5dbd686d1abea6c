mod commands;
mod config;
mod domain;
mod infrastructure;
mod relay;
mod services;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use config::{Cli, Command};

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("nowplaying_bridge=info")),
        )
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Command::Scrape(config) => commands::scrape::run(config).await,
        Command::Relay(config) => commands::relay::run(config).await,
    };

    if let Err(e) = result {
        tracing::error!("{e}");
        std::process::exit(1);
    }
}

use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;
use std::time::Duration;

use clap::{Args, Parser, Subcommand};

use crate::domain::selectors::{PlayerSelectors, Selectors};
use crate::services::error::Result;
use crate::services::poller::POLL_INTERVAL;

/// Relays "now playing" metadata from a web music player to a local HTTP relay.
#[derive(Debug, Parser)]
#[command(name = "nowplaying-bridge", version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Poll the player page and push track state to the relay
    Scrape(ScrapeConfig),
    /// Run the relay that stores and serves the latest track
    Relay(RelayConfig),
}

#[derive(Debug, Clone, Args)]
pub struct ScrapeConfig {
    /// `file:<path>`, a bare path, or an `http(s)://` URL serving the player document
    #[arg(long, env = "SNAPSHOT_SOURCE")]
    pub source: String,

    #[arg(long, env = "RELAY_URL", default_value = "http://localhost:3000")]
    pub relay_url: String,

    #[arg(
        long,
        env = "POLL_INTERVAL_MS",
        default_value_t = POLL_INTERVAL.as_millis() as u64,
        value_parser = clap::value_parser!(u64).range(1..)
    )]
    pub interval_ms: u64,

    /// TOML file overriding the default player selectors
    #[arg(long, env = "SELECTORS_FILE")]
    pub selectors: Option<PathBuf>,
}

impl ScrapeConfig {
    pub fn interval(&self) -> Duration {
        Duration::from_millis(self.interval_ms)
    }

    pub fn load_selectors(&self) -> Result<PlayerSelectors> {
        let selectors = match &self.selectors {
            Some(path) => Selectors::load(path)?,
            None => Selectors::default(),
        };
        selectors.compile()
    }
}

#[derive(Debug, Clone, Args)]
pub struct RelayConfig {
    #[arg(long, env = "RELAY_BIND", default_value = "127.0.0.1")]
    pub bind: IpAddr,

    #[arg(long, env = "RELAY_PORT", default_value_t = 3000)]
    pub port: u16,
}

impl RelayConfig {
    pub fn addr(&self) -> SocketAddr {
        SocketAddr::new(self.bind, self.port)
    }
}

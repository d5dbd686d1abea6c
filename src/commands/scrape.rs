use std::sync::Arc;

use reqwest::Client;

use crate::config::ScrapeConfig;
use crate::infrastructure::relay_client::RelayClient;
use crate::infrastructure::source::open_source;
use crate::services::error::Result;
use crate::services::extractor::Extractor;
use crate::services::poller::Poller;

pub async fn run(config: ScrapeConfig) -> Result<()> {
    let selectors = config.load_selectors()?;
    let http = Client::new();

    let source = open_source(&config.source, http.clone());
    let publisher = RelayClient::new(http, &config.relay_url);
    tracing::info!("Pushing track updates to {}", publisher.endpoint());

    let handle = Poller::new(
        source,
        Extractor::new(selectors),
        Arc::new(publisher),
        config.interval(),
    )
    .spawn();

    tokio::signal::ctrl_c().await?;
    tracing::info!("Shutting down scraper...");
    handle.stop();
    handle.join().await;
    Ok(())
}

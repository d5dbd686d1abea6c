use tokio::net::TcpListener;

use crate::config::RelayConfig;
use crate::relay::server::serve;
use crate::relay::store::new_store;
use crate::services::error::Result;

pub async fn run(config: RelayConfig) -> Result<()> {
    let addr = config.addr();
    let listener = TcpListener::bind(addr).await?;

    tracing::info!("Now Playing relay listening on http://{addr}");
    tracing::info!("  POST http://{addr}/update-track");
    tracing::info!("  GET  http://{addr}/now-playing");

    serve(listener, new_store(), async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to listen for shutdown signal: {e}");
            return;
        }
        tracing::info!("Shutting down relay gracefully...");
    })
    .await?;
    Ok(())
}

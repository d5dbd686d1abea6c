//! # Relay server
//!
//! Holds the latest pushed track and serves it to display clients.
//!
//! | Path | Description |
//! |------|-------------|
//! | `POST /update-track` | Replace the stored track (`title` required) |
//! | `GET /now-playing` | The stored track plus `lastUpdated` |
//! | `GET /` | Service status summary |

use std::any::Any;
use std::future::Future;

use axum::body::Bytes;
use axum::extract::State;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::{Value, json};
use tokio::net::TcpListener;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::cors::CorsLayer;

use crate::relay::error::RelayError;
use crate::relay::store::{NowPlaying, RelayStore};

pub fn router(store: RelayStore) -> Router {
    Router::new()
        .route("/", get(handle_status))
        .route("/update-track", post(handle_update))
        .route("/now-playing", get(handle_now_playing))
        .layer(CatchPanicLayer::custom(handle_panic))
        .layer(CorsLayer::permissive())
        .with_state(store)
}

/// Serves the relay on `listener` until `shutdown` resolves.
pub async fn serve<F>(listener: TcpListener, store: RelayStore, shutdown: F) -> std::io::Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    axum::serve(listener, router(store))
        .with_graceful_shutdown(shutdown)
        .await
}

async fn handle_update(
    State(store): State<RelayStore>,
    body: Bytes,
) -> Result<Json<Value>, RelayError> {
    let body: Value =
        serde_json::from_slice(&body).map_err(|e| RelayError::InvalidJson(e.to_string()))?;
    let record = NowPlaying::from_update(&body)?;

    tracing::info!(
        "Track updated: \"{}\" by {} (Playing: {})",
        record.track.title,
        record.track.artist,
        record.track.is_playing
    );
    *store.write().await = record;

    Ok(Json(json!({
        "success": true,
        "message": "Track data updated successfully",
    })))
}

async fn handle_now_playing(State(store): State<RelayStore>) -> Json<NowPlaying> {
    Json(store.read().await.clone())
}

async fn handle_status(State(store): State<RelayStore>) -> Json<Value> {
    let current = store.read().await.track.title.clone();
    Json(json!({
        "service": "Now Playing Relay",
        "status": "running",
        "currentTrack": current,
        "endpoints": {
            "updateTrack": "POST /update-track",
            "getNowPlaying": "GET /now-playing",
        },
    }))
}

fn handle_panic(_: Box<dyn Any + Send + 'static>) -> Response {
    tracing::error!("Relay handler panicked");
    RelayError::Internal.into_response()
}

use async_trait::async_trait;
use reqwest::Client;

use crate::domain::track::TrackState;

/// Delivers a track state somewhere. Implementations never fail loudly: the
/// next tick is the retry.
#[async_trait]
pub trait Publisher: Send + Sync {
    async fn publish(&self, state: &TrackState);
}

pub struct RelayClient {
    http: Client,
    endpoint: String,
}

impl RelayClient {
    pub fn new(http: Client, base_url: &str) -> Self {
        let endpoint = format!("{}/update-track", base_url.trim_end_matches('/'));
        Self { http, endpoint }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl Publisher for RelayClient {
    async fn publish(&self, state: &TrackState) {
        let resp = match self.http.post(&self.endpoint).json(state).send().await {
            Ok(r) => r,
            Err(e) => {
                // The relay may be offline for long stretches; stay quiet.
                tracing::debug!("Relay unreachable: {e}");
                return;
            }
        };

        let status = resp.status();
        if status.is_success() {
            tracing::debug!("Track data sent: {}", state.title);
        } else {
            tracing::warn!("Relay responded with error: {status}");
        }
    }
}

use std::path::PathBuf;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;

use crate::services::error::{BridgeError, Result};

const FETCH_TIMEOUT: Duration = Duration::from_secs(2);

/// Hands over the current serialized player document on demand.
#[async_trait]
pub trait SnapshotSource: Send + Sync {
    /// Whether the page has finished its structural load.
    async fn is_ready(&self) -> bool;

    async fn fetch(&self) -> Result<String>;

    fn describe(&self) -> String;
}

/// An HTML dump that a browser helper keeps overwriting.
pub struct FileSource {
    path: PathBuf,
}

impl FileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl SnapshotSource for FileSource {
    async fn is_ready(&self) -> bool {
        tokio::fs::try_exists(&self.path).await.unwrap_or(false)
    }

    async fn fetch(&self) -> Result<String> {
        Ok(tokio::fs::read_to_string(&self.path).await?)
    }

    fn describe(&self) -> String {
        format!("file {}", self.path.display())
    }
}

/// A helper endpoint serving the live document over HTTP.
pub struct HttpSource {
    http: Client,
    url: String,
}

impl HttpSource {
    pub fn new(http: Client, url: String) -> Self {
        Self { http, url }
    }
}

#[async_trait]
impl SnapshotSource for HttpSource {
    // Helper endpoints only promise GET, so readiness costs one full fetch.
    // It only runs until the first success, before the startup scrape.
    async fn is_ready(&self) -> bool {
        self.fetch().await.is_ok()
    }

    async fn fetch(&self) -> Result<String> {
        let resp = self
            .http
            .get(&self.url)
            .timeout(FETCH_TIMEOUT)
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            return Err(BridgeError::Status(status));
        }

        Ok(resp.text().await?)
    }

    fn describe(&self) -> String {
        format!("url {}", self.url)
    }
}

/// Picks a source from `file:<path>`, an `http(s)://` URL, or a bare path.
pub fn open_source(location: &str, http: Client) -> Box<dyn SnapshotSource> {
    if location.starts_with("http://") || location.starts_with("https://") {
        Box::new(HttpSource::new(http, location.to_string()))
    } else {
        let path = location.strip_prefix("file:").unwrap_or(location);
        Box::new(FileSource::new(path))
    }
}

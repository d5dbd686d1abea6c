pub type Result<T> = std::result::Result<T, BridgeError>;

#[derive(Debug, thiserror::Error)]
pub enum BridgeError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("Snapshot source returned status {0}")]
    Status(reqwest::StatusCode),
    #[error("Invalid selector `{0}`")]
    Selector(String),
    #[error("Configuration error: {0}")]
    Config(String),
}

use thiserror::Error;

#[derive(Error, Debug)]
pub enum GameError {
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
    #[error("Provider error: {0}")]
    Provider(String),
    /// A shared computation failed; carries the message seen by every waiter.
    #[error("{0}")]
    Upstream(String),
    #[error("Request timed out after {0} seconds")]
    Timeout(u64),
    #[error("Configuration error: {0}")]
    Config(String),
    #[error("{0}")]
    Other(String),
}

pub type Result<T> = std::result::Result<T, GameError>;

use std::time::Duration;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SubtranError {
    #[error("Language detection failed: {0}")]
    Detection(String),

    #[error("Translation failed: {0}")]
    Translation(String),

    #[error("Translation timed out after {0:?}")]
    Timeout(Duration),

    #[error("API error: {0}")]
    Api(String),

    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl SubtranError {
    /// Whether this error aborts a whole run rather than a single line.
    pub fn is_fatal(&self) -> bool {
        matches!(self, SubtranError::Io(_) | SubtranError::Config(_))
    }
}

pub type Result<T> = std::result::Result<T, SubtranError>;

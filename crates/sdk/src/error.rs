//! SDK Error Types

use serde::Deserialize;
use thiserror::Error;

/// SDK Result type
pub type Result<T> = std::result::Result<T, SdkError>;

/// SDK Error
#[derive(Debug, Error)]
pub enum SdkError {
    #[error("Connection error: {0}")]
    Connection(String),

    #[error("API error ({status}): {message}")]
    Api {
        status: u16,
        message: String,
        field: Option<String>,
    },

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    #[error("Transport error: {0}")]
    Transport(String),
}

impl SdkError {
    /// HTTP status of an API error, if the server answered
    pub fn status(&self) -> Option<u16> {
        match self {
            SdkError::Api { status, .. } => Some(*status),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for SdkError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_connect() {
            SdkError::Connection(e.to_string())
        } else if e.is_decode() {
            SdkError::Transport(format!("Failed to decode response: {}", e))
        } else {
            SdkError::Transport(e.to_string())
        }
    }
}

/// Error body returned by the server
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ErrorBody {
    pub message: String,
    #[serde(default)]
    pub field: Option<String>,
}

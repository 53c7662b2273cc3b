use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ClientError {
    /// Local input check failed; nothing was sent.
    #[error("{0}")]
    Validation(String),
    /// The service answered with `success: false`.
    #[error("service rejected request: {}", message.as_deref().unwrap_or("no message"))]
    Service { message: Option<String> },
    #[error("service returned HTTP {status}")]
    Status { status: u16 },
    #[error("transport failure: {0}")]
    Transport(String),
    #[error("invalid server url '{url}': {reason}")]
    InvalidServerUrl { url: String, reason: String },
    #[error("failed to read '{}': {reason}", path.display())]
    Import { path: PathBuf, reason: String },
    #[error("failed to write '{}': {source}", path.display())]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },
}

impl From<reqwest::Error> for ClientError {
    fn from(value: reqwest::Error) -> Self {
        match value.status() {
            Some(status) => Self::Status {
                status: status.as_u16(),
            },
            None => Self::Transport(value.to_string()),
        }
    }
}

impl ClientError {
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }
}

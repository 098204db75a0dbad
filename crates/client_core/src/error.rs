use shared::{domain::UserId, error::ErrorCategory, error::ValidationError};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("request to {url} failed: {source}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("{message}")]
    Status {
        status: u16,
        url: String,
        message: String,
    },
    #[error("malformed response from {url}: {reason}")]
    MalformedBody { url: String, reason: String },
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error("user {0} is not on the loaded page")]
    UnknownUser(UserId),
}

impl ClientError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            ClientError::Transport { .. } => ErrorCategory::Transport,
            ClientError::Status { .. } => ErrorCategory::HttpStatus,
            ClientError::MalformedBody { .. } => ErrorCategory::MalformedBody,
            ClientError::Validation(_) | ClientError::UnknownUser(_) => ErrorCategory::Validation,
        }
    }

    pub fn status(&self) -> Option<u16> {
        match self {
            ClientError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// 4xx answers. Reported only; nothing retries on either class.
    pub fn is_client_error(&self) -> bool {
        self.status().is_some_and(|status| (400..500).contains(&status))
    }

    pub fn is_server_error(&self) -> bool {
        self.status().is_some_and(|status| status >= 500)
    }
}

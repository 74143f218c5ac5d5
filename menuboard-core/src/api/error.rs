//! Backend client error types.

use thiserror::Error;

/// Errors that can occur while talking to the menu backend.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Connection refused, DNS failure, timeout and similar
    #[error("Connection error: {0}")]
    Transport(String),

    /// The backend answered with a non-2xx status
    #[error("Server returned status {status}: {body}")]
    Status { status: u16, body: String },

    /// The response body did not have the expected shape
    #[error("Unexpected response: {0}")]
    Decode(String),
}

impl ApiError {
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }

    pub fn is_not_found(&self) -> bool {
        self.status() == Some(404)
    }
}

impl From<reqwest::Error> for ApiError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_decode() {
            ApiError::Decode(e.to_string())
        } else {
            ApiError::Transport(e.to_string())
        }
    }
}

pub type ApiResult<T> = Result<T, ApiError>;

// SPDX-FileCopyrightText: 2025 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! Error types for the registry client.

use std::time::Duration;
use thiserror::Error;

/// Pipeline stage an error is attributed to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    /// Client or governor construction
    Configuration,
    /// Waiting for or taking a permit
    Acquire,
    /// Document serialization
    Encode,
    /// HTTP submission
    Submit,
}

impl std::fmt::Display for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Configuration => write!(f, "configuration"),
            Self::Acquire => write!(f, "acquire"),
            Self::Encode => write!(f, "encode"),
            Self::Submit => write!(f, "submit"),
        }
    }
}

/// Document could not be turned into a payload.
#[derive(Debug, Error)]
pub enum EncodingError {
    #[error("Missing required field: {0}")]
    MissingField(&'static str),

    #[error("Serialization failed: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// The POST did not produce a successful response.
#[derive(Debug, Error)]
pub enum TransportError {
    #[error("Request timed out")]
    Timeout,

    #[error("Registry responded with status {status}")]
    Status { status: u16, body: String },

    #[error("Request failed: {0}")]
    Request(String),
}

impl From<reqwest::Error> for TransportError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            TransportError::Timeout
        } else {
            TransportError::Request(err.to_string())
        }
    }
}

/// Client error types
#[derive(Debug, Error)]
pub enum Error {
    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),

    #[error("Rate limited, retry after {retry_after:?}")]
    RateLimited { retry_after: Duration },

    #[error("Encoding error: {0}")]
    Encoding(#[from] EncodingError),

    #[error("Transport error: {0}")]
    Transport(#[from] TransportError),
}

impl Error {
    pub(crate) fn config(msg: impl Into<String>) -> Self {
        Error::InvalidConfiguration(msg.into())
    }

    /// Stage of the submission pipeline that produced this error.
    pub fn stage(&self) -> Stage {
        match self {
            Error::InvalidConfiguration(_) => Stage::Configuration,
            Error::RateLimited { .. } => Stage::Acquire,
            Error::Encoding(_) => Stage::Encode,
            Error::Transport(_) => Stage::Submit,
        }
    }

    /// Whether retrying the same call later can succeed.
    pub fn is_retryable(&self) -> bool {
        match self {
            Error::RateLimited { .. } => true,
            Error::Transport(TransportError::Timeout | TransportError::Request(_)) => true,
            Error::Transport(TransportError::Status { status, .. }) => *status >= 500,
            Error::InvalidConfiguration(_) | Error::Encoding(_) => false,
        }
    }
}

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;

use std::error::Error as _;

use reqwest::StatusCode;
use thiserror::Error;

/// Outcome of a single failed API call.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The request never produced a response: refused, reset, timed out.
    #[error("{}", describe_chain(.0))]
    Network(#[source] reqwest::Error),

    /// The server answered with a non-success status.
    #[error("{message}")]
    Rejected { status: StatusCode, message: String },

    #[error("unexpected response body: {0}")]
    Decode(#[source] serde_json::Error),
}

impl ApiError {
    pub fn is_network(&self) -> bool {
        matches!(self, Self::Network(_))
    }

    pub fn status(&self) -> Option<StatusCode> {
        match self {
            Self::Rejected { status, .. } => Some(*status),
            Self::Network(err) => err.status(),
            Self::Decode(_) => None,
        }
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid API base URL '{url}': {reason}")]
    InvalidBaseUrl { url: String, reason: String },

    #[error("failed to build HTTP client: {0}")]
    HttpClient(#[from] reqwest::Error),
}

// reqwest's Display stops at "error sending request"; the useful part
// ("Connection refused") lives further down the source chain.
fn describe_chain(err: &reqwest::Error) -> String {
    let mut message = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        let text = cause.to_string();
        if !message.contains(&text) {
            message.push_str(": ");
            message.push_str(&text);
        }
        source = cause.source();
    }
    message
}

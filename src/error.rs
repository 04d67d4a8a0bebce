//! Error types for backend calls.

use thiserror::Error;

/// Everything that can go wrong while talking to the Stock Sensor backend.
///
/// Views never inspect the variant; they show `to_string()`.
#[derive(Debug, Error)]
pub enum ClientError {
    /// Network or transport failure (DNS, connect, reset, ...)
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// Backend answered with a non-2xx status
    #[error("HTTP error! status: {status}{}", fmt_body(.body))]
    Status { status: u16, body: String },

    /// Envelope carried `success: false`
    #[error("{0}")]
    Envelope(String),

    /// Body was not the JSON shape we expected
    #[error("invalid response: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("invalid symbol: {0:?}")]
    InvalidSymbol(String),
}

fn fmt_body(body: &str) -> String {
    let body = body.trim();
    if body.is_empty() {
        String::new()
    } else {
        format!(" ({})", truncate(body, 200))
    }
}

fn truncate(s: &str, max: usize) -> &str {
    match s.char_indices().nth(max) {
        Some((idx, _)) => &s[..idx],
        None => s,
    }
}

impl ClientError {
    /// Short outcome label used for metrics.
    pub fn kind(&self) -> &'static str {
        match self {
            ClientError::Transport(_) => "transport",
            ClientError::Status { .. } => "status",
            ClientError::Envelope(_) => "envelope",
            ClientError::Decode(_) => "decode",
            ClientError::InvalidSymbol(_) => "invalid_symbol",
        }
    }
}

pub type Result<T> = std::result::Result<T, ClientError>;

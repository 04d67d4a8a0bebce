use serde::{Deserialize, Serialize};

/// `{success, data, message}` wrapper used by every backend response.
///
/// Analysis responses put their failure text in `error` instead of `message`;
/// both are accepted.
#[derive(Debug, Clone, Deserialize)]
pub struct Envelope<T> {
    pub success: bool,
    pub data: Option<T>,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub count: Option<u64>,
}

impl<T> Envelope<T> {
    /// Backend-provided failure text, if any.
    pub fn failure_text(&self) -> Option<&str> {
        self.message
            .as_deref()
            .or(self.error.as_deref())
            .map(str::trim)
            .filter(|s| !s.is_empty())
    }
}

/// Acknowledgement from job-trigger endpoints (`scrape-now`, `run-vcp-analysis`, ...).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TriggerAck {
    pub success: bool,
    #[serde(default)]
    pub message: String,
}

use thiserror::Error;

/// Failures talking to the record store.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("record store request timed out")]
    Timeout,

    #[error("record store unreachable: {0}")]
    Transport(String),

    #[error("record store answered HTTP {status}: {message}")]
    Status { status: u16, message: String },

    #[error("unexpected record store payload: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("invalid record store configuration: {0}")]
    Config(String),
}

impl StoreError {
    #[must_use]
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    #[must_use]
    pub fn is_timeout(&self) -> bool {
        matches!(self, Self::Timeout)
    }
}

impl From<reqwest::Error> for StoreError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            Self::Timeout
        } else {
            // Drop the URL: it carries the filter formula with client input.
            Self::Transport(e.without_url().to_string())
        }
    }
}

use thiserror::Error;

pub type Result<T> = std::result::Result<T, ShopError>;

#[derive(Debug, Error)]
pub enum ShopError {
    /// Page did not finish loading inside the session's page-load bound.
    #[error("page load timed out: {0}")]
    FetchTimeout(String),

    #[error("fetch failed: {0}")]
    FetchError(String),

    /// Structured search payload could not be decoded.
    #[error("could not decode payload: {0}")]
    ParseError(String),

    /// The only failure that escapes an extraction run.
    #[error("could not start browser session: {0}")]
    SessionStart(String),

    #[error("invalid settings: {0}")]
    InvalidConfig(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[error("{0}")]
    Other(String),
}

impl ShopError {
    pub fn is_timeout(&self) -> bool {
        matches!(self, ShopError::FetchTimeout(_))
    }

    /// Split a driver failure message into timeout vs. anything else.
    pub fn from_driver(message: impl Into<String>) -> Self {
        let message = message.into();
        let lower = message.to_ascii_lowercase();
        if lower.contains("timeout") || lower.contains("timed out") {
            ShopError::FetchTimeout(message)
        } else {
            ShopError::FetchError(message)
        }
    }
}

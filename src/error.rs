use thiserror::Error;

pub type SuggestResult<T> = std::result::Result<T, SuggestError>;

/// Failure of a single suggestion fetch.
///
/// `Cancelled` is silent when the request was superseded; any failure of
/// the live request degrades the dropdown to an empty result set.
#[derive(Debug, Error)]
pub enum SuggestError {
    #[error("request was superseded")]
    Cancelled,

    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("server responded with {status}")]
    Status { status: reqwest::StatusCode },

    #[error("invalid suggestion payload: {0}")]
    Payload(#[from] serde_json::Error),
}

impl SuggestError {
    pub fn is_cancelled(&self) -> bool {
        matches!(self, SuggestError::Cancelled)
    }
}

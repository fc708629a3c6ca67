use thiserror::Error;

/// Request validation failures, detected before any upstream call
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InputError {
    #[error("Invalid date provided.")]
    InvalidDate,
    #[error("Invalid duration. Please select either 'week' or 'month'.")]
    InvalidDuration,
    #[error("Article title is required.")]
    MissingTitle,
}

/// Failure to obtain one day of pageview data
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FetchError {
    #[error("Max retries reached.")]
    MaxRetriesExceeded { attempts: u32 },
    #[error("JSON decode error occurred.")]
    Decode { detail: String },
    /// Error payload returned by the upstream with a 200 status
    #[error("{0}")]
    Upstream(String),
    #[error("Unexpected status code: {0}")]
    UnexpectedStatus(u16),
    #[error("Request failed: {0}")]
    Transport(String),
    #[error("Request cancelled.")]
    Cancelled,
}

//! Errors raised by the remote half of the ignore store
//!
//! None of these ever reach the UI flow: the session turns them into
//! `SyncOutcome::Failed` / `LoadOutcome::Failed` and logs a warning.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum SyncError {
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("remote returned status {status}: {body}")]
    Status {
        status: reqwest::StatusCode,
        body: String,
    },

    #[error("remote document has no file named {0}")]
    MissingFile(String),

    #[error("remote document is malformed: {0}")]
    Malformed(#[from] serde_json::Error),

    #[error("invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    #[error("credential cannot be sent as a header")]
    InvalidCredential,

    #[error("local cache write failed: {0}")]
    LocalCache(String),

    #[error("background task did not finish: {0}")]
    Task(String),
}

impl SyncError {
    /// Whether the remote answered but its content could not be used.
    ///
    /// The write protocol treats these as an empty remote document.
    pub fn is_malformed(&self) -> bool {
        matches!(self, Self::MissingFile(_) | Self::Malformed(_))
    }
}

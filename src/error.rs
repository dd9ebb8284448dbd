//! Error types for Courier.

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Mailbox error: {0}")]
    Mailbox(String),

    #[error("Unknown recipient '{to}'")]
    UnknownRecipient {
        to: String,
        /// Best-effort name suggestions for the caller to retry with.
        suggestions: Vec<String>,
        /// Full sorted list of valid agent names.
        known: Vec<String>,
    },

    #[error("{0}")]
    Other(String),
}

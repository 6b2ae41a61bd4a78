//! Error types for company profile operations.
//!
//! Every fallible operation in this crate returns [`Result`]. Transport and
//! backend failures are kept apart so callers can tell a dead network from a
//! rejected request.

use crate::id::ProfileId;
use thiserror::Error;

/// Root error type for ICP report operations.
#[derive(Debug, Error)]
pub enum Error {
    /// Missing or malformed configuration
    #[error("Configuration error: {0}")]
    Config(String),

    /// The HTTP request could not be sent or its response not read
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The backend answered with a non-success status
    #[error("API error ({status}): {message}")]
    Api {
        /// HTTP status code
        status: u16,

        /// Response body, as returned by the backend
        message: String,
    },

    /// JSON encoding or decoding failed
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Reading a local file failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// No company profile row matched the identifier
    #[error("Company profile not found: {0}")]
    ProfileNotFound(ProfileId),

    /// A dotted report path could not be parsed
    #[error("Invalid report path: {0}")]
    InvalidPath(String),

    /// A profile identifier was not a UUID
    #[error("Invalid profile id: {0}")]
    InvalidId(String),

    /// Stored data did not have the expected JSON shape
    #[error("Unexpected data shape: {0}")]
    UnexpectedShape(String),
}

impl From<toml::de::Error> for Error {
    fn from(err: toml::de::Error) -> Self {
        Self::Config(err.to_string())
    }
}

/// Result type used throughout the crate.
pub type Result<T> = std::result::Result<T, Error>;

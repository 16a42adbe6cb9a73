//! Error types for the waitlist stores.

use thiserror::Error;

/// Main error type for waitlist operations.
///
/// Nothing here is allowed to take a page down: every variant has a defined
/// fallback at the call site (empty snapshot, advisory message, inline
/// validation text).
#[derive(Debug, Error)]
pub enum WaitlistError {
    #[error("invalid email address: {0:?}")]
    InvalidEmail(String),

    #[error("remote write failed: {0}")]
    RemoteWrite(String),

    #[error("remote subscription failed: {0}")]
    RemoteSubscribe(String),

    #[error("anonymous sign-in failed: {0}")]
    Identity(String),

    #[error("local storage error: {0}")]
    Storage(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialization(String),
}

impl From<serde_json::Error> for WaitlistError {
    fn from(e: serde_json::Error) -> Self {
        WaitlistError::Serialization(e.to_string())
    }
}

/// Result type for waitlist operations.
pub type Result<T> = std::result::Result<T, WaitlistError>;

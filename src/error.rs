//! Common error types for media-vault

use thiserror::Error;

use crate::store::StoreError;

/// Common result type for media-vault operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors surfaced by the media-vault core
#[derive(Error, Debug)]
pub enum Error {
    /// Object store operation failed (wraps StoreError)
    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    /// Configuration loading or validation error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Derived-artifact payload could not be parsed
    #[error("Malformed payload: {0}")]
    Payload(#[from] serde_json::Error),

    /// Invalid user input or request parameter
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

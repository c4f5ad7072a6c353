// src/error.rs

use thiserror::Error;

/// Errors raised while resolving display dates into calendar instants.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DateError {
    #[error("invalid display date '{0}', expected DD/MM")]
    InvalidDisplayDate(String),

    #[error("invalid date filter option: {0}")]
    InvalidFilter(String),

    #[error("invalid timestamp: {0}")]
    InvalidTimestamp(String),

    #[error("date out of range: {0}")]
    OutOfRange(String),
}

/// Errors surfaced to the storage and favorites collaborators.
#[derive(Debug, Error)]
pub enum MockError {
    #[error("Invalid JSON: {0}")]
    InvalidJson(#[from] serde_json::Error),

    #[error("failed to serialize payload: {0}")]
    Serialize(serde_json::Error),

    #[error(transparent)]
    Date(#[from] DateError),

    #[error("No environment ID found in URL")]
    MissingEnvironment,

    #[error("payload has no statusCode field")]
    MissingStatusField,
}

pub type Result<T> = std::result::Result<T, MockError>;

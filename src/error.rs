//! Error handling for cookman

use thiserror::Error;

/// Main error type for cookie manager operations
#[derive(Error, Debug)]
pub enum CookmanError {
    #[error("Invalid cookie field: {0}")]
    Validation(String),

    #[error("Cookie store error: {0}")]
    Store(String),

    #[error("An edit session is already open")]
    EditInProgress,

    #[error("Cannot read the active tab: {0}")]
    TabLookup(String),

    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    #[error("Message parsing error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type alias for cookman operations
pub type Result<T> = std::result::Result<T, CookmanError>;

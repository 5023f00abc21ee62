//! Error types for query translation.

use crate::Language;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Unsupported language: {0}")]
    UnsupportedLanguage(String),

    #[error("Conversion from {from} to {to} is not supported")]
    UnsupportedConversion { from: Language, to: Language },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, Error>;

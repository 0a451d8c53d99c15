//! Error types for turndown operations.

use thiserror::Error;

/// Errors that can occur while configuring or running a conversion.
#[derive(Error, Debug)]
pub enum Error {
    /// The value handed to `render` is not markup, an element, a document or a fragment.
    #[error("{0} is not a string, or an element/document/document fragment node")]
    InvalidInput(String),

    #[error("Invalid option: {0}")]
    InvalidOption(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[cfg(feature = "serde")]
    #[error("Settings error: {0}")]
    Settings(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, Error>;

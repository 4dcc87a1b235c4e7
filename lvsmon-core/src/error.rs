//! Error types for lvsmon

use thiserror::Error;

/// Result type for lvsmon operations
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for lvsmon
#[derive(Error, Debug)]
pub enum Error {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// A text value does not fit its field
    #[error("{field} value is {len} bytes long, at most {max} allowed")]
    FieldTooLong {
        field: &'static str,
        len: usize,
        max: usize,
    },
}

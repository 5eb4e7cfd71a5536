//! Error types for parsing values in cubo-types.

use thiserror::Error;

/// Errors that can occur when parsing sensor values from text.
///
/// This enum is marked `#[non_exhaustive]` to allow adding new error variants
/// in future versions without breaking downstream code.
#[derive(Debug, Error, PartialEq)]
#[non_exhaustive]
pub enum ParseError {
    /// The text could not be interpreted as the requested value.
    #[error("Invalid data: {0}")]
    InvalidData(String),

    /// An acceleration triple did not have exactly three components.
    #[error("Expected 3 acceleration components (x,y,z), got {0}")]
    WrongComponentCount(usize),
}

/// Result type alias using cubo-types' ParseError type.
pub type ParseResult<T> = std::result::Result<T, ParseError>;

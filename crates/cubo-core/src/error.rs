//! Error types for cubo-core.
//!
//! The indicator engine itself never fails; these errors come from loading
//! sensor frames. Missing values are not errors: empty and `NaN` cells load
//! as absent readings.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur when loading sensor data.
///
/// This enum is marked `#[non_exhaustive]` to allow adding new error variants
/// in future versions without breaking downstream code.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum Error {
    /// The input file could not be opened.
    #[error("Failed to open {}: {source}", path.display())]
    Open {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Malformed CSV (ragged rows, bad UTF-8, read failure).
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// The input has no header row.
    #[error("CSV input has no header row")]
    MissingHeader,

    /// A value cell is not a number.
    #[error("Line {line}: column '{column}' has non-numeric value '{value}'")]
    InvalidValue {
        line: u64,
        column: String,
        value: String,
    },

    /// A timestamp cell could not be parsed.
    #[error("Line {line}: unrecognized timestamp '{value}'")]
    InvalidTimestamp { line: u64, value: String },
}

/// Result type alias using cubo-core's Error type.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_value_display() {
        let err = Error::InvalidValue {
            line: 4,
            column: "humidity".to_string(),
            value: "wet".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Line 4: column 'humidity' has non-numeric value 'wet'"
        );
    }

    #[test]
    fn test_open_display_includes_path() {
        let err = Error::Open {
            path: PathBuf::from("/tmp/missing.csv"),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "not found"),
        };
        let msg = err.to_string();
        assert!(msg.contains("/tmp/missing.csv"));
        assert!(msg.contains("not found"));
    }
}

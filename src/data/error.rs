//! Data loading error types
//!
//! Everything that can go wrong while reading the CSV tables or the
//! GeoJSON boundary document. All of these are fatal at startup.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while loading datasets
#[derive(Error, Debug)]
pub enum DataError {
    /// I/O operation failed
    #[error("IO error reading {path:?}: {error}")]
    Io { path: PathBuf, error: std::io::Error },

    /// CSV reader failed (malformed quoting, bad UTF-8, ...)
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// A required column is absent from the header row
    #[error("Missing column '{column}' in {table}")]
    MissingColumn { table: String, column: String },

    /// A date cell could not be parsed
    #[error("Invalid date '{value}' in {table} at line {line}")]
    InvalidDate {
        table: String,
        value: String,
        line: usize,
    },

    /// Boundary document is not a usable GeoJSON FeatureCollection
    #[error("Invalid GeoJSON: {0}")]
    GeoJson(String),

    /// Boundary document could not be fetched
    #[error("HTTP error fetching {url}: {error}")]
    Http { url: String, error: reqwest::Error },
}

impl From<serde_json::Error> for DataError {
    fn from(err: serde_json::Error) -> Self {
        DataError::GeoJson(err.to_string())
    }
}

/// Result type alias for data loading
pub type DataResult<T> = Result<T, DataError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = DataError::MissingColumn {
            table: "total_cases".to_string(),
            column: "date".to_string(),
        };
        assert_eq!(err.to_string(), "Missing column 'date' in total_cases");

        let err = DataError::InvalidDate {
            table: "weekly_cases".to_string(),
            value: "yesterday".to_string(),
            line: 3,
        };
        assert_eq!(
            err.to_string(),
            "Invalid date 'yesterday' in weekly_cases at line 3"
        );
    }

    #[test]
    fn test_json_error_conversion() {
        let json_err = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let err: DataError = json_err.into();
        assert!(matches!(err, DataError::GeoJson(_)));
    }
}

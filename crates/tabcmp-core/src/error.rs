//! Error types for tabcmp-core

use std::path::PathBuf;
use thiserror::Error;

use crate::table::Side;

/// Result type alias using our Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Broad category of an [`Error`], used by callers to pick a message or exit code
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Malformed or unreadable delimited text
    Parse,
    /// Join/exclude columns, delimiter or profile do not fit the inputs
    Configuration,
    /// The API was driven in an invalid way
    Usage,
    /// Writing output failed
    Io,
}

/// Errors that can occur in tabcmp-core
#[derive(Debug, Error)]
pub enum Error {
    /// Failed to read a file
    #[error("failed to read file '{path}': {source}")]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Failed to parse CSV
    #[error("failed to parse CSV '{path}': {message}")]
    CsvParse { path: PathBuf, message: String },

    /// CSV parsing error from the csv crate
    #[error("CSV error in '{path}': {source}")]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    /// A data line does not have as many fields as the header
    #[error("'{path}' line {line}: expected {expected} fields, found {found}")]
    FieldCount {
        path: PathBuf,
        line: u64,
        expected: usize,
        found: usize,
    },

    /// Join column missing from one input
    #[error("join column not found: '{column}' is missing from the {side} input")]
    JoinColumnNotFound { column: String, side: Side },

    /// Exclude column missing from one input
    #[error("exclude column not found: '{column}' is missing from the {side} input")]
    ExcludeColumnNotFound { column: String, side: Side },

    /// Delimiter is not a single ASCII character
    #[error("invalid delimiter {0:?}: expected a single ASCII character")]
    InvalidDelimiter(String),

    /// No profile with this name in the profile file
    #[error("file type '{name}' not found in '{path}'")]
    ProfileNotFound { name: String, path: PathBuf },

    /// No join columns were given
    #[error("no join columns given")]
    EmptyJoinKey,

    /// The aggregator was updated or finalized after being finalized
    #[error("aggregator is already finalized")]
    AggregatorFinalized,

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    /// Classify this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::FileRead { .. }
            | Error::CsvParse { .. }
            | Error::Csv { .. }
            | Error::FieldCount { .. } => ErrorKind::Parse,
            Error::JoinColumnNotFound { .. }
            | Error::ExcludeColumnNotFound { .. }
            | Error::InvalidDelimiter(_)
            | Error::ProfileNotFound { .. }
            | Error::Json(_) => ErrorKind::Configuration,
            Error::EmptyJoinKey | Error::AggregatorFinalized => ErrorKind::Usage,
            Error::Io(_) => ErrorKind::Io,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_kinds() {
        let parse = Error::FieldCount {
            path: PathBuf::from("a.csv"),
            line: 3,
            expected: 2,
            found: 3,
        };
        assert_eq!(parse.kind(), ErrorKind::Parse);
        assert_eq!(
            Error::JoinColumnNotFound {
                column: "id".to_string(),
                side: Side::Right
            }
            .kind(),
            ErrorKind::Configuration
        );
        assert_eq!(Error::AggregatorFinalized.kind(), ErrorKind::Usage);
        assert_eq!(Error::EmptyJoinKey.kind(), ErrorKind::Usage);
    }

    #[test]
    fn test_messages_name_the_offender() {
        let err = Error::FieldCount {
            path: PathBuf::from("left.csv"),
            line: 4,
            expected: 3,
            found: 2,
        };
        assert_eq!(
            err.to_string(),
            "'left.csv' line 4: expected 3 fields, found 2"
        );

        let err = Error::JoinColumnNotFound {
            column: "region".to_string(),
            side: Side::Left,
        };
        assert!(err.to_string().contains("'region'"));
        assert!(err.to_string().contains("left"));

        let err = Error::ExcludeColumnNotFound {
            column: "tmp".to_string(),
            side: Side::Right,
        };
        assert_eq!(
            err.to_string(),
            "exclude column not found: 'tmp' is missing from the right input"
        );
        assert_eq!(err.kind(), ErrorKind::Configuration);
    }
}

use std::fmt;
use std::path::PathBuf;

use thiserror::Error;

/// Convenient alias for fallible results returned throughout the crate.
pub type Result<T> = std::result::Result<T, SyncError>;

/// Error type covering the different failure cases that can occur while a
/// sync cycle reads the workbook, exchanges the credential, or submits offers.
#[derive(Debug, Error)]
pub enum SyncError {
    /// Raised when the configured spreadsheet does not exist.
    #[error("input file not found: {0}")]
    NotFound(PathBuf),

    /// Errors bubbled up from the spreadsheet reader implementation.
    #[error("Excel read error: {0}")]
    Workbook(#[from] calamine::Error),

    /// Raised when the requested sheet index is not present in the workbook.
    #[error("sheet index {index} out of range (workbook has {available} sheets)")]
    SheetOutOfRange { index: usize, available: usize },

    /// Raised when a cell cannot be coerced into the type its column requires.
    #[error("invalid value '{value}' in row {row}, column {column}: expected {expected}")]
    InvalidCell {
        row: u32,
        column: usize,
        value: String,
        expected: &'static str,
    },

    /// Raised when the sheet holds no data rows.
    #[error("sheet contains no data rows")]
    EmptySheet,

    /// The token endpoint answered with something other than `200 OK`.
    #[error("failed to get access token, status code {status}")]
    AuthRejected { status: u16 },

    /// The token request never produced a response.
    #[error("error getting access token: {0}")]
    AuthTransport(#[source] reqwest::Error),

    /// The offer import request never produced a response.
    #[error("error sending offers: {0}")]
    Submit(#[source] reqwest::Error),

    /// Raised when the HTTP client cannot be constructed.
    #[error("HTTP client error: {0}")]
    Http(#[source] reqwest::Error),

    /// Raised when settings are missing or inconsistent.
    #[error("invalid configuration: {0}")]
    Config(String),

    /// Raised when the settings file is not valid TOML.
    #[error("invalid configuration file: {0}")]
    ConfigFile(#[from] toml::de::Error),

    /// Wrapper for IO failures such as reading the settings file.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Raised when JSON serialization fails.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Raised when the tracing subscriber fails to initialise.
    #[error("failed to initialise logging: {0}")]
    Logging(String),
}

/// Coarse classification of [`SyncError`] used for reporting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    NotFound,
    Read,
    Auth,
    Submit,
    Other,
}

impl SyncError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            SyncError::NotFound(_) => ErrorKind::NotFound,
            SyncError::Workbook(_)
            | SyncError::SheetOutOfRange { .. }
            | SyncError::InvalidCell { .. }
            | SyncError::EmptySheet => ErrorKind::Read,
            SyncError::AuthRejected { .. } | SyncError::AuthTransport(_) => ErrorKind::Auth,
            SyncError::Submit(_) => ErrorKind::Submit,
            SyncError::Http(_)
            | SyncError::Config(_)
            | SyncError::ConfigFile(_)
            | SyncError::Io(_)
            | SyncError::Json(_)
            | SyncError::Logging(_) => ErrorKind::Other,
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ErrorKind::NotFound => write!(f, "not_found"),
            ErrorKind::Read => write!(f, "read_error"),
            ErrorKind::Auth => write!(f, "auth_error"),
            ErrorKind::Submit => write!(f, "submit_error"),
            ErrorKind::Other => write!(f, "other"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn read_failures_share_a_kind() {
        let invalid = SyncError::InvalidCell {
            row: 2,
            column: 0,
            value: "many".into(),
            expected: "a non-negative integer",
        };
        assert_eq!(invalid.kind(), ErrorKind::Read);
        assert_eq!(SyncError::EmptySheet.kind(), ErrorKind::Read);
        assert_eq!(
            SyncError::NotFound(PathBuf::from("missing.xlsx")).kind(),
            ErrorKind::NotFound
        );
        assert_eq!(
            SyncError::AuthRejected { status: 401 }.kind(),
            ErrorKind::Auth
        );
    }

    #[test]
    fn invalid_cell_message_names_the_position() {
        let error = SyncError::InvalidCell {
            row: 3,
            column: 1,
            value: "n/a".into(),
            expected: "a non-negative integer",
        };
        assert_eq!(
            error.to_string(),
            "invalid value 'n/a' in row 3, column 1: expected a non-negative integer"
        );
    }
}

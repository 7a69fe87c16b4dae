//! Error Module
//!
//! This module defines the error types for the crate. Shape validation
//! errors are raised before any SQL reaches the database; engine errors are
//! propagated unmodified from rusqlite.
use thiserror::Error;

/// Error type covering every failure mode of the crate:
/// - Database operations (connection, statements) surfaced by the engine
/// - Shape validation of structured inputs (columns, values, conditions)
/// - Configuration loading
#[derive(Error, Debug)]
pub enum SqliteKitError {
    /// Errors from the underlying SQLite engine, passed through untouched
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// Query surface misuse (e.g. fetching before any statement ran)
    #[error("Query error: {0}")]
    Query(String),

    /// Structured input in the wrong shape (e.g. column/value length mismatch)
    #[error("Type error: {0}")]
    Type(String),

    /// Invalid value inside an otherwise well-shaped input (e.g. empty
    /// condition keyword, empty table structure)
    #[error("Value error: {0}")]
    Value(String),

    /// A lookup that was expected to produce a row produced none
    #[error("Lookup error: {0}")]
    Lookup(String),

    /// Configuration loading and validation errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// File system and I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Type alias for Result to use SqliteKitError as the error type.
pub type Result<T> = std::result::Result<T, SqliteKitError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let db_err = SqliteKitError::Database(rusqlite::Error::ExecuteReturnedResults);
        assert!(db_err.to_string().contains("Database error"));

        let type_err = SqliteKitError::Type("expected 2 values".to_string());
        assert!(type_err.to_string().contains("Type error"));

        let lookup_err = SqliteKitError::Lookup("no rows".to_string());
        assert!(lookup_err.to_string().contains("Lookup error"));
    }

    #[test]
    fn test_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err: SqliteKitError = io_err.into();
        match err {
            SqliteKitError::Io(_) => {}
            _ => panic!("Expected IO error"),
        }

        let sql_err = rusqlite::Error::ExecuteReturnedResults;
        let err: SqliteKitError = sql_err.into();
        match err {
            SqliteKitError::Database(_) => {}
            _ => panic!("Expected Database error"),
        }
    }
}

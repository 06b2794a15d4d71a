//! Error types for kvdb
//!
//! One error type for every layer. Domain and protocol variants are reported
//! to clients as response codes, the rest are operational failures.

use thiserror::Error;

/// Result type alias using KvdbError
pub type Result<T> = std::result::Result<T, KvdbError>;

/// Unified error type for kvdb operations
#[derive(Debug, Error)]
pub enum KvdbError {
    // -------------------------------------------------------------------------
    // Domain Errors (recoverable, sent to the client)
    // -------------------------------------------------------------------------
    #[error("already exists")]
    AlreadyExists,

    #[error("database not found")]
    DatabaseNotFound,

    #[error("key not found")]
    KeyNotFound,

    #[error("database is empty")]
    DatabaseIsEmpty,

    #[error("key not provided")]
    KeyNotProvided,

    #[error("value contains illegal characters")]
    IllegalCharacters,

    // -------------------------------------------------------------------------
    // Protocol Errors
    // -------------------------------------------------------------------------
    #[error("bad query")]
    BadQuery,

    // -------------------------------------------------------------------------
    // I/O Errors
    // -------------------------------------------------------------------------
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // -------------------------------------------------------------------------
    // Snapshot Errors
    // -------------------------------------------------------------------------
    #[error("Snapshot corrupted: {0}")]
    SnapshotCorrupted(String),

    #[error("Serialization error: {0}")]
    Serialization(String),

    // -------------------------------------------------------------------------
    // Configuration Errors
    // -------------------------------------------------------------------------
    #[error("Configuration error: {0}")]
    Config(String),
}

impl KvdbError {
    /// True for errors that are part of the query vocabulary rather than
    /// failures of the server itself
    pub fn is_domain(&self) -> bool {
        matches!(
            self,
            KvdbError::AlreadyExists
                | KvdbError::DatabaseNotFound
                | KvdbError::KeyNotFound
                | KvdbError::DatabaseIsEmpty
                | KvdbError::KeyNotProvided
                | KvdbError::IllegalCharacters
                | KvdbError::BadQuery
        )
    }
}

impl From<bincode::Error> for KvdbError {
    fn from(e: bincode::Error) -> Self {
        KvdbError::Serialization(e.to_string())
    }
}

//! Response definitions
//!
//! Represents responses to clients.

use std::fmt;

use crate::error::KvdbError;

/// Failure codes of the wire protocol
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    BadQuery,
    IllegalCharacters,
    KeyNotFound,
    DatabaseNotFound,
    DatabaseIsEmpty,
    KeyNotProvided,
    AlreadyExists,
}

impl ErrorCode {
    pub const ALL: [ErrorCode; 7] = [
        ErrorCode::BadQuery,
        ErrorCode::IllegalCharacters,
        ErrorCode::KeyNotFound,
        ErrorCode::DatabaseNotFound,
        ErrorCode::DatabaseIsEmpty,
        ErrorCode::KeyNotProvided,
        ErrorCode::AlreadyExists,
    ];

    /// Exact text sent on the wire
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCode::BadQuery => "BAD_QUERY",
            ErrorCode::IllegalCharacters => "ILLEGAL_CHARACTERS",
            ErrorCode::KeyNotFound => "KEY_NOT_FOUND",
            ErrorCode::DatabaseNotFound => "DATABASE_NOT_FOUND",
            ErrorCode::DatabaseIsEmpty => "DATABASE_IS_EMPTY",
            ErrorCode::KeyNotProvided => "KEY_NOT_PROVIDED",
            ErrorCode::AlreadyExists => "ALREADY_EXISTS",
        }
    }

    /// Recognize a code in a response line
    pub fn parse(text: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|code| code.as_str() == text)
    }

    /// Code for a domain or protocol error; `None` for operational errors
    pub fn from_error(error: &KvdbError) -> Option<Self> {
        let code = match error {
            KvdbError::AlreadyExists => ErrorCode::AlreadyExists,
            KvdbError::DatabaseNotFound => ErrorCode::DatabaseNotFound,
            KvdbError::KeyNotFound => ErrorCode::KeyNotFound,
            KvdbError::DatabaseIsEmpty => ErrorCode::DatabaseIsEmpty,
            KvdbError::KeyNotProvided => ErrorCode::KeyNotProvided,
            KvdbError::IllegalCharacters => ErrorCode::IllegalCharacters,
            KvdbError::BadQuery => ErrorCode::BadQuery,
            _ => return None,
        };
        Some(code)
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A response to send to client
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Response {
    /// `OK`
    Ok,

    /// Raw stored value (GET)
    Value(String),

    /// Sorted names (LIST), space separated on the wire
    List(Vec<String>),

    /// One of the failure codes
    Error(ErrorCode),
}

impl Response {
    /// Create an ERROR response
    pub fn error(code: ErrorCode) -> Self {
        Response::Error(code)
    }

    /// Map an error to its response
    ///
    /// Operational errors have no wire code and are reported as BAD_QUERY.
    pub fn from_error(error: &KvdbError) -> Self {
        match ErrorCode::from_error(error) {
            Some(code) => Response::Error(code),
            None => {
                tracing::error!("No response code for error: {}", error);
                Response::Error(ErrorCode::BadQuery)
            }
        }
    }

    /// True for anything but an error code
    pub fn is_ok(&self) -> bool {
        !matches!(self, Response::Error(_))
    }
}

impl fmt::Display for Response {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Response::Ok => f.write_str("OK"),
            Response::Value(value) => f.write_str(value),
            Response::List(names) => f.write_str(&names.join(" ")),
            Response::Error(code) => f.write_str(code.as_str()),
        }
    }
}

//! Protocol Module
//!
//! Defines the wire protocol for client-server communication.
//!
//! ## Protocol Format
//!
//! Plain text, one query per line, one response line per query.
//!
//! ### Queries
//! - `CREATEDB <db>`
//! - `GET <db>.<key>`
//! - `SET <db>.<key> "<value>"`
//! - `UPDATE <db>.<key> "<value>"`
//! - `REMOVE DB <db>`
//! - `REMOVE KEY <db>.<key>`
//! - `LIST [<db>]`
//!
//! ### Responses
//! - `OK`
//! - the raw value (GET) or space separated names (LIST)
//! - `BAD_QUERY`, `ILLEGAL_CHARACTERS`, `KEY_NOT_FOUND`, `DATABASE_NOT_FOUND`,
//!   `DATABASE_IS_EMPTY`, `KEY_NOT_PROVIDED`, `ALREADY_EXISTS`

mod query;
mod parser;
mod response;
mod codec;

pub use query::{Query, QueryKind};
pub use parser::parse_query;
pub use response::{ErrorCode, Response};
pub use codec::{
    encode_response, read_frame, read_response_line, write_query, write_response, Frame,
};

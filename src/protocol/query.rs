//! Query definitions
//!
//! One variant per statement of the query language.

use std::fmt;

/// Query kinds, used for logging
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueryKind {
    CreateDb,
    Get,
    Set,
    RemoveDb,
    RemoveKey,
    Update,
    List,
}

impl fmt::Display for QueryKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            QueryKind::CreateDb => "CREATEDB",
            QueryKind::Get => "GET",
            QueryKind::Set => "SET",
            QueryKind::RemoveDb => "REMOVE DB",
            QueryKind::RemoveKey => "REMOVE KEY",
            QueryKind::Update => "UPDATE",
            QueryKind::List => "LIST",
        };
        f.write_str(name)
    }
}

/// A parsed query
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Query {
    /// `CREATEDB <name>`
    CreateNamespace { name: String },

    /// `GET <namespace>.<key>`
    Get { namespace: String, key: String },

    /// `SET <namespace>.<key> "<value>"` (insert only)
    Set {
        namespace: String,
        key: String,
        value: String,
    },

    /// `REMOVE DB <namespace>`
    RemoveNamespace { namespace: String },

    /// `REMOVE KEY <namespace>[.<key>]`
    ///
    /// The key is optional in the grammar so that a missing key can be
    /// reported as KEY_NOT_PROVIDED instead of BAD_QUERY.
    RemoveKey {
        namespace: String,
        key: Option<String>,
    },

    /// `UPDATE <namespace>.<key> "<value>"` (overwrite only)
    Update {
        namespace: String,
        key: String,
        value: String,
    },

    /// `LIST` or `LIST <namespace>`
    List { namespace: Option<String> },
}

impl Query {
    /// Get the query kind
    pub fn kind(&self) -> QueryKind {
        match self {
            Query::CreateNamespace { .. } => QueryKind::CreateDb,
            Query::Get { .. } => QueryKind::Get,
            Query::Set { .. } => QueryKind::Set,
            Query::RemoveNamespace { .. } => QueryKind::RemoveDb,
            Query::RemoveKey { .. } => QueryKind::RemoveKey,
            Query::Update { .. } => QueryKind::Update,
            Query::List { .. } => QueryKind::List,
        }
    }
}

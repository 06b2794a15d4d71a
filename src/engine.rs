//! Engine Module
//!
//! Ties the store to the query language.
//!
//! ## Responsibilities
//! - Seed the store from the snapshot file on startup
//! - Validate values before they reach the store
//! - Dispatch parsed queries and map results to responses

use std::path::Path;
use std::sync::Arc;

use crate::backup::snapshot;
use crate::config::Config;
use crate::error::{KvdbError, Result};
use crate::protocol::{parse_query, Query, Response};
use crate::storage::Store;

/// Characters a stored value may not contain
pub const ILLEGAL_VALUE_CHARS: [char; 3] = [':', '\r', '\n'];

/// Reject values containing reserved characters
pub fn check_value(value: &str) -> Result<()> {
    if value.contains(&ILLEGAL_VALUE_CHARS[..]) {
        return Err(KvdbError::IllegalCharacters);
    }
    Ok(())
}

/// The query engine
///
/// Cheap to share: the store sits behind an `Arc` so the backup service can
/// hold it too.
pub struct Engine {
    /// Engine configuration
    config: Config,

    /// Namespace collection shared with the backup service
    store: Arc<Store>,
}

impl Engine {
    /// Open an engine with the given config
    ///
    /// With a backup path, the snapshot is loaded first. A missing or empty
    /// file starts an empty store; any other load failure is returned and
    /// the file is left untouched.
    pub fn open(config: Config) -> Result<Self> {
        config.validate()?;

        let store = match &config.backup_path {
            Some(path) => Self::load_store(path)?,
            None => {
                tracing::info!("Using in-memory database");
                Store::new()
            }
        };

        Ok(Self {
            config,
            store: Arc::new(store),
        })
    }

    /// Engine without a snapshot file
    pub fn in_memory() -> Self {
        Self {
            config: Config::default(),
            store: Arc::new(Store::new()),
        }
    }

    fn load_store(path: &Path) -> Result<Store> {
        match snapshot::load(path)? {
            Some(namespaces) => {
                tracing::info!(
                    "Using file database {} ({} namespaces)",
                    path.display(),
                    namespaces.len()
                );
                Ok(Store::from_namespaces(namespaces))
            }
            None => {
                tracing::warn!(
                    "Database file {} not found or empty, starting empty",
                    path.display()
                );
                Ok(Store::new())
            }
        }
    }

    /// Parse and execute one query line
    pub fn execute_line(&self, line: &str) -> Response {
        match parse_query(line) {
            Ok(query) => self.execute(query),
            Err(e) => Response::from_error(&e),
        }
    }

    /// Execute a query
    ///
    /// Domain failures become error responses; nothing here ends the
    /// connection.
    pub fn execute(&self, query: Query) -> Response {
        let kind = query.kind();
        match self.dispatch(query) {
            Ok(response) => response,
            Err(e) => {
                tracing::trace!("{} failed: {}", kind, e);
                Response::from_error(&e)
            }
        }
    }

    fn dispatch(&self, query: Query) -> Result<Response> {
        match query {
            Query::CreateNamespace { name } => {
                self.store.create_namespace(&name)?;
                tracing::info!("Map '{}' has been created", name);
                Ok(Response::Ok)
            }
            Query::Get { namespace, key } => {
                let value = self.store.get(&namespace, &key)?;
                Ok(Response::Value(value))
            }
            Query::Set {
                namespace,
                key,
                value,
            } => {
                check_value(&value)?;
                self.store.put(&namespace, &key, &value)?;
                tracing::info!("Created key '{}' on map '{}'", key, namespace);
                Ok(Response::Ok)
            }
            Query::RemoveNamespace { namespace } => {
                self.store.delete_namespace(&namespace)?;
                tracing::info!("Map '{}' has been removed", namespace);
                Ok(Response::Ok)
            }
            Query::RemoveKey { namespace, key } => {
                let key = key.ok_or(KvdbError::KeyNotProvided)?;
                self.store.remove(&namespace, &key)?;
                tracing::info!("Key '{}' from map '{}' has been removed", key, namespace);
                Ok(Response::Ok)
            }
            Query::Update {
                namespace,
                key,
                value,
            } => {
                check_value(&value)?;
                self.store.update(&namespace, &key, &value)?;
                tracing::info!("Key '{}' from map '{}' has been updated", key, namespace);
                Ok(Response::Ok)
            }
            Query::List { namespace: None } => {
                Ok(Response::List(self.store.list_namespaces()?))
            }
            Query::List {
                namespace: Some(namespace),
            } => Ok(Response::List(self.store.list_keys(&namespace)?)),
        }
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    /// Shared handle to the store
    pub fn store(&self) -> &Arc<Store> {
        &self.store
    }

    /// Snapshot file, if the engine is file-backed
    pub fn backup_path(&self) -> Option<&Path> {
        self.config.backup_path.as_deref()
    }

    /// Get the configuration
    pub fn config(&self) -> &Config {
        &self.config
    }
}

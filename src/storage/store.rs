//! Namespace store
//!
//! HashMap-of-HashMaps behind a parking_lot RwLock.

use parking_lot::RwLock;

use crate::error::{KvdbError, Result};

use super::{KeyMap, Namespaces};

/// State shared under the store lock
#[derive(Debug, Default)]
struct StoreState {
    namespaces: Namespaces,

    /// Incremented by every successful mutation
    version: u64,

    /// Version that the last successful snapshot captured
    saved_version: u64,
}

impl StoreState {
    fn namespace(&self, name: &str) -> Result<&KeyMap> {
        self.namespaces.get(name).ok_or(KvdbError::DatabaseNotFound)
    }

    fn namespace_mut(&mut self, name: &str) -> Result<&mut KeyMap> {
        self.namespaces
            .get_mut(name)
            .ok_or(KvdbError::DatabaseNotFound)
    }

    fn touch(&mut self) {
        self.version += 1;
    }
}

/// The storage engine
///
/// ## Concurrency Model
///
/// One RwLock over the entire collection:
/// - Mutations (create/delete namespace, put/update/remove key) take the
///   write lock for the whole operation
/// - Reads (get, list, snapshot encoding) take the read lock
///
/// Every operation is linearizable on its own; nothing spans two operations.
/// The dirty flag lives under the same lock, so a snapshot always sees a
/// collection and a version that belong together.
#[derive(Debug, Default)]
pub struct Store {
    state: RwLock<StoreState>,
}

impl Store {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store seeded from a loaded snapshot
    ///
    /// The seeded contents are already on disk, so the store starts clean.
    pub fn from_namespaces(namespaces: Namespaces) -> Self {
        Self {
            state: RwLock::new(StoreState {
                namespaces,
                ..StoreState::default()
            }),
        }
    }

    // =========================================================================
    // Namespace Operations
    // =========================================================================

    /// Create an empty namespace
    pub fn create_namespace(&self, name: &str) -> Result<()> {
        let mut state = self.state.write();

        if state.namespaces.contains_key(name) {
            return Err(KvdbError::AlreadyExists);
        }

        state.namespaces.insert(name.to_string(), KeyMap::new());
        state.touch();
        Ok(())
    }

    /// Delete a namespace and all of its keys
    pub fn delete_namespace(&self, name: &str) -> Result<()> {
        let mut state = self.state.write();

        if state.namespaces.remove(name).is_none() {
            return Err(KvdbError::DatabaseNotFound);
        }

        state.touch();
        Ok(())
    }

    // =========================================================================
    // Key Operations
    // =========================================================================

    /// Insert a new key; never overwrites
    pub fn put(&self, namespace: &str, key: &str, value: &str) -> Result<()> {
        let mut state = self.state.write();
        let keys = state.namespace_mut(namespace)?;

        if keys.contains_key(key) {
            return Err(KvdbError::AlreadyExists);
        }

        keys.insert(key.to_string(), value.to_string());
        state.touch();
        Ok(())
    }

    /// Read the value of a key
    pub fn get(&self, namespace: &str, key: &str) -> Result<String> {
        let state = self.state.read();
        state
            .namespace(namespace)?
            .get(key)
            .cloned()
            .ok_or(KvdbError::KeyNotFound)
    }

    /// Overwrite an existing key; never creates one
    pub fn update(&self, namespace: &str, key: &str, value: &str) -> Result<()> {
        let mut state = self.state.write();
        let slot = state
            .namespace_mut(namespace)?
            .get_mut(key)
            .ok_or(KvdbError::KeyNotFound)?;

        *slot = value.to_string();
        state.touch();
        Ok(())
    }

    /// Remove a key
    pub fn remove(&self, namespace: &str, key: &str) -> Result<()> {
        let mut state = self.state.write();

        if state.namespace_mut(namespace)?.remove(key).is_none() {
            return Err(KvdbError::KeyNotFound);
        }

        state.touch();
        Ok(())
    }

    // =========================================================================
    // Listing
    // =========================================================================

    /// Names of all namespaces, sorted
    pub fn list_namespaces(&self) -> Result<Vec<String>> {
        let state = self.state.read();

        if state.namespaces.is_empty() {
            return Err(KvdbError::DatabaseIsEmpty);
        }

        let mut names: Vec<String> = state.namespaces.keys().cloned().collect();
        names.sort();
        Ok(names)
    }

    /// Keys of one namespace, sorted
    ///
    /// An empty collection reports `DatabaseIsEmpty` before the namespace
    /// itself is looked up.
    pub fn list_keys(&self, namespace: &str) -> Result<Vec<String>> {
        let state = self.state.read();

        if state.namespaces.is_empty() {
            return Err(KvdbError::DatabaseIsEmpty);
        }

        let mut keys: Vec<String> = state.namespace(namespace)?.keys().cloned().collect();
        keys.sort();
        Ok(keys)
    }

    // =========================================================================
    // Snapshot Support
    // =========================================================================

    /// True when mutations happened since the last `mark_saved`
    pub fn is_dirty(&self) -> bool {
        let state = self.state.read();
        state.version != state.saved_version
    }

    /// Run `f` over the whole collection under the read lock
    ///
    /// Returns `f`'s result and the version it observed. Pass that version
    /// to `mark_saved` once the result has been made durable.
    pub fn read_all<R>(&self, f: impl FnOnce(&Namespaces) -> R) -> (R, u64) {
        let state = self.state.read();
        (f(&state.namespaces), state.version)
    }

    /// Record that everything up to `version` is on disk
    ///
    /// Mutations newer than `version` keep the store dirty.
    pub fn mark_saved(&self, version: u64) {
        let mut state = self.state.write();
        if version > state.saved_version {
            state.saved_version = version;
        }
    }

    /// Deep copy of the collection
    pub fn to_namespaces(&self) -> Namespaces {
        self.read_all(|namespaces| namespaces.clone()).0
    }

    /// Number of namespaces
    pub fn namespace_count(&self) -> usize {
        self.state.read().namespaces.len()
    }
}

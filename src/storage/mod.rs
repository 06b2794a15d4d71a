//! Storage Module
//!
//! In-memory namespace collection guarded by a single lock.
//!
//! ## Responsibilities
//! - Namespace and key CRUD with exact-match lookups
//! - Listing of namespaces and keys
//! - Dirty tracking for the backup service
//!
//! ## Layout
//! ```text
//! Store
//! └── RwLock<StoreState>
//!     ├── namespaces: { "users": { "alice": "hello", ... }, ... }
//!     ├── version        (bumped by every successful mutation)
//!     └── saved_version  (version covered by the last snapshot on disk)
//! ```

mod store;

pub use store::Store;

use std::collections::HashMap;

/// Key to value mapping inside one namespace
pub type KeyMap = HashMap<String, String>;

/// Namespace name to key-map
pub type Namespaces = HashMap<String, KeyMap>;

//! # kvdb
//!
//! A namespaced key-value store with:
//! - A small line-oriented query language over TCP
//! - One coarse RwLock over all namespaces
//! - Dirty-tracked periodic snapshots and a final save on shutdown
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                      TCP Server                              │
//! │              (one thread per connection)                     │
//! └─────────────────────┬───────────────────────────────────────┘
//!                       │  "SET users.alice \"hello\"\n"
//! ┌─────────────────────▼───────────────────────────────────────┐
//! │                 Parser → Engine dispatch                     │
//! └─────────────────────┬───────────────────────────────────────┘
//!                       │
//!                       ▼
//!                ┌─────────────┐   read lock   ┌───────────────┐
//!                │    Store    │◀──────────────│ BackupService │
//!                │  (RwLock)   │               │    (timer)    │
//!                └─────────────┘               └───────┬───────┘
//!                                                      ▼
//!                                               snapshot file
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod config;

pub mod storage;
pub mod protocol;
pub mod engine;
pub mod backup;
pub mod network;
pub mod shutdown;

// =============================================================================
// Public API Re-exports
// =============================================================================

pub use error::{KvdbError, Result};
pub use config::Config;
pub use engine::Engine;
pub use shutdown::Shutdown;

// =============================================================================
// Version Info
// =============================================================================

/// Current version of kvdb
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

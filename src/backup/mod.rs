//! Backup Module
//!
//! Durable snapshots of the whole namespace collection.
//!
//! ## Responsibilities
//! - Encode/decode the snapshot file format
//! - Seed the store on startup
//! - Periodic, dirty-gated saves plus one final save on shutdown
//! - Read-only tree rendering of a snapshot for inspection
//!
//! ## File Format
//! ```text
//! ┌──────────┬────────────┬──────────┬──────────────────────────┐
//! │Magic (4) │Version (2) │ CRC (4)  │ bincode(SnapshotData)    │
//! └──────────┴────────────┴──────────┴──────────────────────────┘
//! ```
//! Integers are big-endian; the CRC32 covers the payload only.

pub mod snapshot;
mod service;
mod tree;

pub use service::BackupService;
pub use tree::{overview, render_tree};

//! Backup service
//!
//! Timer thread that saves the store when it is dirty.

use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;

use crossbeam::channel::{self, select};

use crate::error::Result;
use crate::shutdown::Shutdown;
use crate::storage::Store;

use super::snapshot;

/// Writes snapshots of a store to one file
pub struct BackupService {
    store: Arc<Store>,
    path: PathBuf,
}

impl BackupService {
    pub fn new(store: Arc<Store>, path: impl Into<PathBuf>) -> Self {
        Self {
            store,
            path: path.into(),
        }
    }

    /// Snapshot file this service writes
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Save the store if it is dirty
    ///
    /// Returns `Ok(true)` when a file was written. The collection is encoded
    /// under the store's read lock; the file is written after the lock is
    /// released, and only the version that was encoded is marked saved.
    /// On error the store stays dirty so the next attempt retries.
    pub fn perform_backup(&self) -> Result<bool> {
        if !self.store.is_dirty() {
            return Ok(false);
        }

        let (encoded, version) = self.store.read_all(snapshot::encode);
        snapshot::save(&self.path, &encoded?)?;
        self.store.mark_saved(version);

        Ok(true)
    }

    fn backup_logged(&self) {
        match self.perform_backup() {
            Ok(true) => tracing::info!("Database backup completed: {}", self.path.display()),
            Ok(false) => tracing::trace!("Backup skipped, no changes"),
            Err(e) => tracing::error!("Backup to {} failed: {}", self.path.display(), e),
        }
    }

    /// Run the timer loop until shutdown, then save one last time
    pub fn run(&self, interval: Duration, shutdown: &Shutdown) {
        let ticker = channel::tick(interval);
        let done = shutdown.receiver().clone();

        loop {
            select! {
                recv(ticker) -> _ => self.backup_logged(),
                recv(done) -> _ => {
                    tracing::info!("Backing up database before shutdown...");
                    self.backup_logged();
                    return;
                }
            }
        }
    }

    /// Run the timer loop on a dedicated thread
    pub fn spawn(self, interval: Duration, shutdown: Shutdown) -> io::Result<JoinHandle<()>> {
        thread::Builder::new()
            .name("kvdb-backup".to_string())
            .spawn(move || {
                tracing::debug!(
                    "Backup service started: every {:?} to {}",
                    interval,
                    self.path.display()
                );
                self.run(interval, &shutdown);
                tracing::debug!("Backup service stopped");
            })
    }
}

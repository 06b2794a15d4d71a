//! Configuration for kvdb
//!
//! Centralized configuration with sensible defaults.

use std::path::PathBuf;

use crate::error::{KvdbError, Result};

/// Default TCP port of the query protocol
pub const DEFAULT_PORT: u16 = 5511;

/// Default interval between backup attempts (milliseconds)
pub const DEFAULT_BACKUP_INTERVAL_MS: u64 = 60_000;

/// Default upper bound on one query line (bytes, without the newline)
pub const DEFAULT_MAX_QUERY_LEN: usize = 64 * 1024;

/// Main configuration for a kvdb server
#[derive(Debug, Clone)]
pub struct Config {
    // -------------------------------------------------------------------------
    // Network Configuration
    // -------------------------------------------------------------------------
    /// Interface to bind
    pub host: String,

    /// TCP port (0 lets the OS pick one)
    pub port: u16,

    /// Longest accepted query line; longer lines are answered BAD_QUERY
    pub max_query_len: usize,

    // -------------------------------------------------------------------------
    // Backup Configuration
    // -------------------------------------------------------------------------
    /// Snapshot file. `None` runs the server purely in memory.
    pub backup_path: Option<PathBuf>,

    /// How often the backup service checks the dirty flag (milliseconds)
    pub backup_interval_ms: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: DEFAULT_PORT,
            max_query_len: DEFAULT_MAX_QUERY_LEN,
            backup_path: None,
            backup_interval_ms: DEFAULT_BACKUP_INTERVAL_MS,
        }
    }
}

impl Config {
    /// Create a new config builder
    pub fn builder() -> ConfigBuilder {
        ConfigBuilder::default()
    }

    /// `host:port` string suitable for `TcpListener::bind`
    pub fn listen_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Reject settings the server cannot run with
    pub fn validate(&self) -> Result<()> {
        if self.backup_interval_ms == 0 {
            return Err(KvdbError::Config(
                "backup interval must be greater than zero".to_string(),
            ));
        }
        if self.max_query_len == 0 {
            return Err(KvdbError::Config(
                "max query length must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }
}

/// Builder for Config
#[derive(Default)]
pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
    /// Set the interface to bind
    pub fn host(mut self, host: impl Into<String>) -> Self {
        self.config.host = host.into();
        self
    }

    /// Set the TCP port
    pub fn port(mut self, port: u16) -> Self {
        self.config.port = port;
        self
    }

    /// Set the snapshot file; this enables the backup service
    pub fn backup_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.backup_path = Some(path.into());
        self
    }

    /// Set the backup interval (in milliseconds)
    pub fn backup_interval_ms(mut self, ms: u64) -> Self {
        self.config.backup_interval_ms = ms;
        self
    }

    /// Set the maximum query line length (in bytes)
    pub fn max_query_len(mut self, len: usize) -> Self {
        self.config.max_query_len = len;
        self
    }

    pub fn build(self) -> Config {
        self.config
    }
}

//! TCP Server
//!
//! Accepts connections and hands each one to its own thread.

use std::io::ErrorKind;
use std::net::{SocketAddr, TcpListener, TcpStream};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use crate::backup::BackupService;
use crate::engine::Engine;
use crate::error::Result;
use crate::shutdown::Shutdown;

use super::connection::Connection;
use super::pool::{BufferPool, DEFAULT_BUFFER_CAPACITY};

/// How long the accept loop sleeps when no connection is pending
const ACCEPT_POLL_INTERVAL: Duration = Duration::from_millis(50);

/// Idle line buffers kept around for reuse
const POOLED_BUFFERS: usize = 64;

/// TCP server for kvdb
pub struct Server {
    engine: Arc<Engine>,
    listener: TcpListener,
    local_addr: SocketAddr,
    shutdown: Shutdown,
    pool: Arc<BufferPool>,
}

impl Server {
    /// Bind the listening socket from the engine's config
    ///
    /// Fails if the address cannot be bound.
    pub fn bind(engine: Arc<Engine>) -> Result<Self> {
        let addr = engine.config().listen_addr();
        let listener = TcpListener::bind(&addr)?;

        // Non-blocking accept so the loop can observe shutdown
        listener.set_nonblocking(true)?;
        let local_addr = listener.local_addr()?;

        Ok(Self {
            engine,
            listener,
            local_addr,
            shutdown: Shutdown::new(),
            pool: BufferPool::new(POOLED_BUFFERS, DEFAULT_BUFFER_CAPACITY),
        })
    }

    /// Address the server is actually listening on
    pub fn local_addr(&self) -> SocketAddr {
        self.local_addr
    }

    /// Handle that stops `run` when triggered
    pub fn shutdown_handle(&self) -> Shutdown {
        self.shutdown.clone()
    }

    /// Start the server (blocking until shutdown)
    ///
    /// Starts the backup service when the engine is file-backed, then accepts
    /// connections until shutdown is triggered. On shutdown the listener is
    /// closed and the backup thread is joined after its final save. Open
    /// connections are left to finish on their own.
    pub fn run(self) -> Result<()> {
        let Self {
            engine,
            listener,
            local_addr,
            shutdown,
            pool,
        } = self;

        let backup = match engine.backup_path() {
            Some(path) => {
                let interval = Duration::from_millis(engine.config().backup_interval_ms);
                let service = BackupService::new(Arc::clone(engine.store()), path);
                Some(service.spawn(interval, shutdown.clone())?)
            }
            None => None,
        };

        tracing::info!("Starting TCP server on {}", local_addr);

        let mut next_id: u64 = 0;
        while !shutdown.is_triggered() {
            match listener.accept() {
                Ok((stream, peer)) => {
                    next_id += 1;
                    spawn_connection(stream, peer, next_id, &engine, &pool);
                }
                Err(e) if e.kind() == ErrorKind::WouldBlock => {
                    shutdown.wait_timeout(ACCEPT_POLL_INTERVAL);
                }
                Err(e) if e.kind() == ErrorKind::Interrupted => {}
                Err(e) => {
                    tracing::error!("Failed to accept connection: {}", e);
                    shutdown.wait_timeout(ACCEPT_POLL_INTERVAL);
                }
            }
        }

        tracing::info!("Shutting down server...");
        drop(listener);

        if let Some(handle) = backup {
            if handle.join().is_err() {
                tracing::error!("Backup thread panicked");
            }
        }

        tracing::info!("Server stopped");
        Ok(())
    }
}

fn spawn_connection(
    stream: TcpStream,
    peer: SocketAddr,
    id: u64,
    engine: &Arc<Engine>,
    pool: &Arc<BufferPool>,
) {
    tracing::debug!("Accepted connection #{} from {}", id, peer);

    let mut connection = match setup_connection(stream, peer, engine, pool) {
        Ok(connection) => connection,
        Err(e) => {
            tracing::warn!("Failed to set up connection from {}: {}", peer, e);
            return;
        }
    };

    let spawned = thread::Builder::new()
        .name(format!("kvdb-conn-{}", id))
        .spawn(move || {
            if let Err(e) = connection.handle() {
                tracing::warn!("Connection {} ended with error: {}", connection.peer_addr(), e);
            }
        });

    if let Err(e) = spawned {
        tracing::error!("Failed to spawn thread for {}: {}", peer, e);
    }
}

fn setup_connection(
    stream: TcpStream,
    peer: SocketAddr,
    engine: &Arc<Engine>,
    pool: &Arc<BufferPool>,
) -> Result<Connection> {
    // Accepted sockets must block; only the listener polls
    stream.set_nonblocking(false)?;
    Connection::new(stream, peer, Arc::clone(engine), Arc::clone(pool))
}

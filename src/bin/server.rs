//! kvdb Server Binary
//!
//! Starts the TCP server for kvdb.

use std::path::PathBuf;
use std::sync::Arc;
use std::thread;

use clap::Parser;
use kvdb::config::{DEFAULT_BACKUP_INTERVAL_MS, DEFAULT_MAX_QUERY_LEN, DEFAULT_PORT};
use kvdb::network::Server;
use kvdb::{Config, Engine, Shutdown};
use signal_hook::consts::{SIGINT, SIGTERM};
use signal_hook::iterator::Signals;
use tracing_subscriber::{fmt, EnvFilter};

/// kvdb Server
#[derive(Parser, Debug)]
#[command(name = "kvdb-server")]
#[command(about = "Namespaced key-value store")]
#[command(version)]
struct Args {
    /// Interface to bind
    #[arg(long, env = "KVDB_HOST", default_value = "0.0.0.0")]
    host: String,

    /// Listen port
    #[arg(short, long, env = "KVDB_PORT", default_value_t = DEFAULT_PORT)]
    port: u16,

    /// Snapshot file; omit for an in-memory database
    #[arg(short, long, env = "KVDB_DATABASE")]
    database: Option<PathBuf>,

    /// Backup interval in milliseconds
    #[arg(short = 'i', long, env = "KVDB_SAVE_INTERVAL", default_value_t = DEFAULT_BACKUP_INTERVAL_MS)]
    save_interval: u64,

    /// Longest accepted query line in bytes
    #[arg(long, env = "KVDB_MAX_QUERY_LEN", default_value_t = DEFAULT_MAX_QUERY_LEN)]
    max_query_len: usize,
}

fn main() {
    // Initialize tracing/logging
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,kvdb=debug"));

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_ids(true)
        .init();

    let args = Args::parse();

    tracing::info!("kvdb v{} is starting...", kvdb::VERSION);

    // Build config from args
    let mut builder = Config::builder()
        .host(&args.host)
        .port(args.port)
        .backup_interval_ms(args.save_interval)
        .max_query_len(args.max_query_len);

    if let Some(path) = args.database.filter(|p| !p.as_os_str().is_empty()) {
        tracing::info!("Database file: {}", path.display());
        builder = builder.backup_path(path);
    }

    let config = builder.build();

    // Open engine; an unreadable snapshot is fatal
    let engine = match Engine::open(config) {
        Ok(e) => Arc::new(e),
        Err(e) => {
            tracing::error!("Failed to load database: {}", e);
            std::process::exit(1);
        }
    };

    let server = match Server::bind(engine) {
        Ok(server) => server,
        Err(e) => {
            tracing::error!("Failed to bind: {}", e);
            std::process::exit(1);
        }
    };

    if let Err(e) = install_signal_handler(server.shutdown_handle()) {
        tracing::error!("Failed to register signal handlers: {}", e);
        std::process::exit(1);
    }

    if let Err(e) = server.run() {
        tracing::error!("Server error: {}", e);
        std::process::exit(1);
    }

    tracing::info!("Goodbye");
}

/// Trigger shutdown on SIGINT or SIGTERM
fn install_signal_handler(shutdown: Shutdown) -> std::io::Result<()> {
    let mut signals = Signals::new([SIGINT, SIGTERM])?;

    thread::Builder::new()
        .name("kvdb-signals".to_string())
        .spawn(move || {
            if let Some(sig) = signals.forever().next() {
                tracing::info!("Received signal {}, initiating shutdown...", sig);
                shutdown.trigger();
            }
        })?;

    Ok(())
}

//! Network Module
//!
//! TCP server and client handling.
//!
//! ## Architecture
//! - Single acceptor thread polling a non-blocking listener
//! - One thread per connection
//! - Queries routed through Engine

mod server;
mod connection;
mod client;
mod pool;

pub use server::Server;
pub use connection::Connection;
pub use client::Client;
pub use pool::{BufferPool, PooledBuffer};

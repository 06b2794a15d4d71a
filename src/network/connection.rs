//! Connection Handler
//!
//! Runs the query/response loop for one client.

use std::io::{BufReader, BufWriter, ErrorKind};
use std::net::{SocketAddr, TcpStream};
use std::sync::Arc;

use crate::engine::Engine;
use crate::error::{KvdbError, Result};
use crate::protocol::{read_frame, write_response, ErrorCode, Frame, Response};

use super::pool::BufferPool;

/// One client session
pub struct Connection {
    /// Read half, buffered so merged queries split cleanly
    reader: BufReader<TcpStream>,

    /// Write half; flushed after every response
    writer: BufWriter<TcpStream>,

    /// Shared query engine
    engine: Arc<Engine>,

    /// Line buffers, one checked out per read
    pool: Arc<BufferPool>,

    /// Longest accepted query line
    max_query_len: usize,

    /// Remote address, for logs
    peer: SocketAddr,
}

impl Connection {
    /// Wrap an accepted, blocking stream
    pub fn new(
        stream: TcpStream,
        peer: SocketAddr,
        engine: Arc<Engine>,
        pool: Arc<BufferPool>,
    ) -> Result<Self> {
        // Responses are one short line; don't let Nagle hold them back
        stream.set_nodelay(true)?;

        let max_query_len = engine.config().max_query_len;
        let reader = BufReader::new(stream.try_clone()?);

        Ok(Self {
            reader,
            writer: BufWriter::new(stream),
            engine,
            pool,
            max_query_len,
            peer,
        })
    }

    /// Serve queries until the client goes away
    ///
    /// Every frame gets exactly one response line. Domain failures are just
    /// responses; only I/O problems end the loop, and a client hanging up is
    /// not reported as an error.
    pub fn handle(&mut self) -> Result<()> {
        tracing::debug!("Serving client {}", self.peer);

        while let Some(frame) = self.next_frame()? {
            let response = match frame {
                Frame::Line(line) => {
                    tracing::trace!("Query from {}: {:?}", self.peer, line);
                    self.engine.execute_line(&line)
                }
                Frame::Invalid => {
                    tracing::debug!("Rejected oversized or non-UTF-8 line from {}", self.peer);
                    Response::error(ErrorCode::BadQuery)
                }
            };

            match write_response(&mut self.writer, &response) {
                Ok(()) => {}
                Err(KvdbError::Io(ref e)) if is_disconnect(e.kind()) => {
                    tracing::debug!("Client {} left before its response was sent: {}", self.peer, e);
                    return Ok(());
                }
                Err(e) => {
                    tracing::warn!("Error writing to {}: {}", self.peer, e);
                    return Err(e);
                }
            }
        }

        tracing::debug!("Client {} disconnected", self.peer);
        Ok(())
    }

    /// Read the next frame; `None` once the client has hung up
    fn next_frame(&mut self) -> Result<Option<Frame>> {
        let mut buf = self.pool.checkout();
        match read_frame(&mut self.reader, &mut buf, self.max_query_len) {
            Err(KvdbError::Io(ref e)) if is_disconnect(e.kind()) => {
                tracing::debug!("Connection to {} dropped: {}", self.peer, e);
                Ok(None)
            }
            Err(e) => {
                tracing::warn!("Error reading from {}: {}", self.peer, e);
                Err(e)
            }
            other => other,
        }
    }

    /// Remote address of the client
    pub fn peer_addr(&self) -> SocketAddr {
        self.peer
    }
}

fn is_disconnect(kind: ErrorKind) -> bool {
    matches!(
        kind,
        ErrorKind::UnexpectedEof
            | ErrorKind::ConnectionReset
            | ErrorKind::ConnectionAborted
            | ErrorKind::BrokenPipe
    )
}

//! Blocking client
//!
//! Sends query lines and reads back one response line each.

use std::io::{BufReader, BufWriter};
use std::net::{TcpStream, ToSocketAddrs};

use crate::error::{KvdbError, Result};
use crate::protocol::{read_response_line, write_query};

/// A connection to a kvdb server
pub struct Client {
    reader: BufReader<TcpStream>,
    writer: BufWriter<TcpStream>,
}

impl Client {
    /// Connect to a server
    pub fn connect(addr: impl ToSocketAddrs) -> Result<Self> {
        let stream = TcpStream::connect(addr)?;
        stream.set_nodelay(true)?;

        let read_stream = stream.try_clone()?;
        Ok(Self {
            reader: BufReader::new(read_stream),
            writer: BufWriter::new(stream),
        })
    }

    /// Send one query and wait for its response
    pub fn query(&mut self, query: &str) -> Result<String> {
        write_query(&mut self.writer, query)?;
        read_response_line(&mut self.reader)?.ok_or_else(|| {
            KvdbError::Io(std::io::Error::new(
                std::io::ErrorKind::UnexpectedEof,
                "server closed the connection",
            ))
        })
    }
}

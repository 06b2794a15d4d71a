//! Protocol codec
//!
//! Newline framing for queries and responses.
//!
//! ## Wire Format
//! ```text
//! client → server:  <query text> \n        (a trailing \r is ignored)
//! server → client:  <response text> \n
//! ```
//!
//! Framing is by line, not by read: several queries in one segment are read
//! one after another, and a query split across segments is reassembled.

use std::io::{BufRead, Read, Write};

use crate::error::Result;
use super::Response;

/// One framed message from the client
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Frame {
    /// A complete line without its terminator
    Line(String),

    /// A line that was too long or not UTF-8; it has been consumed
    Invalid,
}

// =============================================================================
// Server side
// =============================================================================

/// Read the next query line
///
/// `buf` is scratch space and is cleared first. Returns `Ok(None)` on clean
/// end of stream. An unterminated last line before EOF is returned as a
/// normal line.
pub fn read_frame<R: BufRead>(
    reader: &mut R,
    buf: &mut Vec<u8>,
    max_len: usize,
) -> Result<Option<Frame>> {
    buf.clear();

    // Room for the line plus "\r\n"
    let limit = max_len as u64 + 2;
    let read = reader.by_ref().take(limit).read_until(b'\n', buf)?;

    if read == 0 {
        return Ok(None);
    }

    let terminated = buf.last() == Some(&b'\n');
    if !terminated && read as u64 == limit {
        discard_line(reader)?;
        return Ok(Some(Frame::Invalid));
    }

    if terminated {
        buf.pop();
        if buf.last() == Some(&b'\r') {
            buf.pop();
        }
    }

    if buf.len() > max_len {
        return Ok(Some(Frame::Invalid));
    }

    match std::str::from_utf8(buf) {
        Ok(line) => Ok(Some(Frame::Line(line.to_string()))),
        Err(_) => Ok(Some(Frame::Invalid)),
    }
}

/// Skip the rest of an oversized line, up to and including its newline
fn discard_line<R: BufRead>(reader: &mut R) -> Result<()> {
    loop {
        let available = reader.fill_buf()?;
        if available.is_empty() {
            return Ok(());
        }

        match available.iter().position(|&b| b == b'\n') {
            Some(pos) => {
                reader.consume(pos + 1);
                return Ok(());
            }
            None => {
                let len = available.len();
                reader.consume(len);
            }
        }
    }
}

/// Encode a response to bytes
///
/// Format: response text + '\n'
pub fn encode_response(response: &Response) -> Vec<u8> {
    let mut message = response.to_string().into_bytes();
    message.push(b'\n');
    message
}

/// Write a response to a stream
pub fn write_response<W: Write>(writer: &mut W, response: &Response) -> Result<()> {
    writer.write_all(&encode_response(response))?;
    writer.flush()?;
    Ok(())
}

// =============================================================================
// Client side
// =============================================================================

/// Write one query line to a stream
pub fn write_query<W: Write>(writer: &mut W, query: &str) -> Result<()> {
    writer.write_all(query.as_bytes())?;
    writer.write_all(b"\n")?;
    writer.flush()?;
    Ok(())
}

/// Read one response line; `None` if the server closed the stream
pub fn read_response_line<R: BufRead>(reader: &mut R) -> Result<Option<String>> {
    let mut line = String::new();
    if reader.read_line(&mut line)? == 0 {
        return Ok(None);
    }

    if line.ends_with('\n') {
        line.pop();
    }
    Ok(Some(line))
}

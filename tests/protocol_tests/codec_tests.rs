//! Codec Tests
//!
//! Tests for newline framing of queries and responses.

use std::io::{BufReader, Cursor};

use kvdb::protocol::{
    encode_response, read_frame, read_response_line, write_query, write_response, ErrorCode,
    Frame, Response,
};

const MAX: usize = 64;

fn frames(input: &[u8], max_len: usize) -> Vec<Frame> {
    let mut reader = Cursor::new(input.to_vec());
    let mut buf = Vec::new();
    let mut out = Vec::new();
    while let Some(frame) = read_frame(&mut reader, &mut buf, max_len).unwrap() {
        out.push(frame);
    }
    out
}

fn line(s: &str) -> Frame {
    Frame::Line(s.to_string())
}

// =============================================================================
// Query Framing
// =============================================================================

#[test]
fn test_single_line() {
    assert_eq!(frames(b"LIST\n", MAX), vec![line("LIST")]);
}

#[test]
fn test_merged_queries_are_split() {
    assert_eq!(
        frames(b"CREATEDB a\nLIST\nGET a.b\n", MAX),
        vec![line("CREATEDB a"), line("LIST"), line("GET a.b")]
    );
}

#[test]
fn test_crlf_is_stripped() {
    assert_eq!(frames(b"LIST\r\nLIST a\r\n", MAX), vec![line("LIST"), line("LIST a")]);
}

#[test]
fn test_unterminated_last_line() {
    assert_eq!(frames(b"LIST\nGET a.b", MAX), vec![line("LIST"), line("GET a.b")]);
}

#[test]
fn test_empty_stream() {
    assert!(frames(b"", MAX).is_empty());
}

#[test]
fn test_blank_line_is_a_frame() {
    assert_eq!(frames(b"\nLIST\n", MAX), vec![line(""), line("LIST")]);
}

#[test]
fn test_split_reads_are_reassembled() {
    // A tiny BufReader capacity forces the line across many fills
    let data = b"SET users.alice \"hello\"\n".to_vec();
    let mut reader = BufReader::with_capacity(3, Cursor::new(data));
    let mut buf = Vec::new();

    let frame = read_frame(&mut reader, &mut buf, MAX).unwrap();
    assert_eq!(frame, Some(line("SET users.alice \"hello\"")));
    assert_eq!(read_frame(&mut reader, &mut buf, MAX).unwrap(), None);
}

#[test]
fn test_oversized_line_is_discarded() {
    let mut input = vec![b'x'; 200];
    input.extend_from_slice(b"\nLIST\n");

    assert_eq!(frames(&input, 16), vec![Frame::Invalid, line("LIST")]);
}

#[test]
fn test_line_at_limit_is_accepted() {
    let body = "a".repeat(16);
    let input = format!("{}\r\n{}\n", body, body);
    assert_eq!(frames(input.as_bytes(), 16), vec![line(&body), line(&body)]);
}

#[test]
fn test_line_just_over_limit_is_invalid() {
    let body = "a".repeat(17);
    let input = format!("{}\nLIST\n", body);
    assert_eq!(frames(input.as_bytes(), 16), vec![Frame::Invalid, line("LIST")]);
}

#[test]
fn test_invalid_utf8() {
    assert_eq!(
        frames(b"GET \xff\xfe.a\nLIST\n", MAX),
        vec![Frame::Invalid, line("LIST")]
    );
}

// =============================================================================
// Response Encoding
// =============================================================================

#[test]
fn test_encode_responses() {
    assert_eq!(encode_response(&Response::Ok), b"OK\n");
    assert_eq!(encode_response(&Response::Value("hello".into())), b"hello\n");
    assert_eq!(
        encode_response(&Response::error(ErrorCode::KeyNotFound)),
        b"KEY_NOT_FOUND\n"
    );
    assert_eq!(
        encode_response(&Response::List(vec!["a".into(), "b".into()])),
        b"a b\n"
    );
    assert_eq!(encode_response(&Response::List(Vec::new())), b"\n");
}

#[test]
fn test_write_then_read_response_lines() {
    let mut wire = Vec::new();
    write_response(&mut wire, &Response::Ok).unwrap();
    write_response(&mut wire, &Response::Value(String::new())).unwrap();
    write_response(&mut wire, &Response::error(ErrorCode::AlreadyExists)).unwrap();

    let mut reader = Cursor::new(wire);
    assert_eq!(read_response_line(&mut reader).unwrap().as_deref(), Some("OK"));
    assert_eq!(read_response_line(&mut reader).unwrap().as_deref(), Some(""));
    assert_eq!(
        read_response_line(&mut reader).unwrap().as_deref(),
        Some("ALREADY_EXISTS")
    );
    assert_eq!(read_response_line(&mut reader).unwrap(), None);
}

#[test]
fn test_write_query_appends_newline() {
    let mut wire = Vec::new();
    write_query(&mut wire, "LIST").unwrap();
    assert_eq!(wire, b"LIST\n");
}

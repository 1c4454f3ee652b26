use std::collections::HashMap;
use std::io;

use thiserror::Error;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncReadExt};

use crate::http::request::Request;

/// Longest request or header line accepted, line ending included.
pub const MAX_LINE_LEN: u64 = 8192;

#[derive(Debug, Error)]
pub enum ParseError {
    #[error("malformed request line")]
    MalformedRequestLine,

    #[error("connection closed before a request line was received")]
    ConnectionClosed,

    #[error("failed to read request line: {0}")]
    Io(#[from] io::Error),
}

/// Reads one request head from `reader`.
///
/// Only the request line is validated strictly. Once it has been read, any
/// failure while reading headers (EOF, I/O error, oversized line) simply ends
/// the header block and the headers collected so far are kept. The body, if
/// any, is never consumed.
pub async fn read_request<R>(reader: &mut R) -> Result<Request, ParseError>
where
    R: AsyncBufRead + Unpin,
{
    let request_line = match read_line(reader).await {
        Ok(Some(line)) => line,
        Ok(None) => return Err(ParseError::ConnectionClosed),
        Err(e) if e.kind() == io::ErrorKind::InvalidData => {
            return Err(ParseError::MalformedRequestLine);
        }
        Err(e) => return Err(e.into()),
    };

    let (method, path, version) = parse_request_line(&request_line)?;

    let mut headers = HashMap::new();
    loop {
        let line = match read_line(reader).await {
            Ok(Some(line)) => line,
            Ok(None) | Err(_) => break,
        };

        if line.is_empty() {
            break;
        }

        if let Some((name, value)) = parse_header_line(&line) {
            headers.insert(name, value);
        }
    }

    Ok(Request {
        method,
        path,
        version,
        headers,
    })
}

/// Splits a request line into method, target and version.
pub fn parse_request_line(line: &str) -> Result<(String, String, String), ParseError> {
    let parts: Vec<&str> = line.split_whitespace().collect();

    match parts.as_slice() {
        [method, target, version] => Ok((
            method.to_string(),
            target.to_string(),
            version.to_string(),
        )),
        _ => Err(ParseError::MalformedRequestLine),
    }
}

/// Splits a header line at its first colon.
///
/// Returns `None` for lines without a colon or starting with one. A name made
/// only of whitespace trims down to the empty key.
pub fn parse_header_line(line: &str) -> Option<(String, String)> {
    let (name, value) = line.split_once(':')?;

    if name.is_empty() {
        return None;
    }

    Some((name.trim().to_ascii_lowercase(), value.trim().to_string()))
}

/// Reads a single line, stripping the trailing LF or CRLF.
///
/// `Ok(None)` means the stream ended before any byte arrived. A line longer
/// than [`MAX_LINE_LEN`] yields an `InvalidData` error.
async fn read_line<R>(reader: &mut R) -> io::Result<Option<String>>
where
    R: AsyncBufRead + Unpin,
{
    let mut buf = Vec::new();
    let n = (&mut *reader)
        .take(MAX_LINE_LEN)
        .read_until(b'\n', &mut buf)
        .await?;

    if n == 0 {
        return Ok(None);
    }

    if buf.last() == Some(&b'\n') {
        buf.pop();
        if buf.last() == Some(&b'\r') {
            buf.pop();
        }
    } else if n as u64 >= MAX_LINE_LEN {
        return Err(io::Error::new(io::ErrorKind::InvalidData, "line too long"));
    }

    Ok(Some(String::from_utf8_lossy(&buf).into_owned()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn parse_simple_get() {
        let mut raw: &[u8] = b"GET / HTTP/1.1\r\nHost: example.com\r\n\r\n";

        let parsed = read_request(&mut raw).await.unwrap();

        assert_eq!(parsed.path, "/");
        assert_eq!(parsed.headers.get("host").unwrap(), "example.com");
        assert!(raw.is_empty());
    }

    #[tokio::test]
    async fn body_is_left_unread() {
        let mut raw: &[u8] = b"GET / HTTP/1.1\r\nContent-Length: 5\r\n\r\nhello";

        read_request(&mut raw).await.unwrap();

        assert_eq!(raw, b"hello");
    }

    #[tokio::test]
    async fn oversized_request_line_is_malformed() {
        let line = format!("GET /{} HTTP/1.1\r\n\r\n", "a".repeat(MAX_LINE_LEN as usize));
        let mut raw = line.as_bytes();

        let result = read_request(&mut raw).await;

        assert!(matches!(result, Err(ParseError::MalformedRequestLine)));
    }

    #[tokio::test]
    async fn oversized_header_line_ends_headers() {
        let raw = format!(
            "GET / HTTP/1.1\r\nHost: a\r\nX-Big: {}\r\nAccept: */*\r\n\r\n",
            "b".repeat(MAX_LINE_LEN as usize)
        );
        let mut raw = raw.as_bytes();

        let parsed = read_request(&mut raw).await.unwrap();

        assert_eq!(parsed.header("host"), Some("a"));
        assert_eq!(parsed.header("x-big"), None);
    }
}

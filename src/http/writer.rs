use std::time::SystemTime;

use bytes::{BufMut, BytesMut};
use tokio::io::{AsyncWrite, AsyncWriteExt};

use crate::SERVER_ID;
use crate::http::response::Response;

const HTTP_VERSION: &str = "HTTP/1.1";

/// Serializes the status line and header block, blank line included.
pub fn serialize_head(resp: &Response, now: SystemTime) -> BytesMut {
    let mut buf = BytesMut::with_capacity(256);

    // Status line
    let status_line = format!(
        "{} {} {}\r\n",
        HTTP_VERSION,
        resp.status.as_u16(),
        resp.status.reason_phrase()
    );
    buf.put_slice(status_line.as_bytes());

    put_header(&mut buf, "Content-Type", &resp.content_type);
    put_header(&mut buf, "Content-Length", &resp.body.len().to_string());
    put_header(&mut buf, "Connection", "close");
    put_header(&mut buf, "Server", SERVER_ID);
    put_header(&mut buf, "Date", &httpdate::fmt_http_date(now));

    // Header/body separator
    buf.put_slice(b"\r\n");

    buf
}

fn put_header(buf: &mut BytesMut, name: &str, value: &str) {
    buf.put_slice(name.as_bytes());
    buf.put_slice(b": ");
    buf.put_slice(value.as_bytes());
    buf.put_slice(b"\r\n");
}

/// Writes `resp` as a header block followed by the body.
///
/// The body write is skipped when empty. Errors are returned as-is; the
/// caller drops the connection without retrying.
pub async fn write_response<W>(stream: &mut W, resp: &Response) -> std::io::Result<()>
where
    W: AsyncWrite + Unpin,
{
    let head = serialize_head(resp, SystemTime::now());
    stream.write_all(&head).await?;

    if !resp.body.is_empty() {
        stream.write_all(&resp.body).await?;
    }

    stream.flush().await
}

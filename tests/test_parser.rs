use pubserve::http::parser::{ParseError, parse_header_line, parse_request_line, read_request};

async fn parse(raw: &[u8]) -> Result<pubserve::http::request::Request, ParseError> {
    let mut reader = raw;
    read_request(&mut reader).await
}

#[tokio::test]
async fn test_parse_simple_get_request() {
    let parsed = parse(b"GET / HTTP/1.1\r\nHost: example.com\r\n\r\n").await.unwrap();

    assert_eq!(parsed.method, "GET");
    assert_eq!(parsed.path, "/");
    assert_eq!(parsed.version, "HTTP/1.1");
    assert_eq!(parsed.headers.get("host").unwrap(), "example.com");
}

#[tokio::test]
async fn test_parse_request_line_fields_are_positional() {
    let parsed = parse(b"BREW /pot-1?milk=yes HTCPCP/1.0\r\n\r\n").await.unwrap();

    assert_eq!(parsed.method, "BREW");
    assert_eq!(parsed.path, "/pot-1?milk=yes");
    assert_eq!(parsed.version, "HTCPCP/1.0");
}

#[tokio::test]
async fn test_parse_request_line_with_extra_whitespace() {
    let parsed = parse(b"GET \t /a.txt   HTTP/1.1\r\n\r\n").await.unwrap();

    assert_eq!(parsed.path, "/a.txt");
}

#[tokio::test]
async fn test_parse_too_few_tokens() {
    let result = parse(b"GET /\r\n\r\n").await;

    assert!(matches!(result, Err(ParseError::MalformedRequestLine)));
}

#[tokio::test]
async fn test_parse_too_many_tokens() {
    let result = parse(b"GET / HTTP/1.1 extra\r\n\r\n").await;

    assert!(matches!(result, Err(ParseError::MalformedRequestLine)));
}

#[tokio::test]
async fn test_parse_empty_request_line() {
    let result = parse(b"\r\n\r\n").await;

    assert!(matches!(result, Err(ParseError::MalformedRequestLine)));
}

#[tokio::test]
async fn test_parse_closed_before_request_line() {
    let result = parse(b"").await;

    assert!(matches!(result, Err(ParseError::ConnectionClosed)));
}

#[tokio::test]
async fn test_parse_header_names_are_lowercased_and_trimmed() {
    let parsed = parse(b"GET / HTTP/1.1\r\n  User-Agent  :   test-client  \r\nACCEPT: */*\r\n\r\n")
        .await
        .unwrap();

    assert_eq!(parsed.headers.get("user-agent").unwrap(), "test-client");
    assert_eq!(parsed.headers.get("accept").unwrap(), "*/*");
    assert!(parsed.headers.keys().all(|k| k == &k.trim().to_lowercase()));
}

#[tokio::test]
async fn test_parse_header_splits_at_first_colon() {
    let parsed = parse(b"GET / HTTP/1.1\r\nHost: localhost:8080\r\n\r\n").await.unwrap();

    assert_eq!(parsed.header("host"), Some("localhost:8080"));
}

#[tokio::test]
async fn test_parse_header_without_colon_is_skipped() {
    let parsed = parse(b"GET / HTTP/1.1\r\nHost: a\r\nBrokenHeader\r\nAccept: b\r\n\r\n")
        .await
        .unwrap();

    assert_eq!(parsed.headers.len(), 2);
    assert_eq!(parsed.header("host"), Some("a"));
    assert_eq!(parsed.header("accept"), Some("b"));
}

#[tokio::test]
async fn test_parse_last_header_occurrence_wins() {
    let parsed = parse(b"GET / HTTP/1.1\r\nX-Id: 1\r\nx-id: 2\r\n\r\n").await.unwrap();

    assert_eq!(parsed.headers.len(), 1);
    assert_eq!(parsed.header("x-id"), Some("2"));
}

#[tokio::test]
async fn test_parse_eof_during_headers_keeps_partial_headers() {
    let parsed = parse(b"GET /x HTTP/1.1\r\nHost: example.com\r\n").await.unwrap();

    assert_eq!(parsed.path, "/x");
    assert_eq!(parsed.header("host"), Some("example.com"));
}

#[tokio::test]
async fn test_parse_bare_lf_line_endings() {
    let parsed = parse(b"GET /a HTTP/1.0\nHost: example.com\n\n").await.unwrap();

    assert_eq!(parsed.version, "HTTP/1.0");
    assert_eq!(parsed.header("host"), Some("example.com"));
}

#[test]
fn test_parse_request_line_helper() {
    let (method, target, version) = parse_request_line("GET /index.html HTTP/1.1").unwrap();

    assert_eq!(method, "GET");
    assert_eq!(target, "/index.html");
    assert_eq!(version, "HTTP/1.1");
}

#[test]
fn test_parse_header_line_helper() {
    assert_eq!(
        parse_header_line("Content-Type: text/html"),
        Some(("content-type".to_string(), "text/html".to_string()))
    );
    assert_eq!(parse_header_line("no colon here"), None);
    assert_eq!(parse_header_line(": value"), None);
    assert_eq!(
        parse_header_line("   : v"),
        Some((String::new(), "v".to_string()))
    );
    assert_eq!(
        parse_header_line("X-Empty:"),
        Some(("x-empty".to_string(), String::new()))
    );
}

#[tokio::test]
async fn test_parse_whitespace_only_header_name_is_kept() {
    let parsed = parse(b"GET / HTTP/1.1\r\n   : v\r\n: skipped\r\nHost: a\r\n\r\n")
        .await
        .unwrap();

    assert_eq!(parsed.headers.len(), 2);
    assert_eq!(parsed.headers.get("").unwrap(), "v");
    assert_eq!(parsed.header("host"), Some("a"));
}

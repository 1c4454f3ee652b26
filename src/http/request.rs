use std::collections::HashMap;

/// Represents a parsed HTTP request from a client.
///
/// Contains everything extracted from the request line and the header block.
/// No body is ever read, so there is no body field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Request {
    /// The HTTP method token exactly as sent (e.g. "GET")
    pub method: String,
    /// The raw request target, query string included (e.g. "/index.html?v=2")
    pub path: String,
    /// HTTP version token (typically "HTTP/1.1"), not validated
    pub version: String,
    /// Headers keyed by lowercased, trimmed name; the last occurrence wins
    pub headers: HashMap<String, String>,
}

/// Builder for constructing Request objects.
///
/// The parser fills [`Request`] directly; this builder is for callers that
/// route requests without a socket, such as tests driving `handle_request`.
pub struct RequestBuilder {
    method: Option<String>,
    path: Option<String>,
    version: Option<String>,
    headers: HashMap<String, String>,
}

impl RequestBuilder {
    pub fn new() -> Self {
        Self {
            method: None,
            path: None,
            version: None,
            headers: HashMap::new(),
        }
    }

    pub fn method(mut self, method: impl Into<String>) -> Self {
        self.method = Some(method.into());
        self
    }

    pub fn path(mut self, path: impl Into<String>) -> Self {
        self.path = Some(path.into());
        self
    }

    pub fn version(mut self, version: impl Into<String>) -> Self {
        self.version = Some(version.into());
        self
    }

    /// Adds a header, normalizing the name the same way the parser does.
    pub fn header(mut self, key: &str, value: &str) -> Self {
        self.headers.insert(key.trim().to_ascii_lowercase(), value.trim().to_string());
        self
    }

    pub fn build(self) -> Result<Request, &'static str> {
        Ok(Request {
            method: self.method.ok_or("method missing")?,
            path: self.path.ok_or("path missing")?,
            version: self.version.unwrap_or_else(|| "HTTP/1.1".to_string()),
            headers: self.headers,
        })
    }
}

impl Default for RequestBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl Request {
    /// Retrieves a header value by name, ignoring ASCII case.
    ///
    /// # Example
    ///
    /// ```
    /// # use pubserve::http::request::RequestBuilder;
    /// let req = RequestBuilder::new()
    ///     .method("GET")
    ///     .path("/")
    ///     .header("Host", "example.com")
    ///     .build()
    ///     .unwrap();
    /// assert_eq!(req.header("HOST"), Some("example.com"));
    /// ```
    pub fn header(&self, key: &str) -> Option<&str> {
        self.headers.get(&key.to_ascii_lowercase()).map(|v| v.as_str())
    }

    pub fn is_get(&self) -> bool {
        self.method == "GET"
    }
}

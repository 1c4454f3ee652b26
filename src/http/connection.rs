use std::io;
use std::sync::Arc;
use std::time::Duration;

use thiserror::Error;
use tokio::io::{AsyncRead, AsyncWrite, AsyncWriteExt, BufReader};
use tokio::time::{Instant, timeout_at};
use tracing::{debug, error, info, warn};

use crate::http::mime::content_type_for;
use crate::http::parser::read_request;
use crate::http::request::Request;
use crate::http::resolver::{PathResolver, ResolveError};
use crate::http::response::Response;
use crate::http::writer::write_response;

/// Read and write deadline applied to every connection.
pub const IO_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Debug, Error)]
pub enum ConnectionError {
    #[error("{0} deadline expired")]
    Timeout(&'static str),

    #[error("write failed: {0}")]
    Io(#[from] io::Error),
}

/// One client connection, served exactly once and then closed.
pub struct Connection<S> {
    stream: S,
    resolver: Arc<PathResolver>,
    timeout: Duration,
    accepted_at: Instant,
    read_deadline: Instant,
    write_deadline: Instant,
    request_line: Option<(String, String)>,
    state: ConnectionState,
}

pub enum ConnectionState {
    Accepted,
    Parsing,
    Routing(Request),
    Responding(Response),
    Closed,
}

impl<S> Connection<S>
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    pub fn new(stream: S, resolver: Arc<PathResolver>) -> Self {
        Self::with_timeout(stream, resolver, IO_TIMEOUT)
    }

    pub fn with_timeout(stream: S, resolver: Arc<PathResolver>, timeout: Duration) -> Self {
        let now = Instant::now();
        Self {
            stream,
            resolver,
            timeout,
            accepted_at: now,
            read_deadline: now + timeout,
            write_deadline: now + timeout,
            request_line: None,
            state: ConnectionState::Accepted,
        }
    }

    /// Drives the connection from `Accepted` to `Closed`.
    ///
    /// An expired deadline or a failed write aborts the connection without a
    /// response; the error is returned for logging only.
    pub async fn run(&mut self) -> Result<(), ConnectionError> {
        loop {
            match std::mem::replace(&mut self.state, ConnectionState::Closed) {
                ConnectionState::Accepted => {
                    let now = Instant::now();
                    self.accepted_at = now;
                    self.read_deadline = now + self.timeout;
                    self.write_deadline = now + self.timeout;
                    self.state = ConnectionState::Parsing;
                }

                ConnectionState::Parsing => {
                    let mut reader = BufReader::new(&mut self.stream);
                    let parsed = timeout_at(self.read_deadline, read_request(&mut reader))
                        .await
                        .map_err(|_| ConnectionError::Timeout("read"))?;

                    self.state = match parsed {
                        Ok(req) => ConnectionState::Routing(req),
                        Err(e) => {
                            debug!(error = %e, "bad request");
                            ConnectionState::Responding(Response::bad_request())
                        }
                    };
                }

                ConnectionState::Routing(req) => {
                    self.request_line = Some((req.method.clone(), req.path.clone()));
                    let response = handle_request(&req, &self.resolver).await;
                    self.state = ConnectionState::Responding(response);
                }

                ConnectionState::Responding(response) => {
                    let stream = &mut self.stream;
                    timeout_at(self.write_deadline, async {
                        write_response(stream, &response).await?;
                        stream.shutdown().await
                    })
                    .await
                    .map_err(|_| ConnectionError::Timeout("write"))??;

                    self.log_response(&response);
                    self.state = ConnectionState::Closed;
                }

                ConnectionState::Closed => {
                    break;
                }
            }
        }

        Ok(())
    }

    fn log_response(&self, response: &Response) {
        let (method, path) = match &self.request_line {
            Some((method, path)) => (method.as_str(), path.as_str()),
            None => ("-", "-"),
        };

        info!(
            method = %method,
            path = %path,
            status = response.status.as_u16(),
            bytes = response.body.len(),
            elapsed_ms = self.accepted_at.elapsed().as_millis() as u64,
            "request"
        );
    }
}

/// Routes a parsed request to a file under the document root.
pub async fn handle_request(req: &Request, resolver: &PathResolver) -> Response {
    if !req.is_get() {
        return Response::method_not_allowed();
    }

    let path = match resolver.resolve(&req.path).await {
        Ok(path) => path,
        Err(ResolveError::Forbidden) => {
            warn!(path = %req.path, "target escapes document root");
            return Response::forbidden();
        }
        Err(ResolveError::NotFound) => return Response::not_found(),
    };

    match tokio::fs::read(&path).await {
        Ok(body) => Response::ok(content_type_for(&path), body),
        Err(e) => {
            error!(file = %path.display(), error = %e, "failed to read file");
            Response::internal_error()
        }
    }
}

//! HTTP protocol implementation.
//!
//! This module implements a minimal HTTP/1.1 static file server: one GET
//! request per connection, answered with one response, then closed.
//!
//! # Architecture
//!
//! The HTTP layer is organized into several submodules:
//!
//! - **`connection`**: The per-connection state machine, deadlines, and routing
//! - **`parser`**: Reads a request line and header block from a buffered stream
//! - **`request`**: HTTP request representation
//! - **`resolver`**: Maps request targets to files inside the document root
//! - **`response`**: Status codes and response construction, error pages included
//! - **`writer`**: Serializes and writes HTTP responses to the client
//! - **`mime`**: MIME type detection based on file extensions
//!
//! # Connection State Machine
//!
//! ```text
//!        ┌─────────────┐
//!        │  Accepted   │ ← Deadlines armed (30s read, 30s write)
//!        └──────┬──────┘
//!               ▼
//!        ┌─────────────┐
//!        │   Parsing   │ ── malformed / closed ──┐
//!        └──────┬──────┘                         │ 400
//!               │ Request parsed                 │
//!               ▼                                │
//!        ┌─────────────┐                         │
//!        │   Routing   │ ── 403 / 404 / 405 / 500┤
//!        └──────┬──────┘                         │
//!               │ 200                            │
//!               ▼                                ▼
//!        ┌──────────────────────────────────────────┐
//!        │               Responding                 │
//!        └──────────────────┬───────────────────────┘
//!                           ▼
//!                        Closed
//! ```
//!
//! A deadline expiry in any state closes the connection without a response.
//!
//! # Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use pubserve::http::connection::Connection;
//! use pubserve::http::resolver::PathResolver;
//! use tokio::net::TcpListener;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let resolver = Arc::new(PathResolver::new("./Pub")?);
//!     let listener = TcpListener::bind("127.0.0.1:8080").await?;
//!
//!     loop {
//!         let (socket, _addr) = listener.accept().await?;
//!         let resolver = resolver.clone();
//!         tokio::spawn(async move {
//!             let mut conn = Connection::new(socket, resolver);
//!             if let Err(e) = conn.run().await {
//!                 eprintln!("Connection error: {}", e);
//!             }
//!         });
//!     }
//! }
//! ```

pub mod connection;
pub mod mime;
pub mod parser;
pub mod request;
pub mod resolver;
pub mod response;
pub mod writer;

//! Pubserve - Static File Server
//!
//! Core library for the HTTP/1.1 protocol engine and the connection listener.

pub mod config;
pub mod http;
pub mod server;

/// Value of the `Server` header and the footer of generated error pages.
pub const SERVER_ID: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"));

use std::path::PathBuf;

use thiserror::Error;

pub const DEFAULT_PORT: u16 = 8080;
pub const DEFAULT_DOCUMENT_ROOT: &str = "./Pub";

/// Fatal conditions detected before the server starts accepting connections.
#[derive(Debug, Error)]
pub enum StartupError {
    #[error("invalid port number: {0}")]
    InvalidPort(String),

    #[error("document root does not exist: {}", .0.display())]
    DocumentRootNotFound(PathBuf),

    #[error("failed to bind {addr}: {source}")]
    Bind {
        addr: String,
        #[source]
        source: std::io::Error,
    },
}

/// Immutable server settings, taken from positional arguments.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub port: u16,
    pub document_root: PathBuf,
}

impl ServerConfig {
    /// Builds the config from `[port] [documentRoot]`, program name excluded.
    ///
    /// Missing arguments fall back to port 8080 and `./Pub`. Anything past the
    /// second argument is ignored.
    pub fn from_args<I, S>(args: I) -> Result<Self, StartupError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut args = args.into_iter();

        let port = match args.next() {
            Some(raw) => parse_port(raw.as_ref())?,
            None => DEFAULT_PORT,
        };

        let document_root = args
            .next()
            .map(|raw| PathBuf::from(raw.as_ref()))
            .unwrap_or_else(|| PathBuf::from(DEFAULT_DOCUMENT_ROOT));

        if !document_root.is_dir() {
            return Err(StartupError::DocumentRootNotFound(document_root));
        }

        Ok(Self {
            port,
            document_root,
        })
    }

    pub fn listen_addr(&self) -> String {
        format!("0.0.0.0:{}", self.port)
    }
}

fn parse_port(raw: &str) -> Result<u16, StartupError> {
    match raw.parse::<u16>() {
        Ok(0) | Err(_) => Err(StartupError::InvalidPort(raw.to_string())),
        Ok(port) => Ok(port),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn port_zero_is_rejected() {
        assert!(matches!(parse_port("0"), Err(StartupError::InvalidPort(_))));
    }

    #[test]
    fn port_upper_bound() {
        assert_eq!(parse_port("65535").unwrap(), 65535);
        assert!(parse_port("65536").is_err());
    }
}

//! Request target to filesystem path resolution.
//!
//! Containment is a plain string-prefix test against the canonical document
//! root. A sibling directory sharing the root's prefix (root `/srv/pub`,
//! target resolving to `/srv/public/x`) passes the test. Known limitation.

use std::io;
use std::path::{Component, Path, PathBuf};

use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ResolveError {
    #[error("path escapes the document root")]
    Forbidden,

    #[error("file not found")]
    NotFound,
}

/// Maps request targets onto files under a fixed document root.
#[derive(Debug, Clone)]
pub struct PathResolver {
    root: PathBuf,
}

impl PathResolver {
    /// Canonicalizes `document_root` once, up front.
    pub fn new(document_root: impl AsRef<Path>) -> io::Result<Self> {
        let root = std::fs::canonicalize(document_root)?;
        Ok(Self { root })
    }

    /// The canonical document root.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Resolves a raw request target to an existing regular file.
    pub async fn resolve(&self, target: &str) -> Result<PathBuf, ResolveError> {
        let joined = self.root.join(relative_target(target));

        let resolved = match tokio::fs::canonicalize(&joined).await {
            Ok(path) => path,
            Err(_) => {
                // Nothing to canonicalize; decide on the lexical form instead.
                return if self.contains(&normalize(&joined)) {
                    Err(ResolveError::NotFound)
                } else {
                    Err(ResolveError::Forbidden)
                };
            }
        };

        if !self.contains(&resolved) {
            return Err(ResolveError::Forbidden);
        }

        match tokio::fs::metadata(&resolved).await {
            Ok(meta) if !meta.is_dir() => Ok(resolved),
            _ => Err(ResolveError::NotFound),
        }
    }

    fn contains(&self, path: &Path) -> bool {
        path.to_string_lossy().starts_with(self.root.to_string_lossy().as_ref())
    }
}

/// Strips the query string, maps `/` to `/index.html` and drops leading
/// slashes so the result always joins beneath the root.
fn relative_target(target: &str) -> &str {
    let path = match target.find('?') {
        Some(idx) => &target[..idx],
        None => target,
    };

    let path = if path == "/" { "/index.html" } else { path };

    path.trim_start_matches('/')
}

/// Resolves `.` and `..` components without touching the filesystem.
fn normalize(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                out.pop();
            }
            other => out.push(other.as_os_str()),
        }
    }
    out
}

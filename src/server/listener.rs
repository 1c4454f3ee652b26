use std::net::SocketAddr;
use std::sync::Arc;

use tokio::net::TcpListener;
use tokio::sync::watch;
use tracing::{Instrument, debug, error, info, info_span, warn};

use crate::config::{ServerConfig, StartupError};
use crate::http::connection::Connection;
use crate::http::resolver::PathResolver;

/// Stops a running [`Server`]. Cheap to clone and safe to call from any task.
#[derive(Clone)]
pub struct ShutdownHandle {
    running: Arc<watch::Sender<bool>>,
}

impl ShutdownHandle {
    /// Flips the server to stopped and wakes the accept loop.
    ///
    /// Returns `true` only for the call that performed the transition; later
    /// calls are no-ops.
    pub fn stop(&self) -> bool {
        let stopped = self.running.send_if_modified(|running| {
            let was_running = *running;
            *running = false;
            was_running
        });

        if stopped {
            info!("Server stopping");
        }
        stopped
    }

    /// Waits for `signal`, then stops the server.
    ///
    /// If the signal source itself fails the error is logged and the server
    /// keeps running.
    pub async fn stop_on<F>(self, signal: F)
    where
        F: Future<Output = anyhow::Result<()>>,
    {
        match signal.await {
            Ok(()) => {
                info!("Shutdown signal received");
                self.stop();
            }
            Err(e) => error!(error = %e, "Failed to install signal handlers"),
        }
    }

    /// Snapshot of the running flag; may be stale by the time it is read.
    pub fn is_running(&self) -> bool {
        *self.running.borrow()
    }
}

/// Accepts connections and hands each one to its own task.
pub struct Server {
    listener: TcpListener,
    resolver: Arc<PathResolver>,
    running: Arc<watch::Sender<bool>>,
}

impl Server {
    /// Binds `0.0.0.0:<port>` and prepares the document root.
    pub async fn from_config(cfg: &ServerConfig) -> Result<Self, StartupError> {
        let resolver = PathResolver::new(&cfg.document_root)
            .map_err(|_| StartupError::DocumentRootNotFound(cfg.document_root.clone()))?;

        let addr = cfg.listen_addr();
        let server = Self::bind(&addr, resolver).await?;

        info!(
            port = cfg.port,
            document_root = %server.resolver.root().display(),
            "Listening on {}",
            addr
        );
        Ok(server)
    }

    pub async fn bind(addr: &str, resolver: PathResolver) -> Result<Self, StartupError> {
        let listener = TcpListener::bind(addr)
            .await
            .map_err(|source| StartupError::Bind {
                addr: addr.to_string(),
                source,
            })?;

        let (running, _) = watch::channel(true);

        Ok(Self {
            listener,
            resolver: Arc::new(resolver),
            running: Arc::new(running),
        })
    }

    pub fn local_addr(&self) -> std::io::Result<SocketAddr> {
        self.listener.local_addr()
    }

    pub fn shutdown_handle(&self) -> ShutdownHandle {
        ShutdownHandle {
            running: self.running.clone(),
        }
    }

    /// Runs the accept loop until [`ShutdownHandle::stop`] is called.
    ///
    /// Connections already dispatched are not awaited; each finishes on its
    /// own. The listening socket is closed when this returns.
    pub async fn run(self) {
        let mut stopped = self.running.subscribe();

        while *stopped.borrow() {
            tokio::select! {
                biased;

                _ = stopped.changed() => {}

                accepted = self.listener.accept() => match accepted {
                    Ok((socket, peer)) => {
                        debug!("Accepted connection from {}", peer);
                        self.dispatch(socket, peer);
                    }
                    Err(e) if *stopped.borrow() => {
                        warn!(error = %e, "Failed to accept connection");
                    }
                    Err(e) => {
                        debug!(error = %e, "Accept interrupted by shutdown");
                    }
                },
            }
        }

        info!("Server stopped");
    }

    fn dispatch(&self, socket: tokio::net::TcpStream, peer: SocketAddr) {
        let resolver = self.resolver.clone();
        tokio::spawn(
            async move {
                let mut conn = Connection::new(socket, resolver);
                if let Err(e) = conn.run().await {
                    debug!(error = %e, "Connection aborted");
                }
            }
            .instrument(info_span!("conn", %peer)),
        );
    }
}

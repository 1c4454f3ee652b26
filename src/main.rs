use pubserve::config::ServerConfig;
use pubserve::server::Server;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_target(false)
        .with_level(true)
        .init();

    let server = match ServerConfig::from_args(std::env::args().skip(1)) {
        Ok(cfg) => Server::from_config(&cfg).await,
        Err(e) => Err(e),
    };

    let server = match server {
        Ok(server) => server,
        Err(e) => {
            tracing::error!("{}", e);
            std::process::exit(1);
        }
    };

    tokio::spawn(server.shutdown_handle().stop_on(shutdown_signal()));
    server.run().await;

    Ok(())
}

async fn shutdown_signal() -> anyhow::Result<()> {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{SignalKind, signal};

        let mut terminate = signal(SignalKind::terminate())?;
        tokio::select! {
            res = tokio::signal::ctrl_c() => res?,
            _ = terminate.recv() => {}
        }
    }

    #[cfg(not(unix))]
    tokio::signal::ctrl_c().await?;

    Ok(())
}

use std::sync::Arc;

use anyhow::Context;
use tokio::net::TcpListener;
use tokio::sync::Semaphore;
use tracing::{debug, error, info};

use crate::config::{Config, Limits};
use crate::http::connection::Connection;
use crate::http::handler::Handler;

/// Binds the configured address and serves forever.
///
/// Fails only if the listening socket cannot be set up.
pub async fn run(cfg: &Config, handler: impl Handler + 'static) -> anyhow::Result<()> {
    let listener = TcpListener::bind(&cfg.server.listen_addr)
        .await
        .with_context(|| format!("failed to bind {}", cfg.server.listen_addr))?;
    info!("Listening on {}", cfg.server.listen_addr);

    serve(listener, Arc::new(handler), cfg.limits.clone()).await
}

/// Accept loop over an already bound listener.
///
/// Each socket gets its own task; the loop itself never waits on request
/// processing. With `max_connections` set, accepting pauses while that many
/// connections are being served.
pub async fn serve(
    listener: TcpListener,
    handler: Arc<dyn Handler>,
    limits: Limits,
) -> anyhow::Result<()> {
    let permits = limits.max_connections.map(|n| Arc::new(Semaphore::new(n)));

    loop {
        let permit = match &permits {
            Some(sem) => Some(sem.clone().acquire_owned().await?),
            None => None,
        };

        let (socket, peer) = match listener.accept().await {
            Ok(accepted) => accepted,
            Err(e) => {
                error!("Failed to accept connection: {}", e);
                continue;
            }
        };
        debug!("Accepted connection from {}", peer);

        let handler = handler.clone();
        let limits = limits.clone();
        tokio::spawn(async move {
            let _permit = permit;
            let mut conn = Connection::new(socket, handler, &limits);
            if let Err(e) = conn.run().await {
                error!("Connection error from {}: {}", peer, e);
            }
        });
    }
}

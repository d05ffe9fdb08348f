use std::sync::Arc;

use anyhow::Context;
use tokio::net::TcpListener;
use tracing::{error, info, warn};

use crate::config::Config;
use crate::http::connection::Connection;

pub async fn run(cfg: Arc<Config>) -> anyhow::Result<()> {
    let listener = TcpListener::bind(&cfg.listen_addr)
        .await
        .with_context(|| format!("failed to bind {}", cfg.listen_addr))?;
    info!("Listening on {}", cfg.listen_addr);

    serve(listener, cfg).await
}

/// Accepts connections forever, one task each. A failed accept is logged
/// and the loop carries on.
pub async fn serve(listener: TcpListener, cfg: Arc<Config>) -> anyhow::Result<()> {
    loop {
        let (socket, peer) = match listener.accept().await {
            Ok(accepted) => accepted,
            Err(e) => {
                error!(error = %e, "accept failed");
                continue;
            }
        };
        info!("Accepted connection from {}", peer);

        let cfg = Arc::clone(&cfg);
        tokio::spawn(async move {
            let mut conn = Connection::new(socket, cfg, peer.to_string());
            match conn.run().await {
                Ok(()) => {}
                Err(e) if e.is_silent() => {}
                Err(e) => warn!("Connection error from {}: {}", peer, e),
            }
        });
    }
}

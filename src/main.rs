use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::bail;
use clap::Parser;
use triton::config::Config;
use triton::server;

/// Serves static files for a set of virtual hosts over HTTP/1.1.
#[derive(Debug, Parser)]
#[command(name = "triton", version)]
struct Cli {
    /// YAML file mapping virtual hosts to document roots
    #[arg(long, default_value = "virtual_hosts.yaml")]
    config: PathBuf,

    /// Address to listen on, overriding the config file and LISTEN
    #[arg(long)]
    listen: Option<String>,

    /// Seconds a connection may wait for a complete request
    #[arg(long)]
    idle_timeout: Option<u64>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_target(false)
        .with_level(true)
        .init();

    let cli = Cli::parse();
    let mut cfg = Config::load(&cli.config)?;
    if let Some(listen) = cli.listen {
        cfg.listen_addr = listen;
    }
    if let Some(secs) = cli.idle_timeout {
        if secs == 0 {
            bail!("idle timeout must be greater than zero");
        }
        cfg.idle_timeout = Duration::from_secs(secs);
    }
    for (host, root) in cfg.virtual_hosts.iter() {
        tracing::info!(host = %host, root = %root.display(), "virtual host");
    }

    tokio::select! {
        res = server::listener::run(Arc::new(cfg)) => {
            res?;
        }

        _ = tokio::signal::ctrl_c() => {
            tracing::info!("Shutdown signal received");
        }
    }

    Ok(())
}

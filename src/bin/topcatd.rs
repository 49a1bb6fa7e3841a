use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use tokio::net::TcpListener;

use topcat::http::create_router;
use topcat::{DefaultService, ServiceConfig};

#[derive(Parser)]
#[command(name = "topcatd", about = "Topical document classification service")]
struct Cli {
    /// Path of the JSON configuration file naming the model artefacts.
    #[arg(long, default_value = "output/model_config.json")]
    config: PathBuf,

    /// Address to serve on.
    #[arg(long, default_value = "127.0.0.1:5000")]
    bind: SocketAddr,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    // Every failure from here to serve() is fatal: the process must not
    // start answering requests without its artefacts.
    let config = ServiceConfig::load(&cli.config)
        .with_context(|| format!("loading configuration from {}", cli.config.display()))?;
    let service = DefaultService::from_config(&config).context("loading model artefacts")?;
    let service = Arc::new(service);

    let app = create_router(service);
    let listener = TcpListener::bind(cli.bind)
        .await
        .with_context(|| format!("binding {}", cli.bind))?;
    tracing::info!(addr = %cli.bind, "serving classification requests");
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("serving HTTP")?;
    Ok(())
}

async fn shutdown_signal() {
    if let Err(error) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %error, "failed to install shutdown handler");
    }
}

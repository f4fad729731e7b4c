use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use debate_relay::config::Config;
use debate_relay::server;

/// Realtime relay server for the AI debate experience.
#[derive(Debug, Parser)]
#[command(name = "debate-relay", version)]
struct Args {
    /// Address to listen on.
    #[arg(long, env = "DEBATE_RELAY_ADDR", default_value = "0.0.0.0:8080")]
    addr: String,

    /// Directory holding scripted opening-argument text files.
    #[arg(long, env = "DEBATE_RELAY_OPENING_DIR")]
    opening_dir: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();
    let config = Config::from_env()
        .context("loading configuration")?
        .with_opening_dir(args.opening_dir);

    let listener = tokio::net::TcpListener::bind(&args.addr)
        .await
        .with_context(|| format!("binding {}", args.addr))?;
    tracing::info!(addr = %args.addr, "debate relay listening");

    axum::serve(listener, server::router(Arc::new(config))).await?;
    Ok(())
}

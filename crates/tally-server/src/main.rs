#![forbid(unsafe_code)]

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

use tally_server::auth::Authenticator;
use tally_server::config::ServerConfig;
use tally_server::{AppState, router};
use tally_store::MemoryKv;

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "tallyd: user-scoped TODO service over a key-value store",
    long_about = None
)]
struct Cli {
    /// Path to a TOML config file.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Bind address, overriding the config file and TALLY_HTTP_BIND.
    #[arg(long)]
    bind: Option<String>,

    /// Enable verbose logging.
    #[arg(short, long)]
    verbose: bool,
}

fn init_tracing(verbose: bool) {
    let filter = EnvFilter::try_from_env("TALLY_LOG").unwrap_or_else(|_| {
        EnvFilter::new(if verbose {
            "tally_server=debug,tally_store=debug,info"
        } else {
            "tally_server=info,tally_store=info,warn"
        })
    });

    let format = std::env::var("TALLY_LOG_FORMAT").unwrap_or_else(|_| "compact".to_string());

    let registry = tracing_subscriber::registry().with(filter);

    match format.as_str() {
        "json" => {
            registry.with(fmt::layer().json().with_ansi(false)).init();
        }
        _ => {
            registry.with(fmt::layer().compact()).init();
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let config = ServerConfig::load(cli.config.as_deref())?;
    let addr: SocketAddr = match &cli.bind {
        Some(bind) => bind
            .parse()
            .with_context(|| format!("invalid bind address '{bind}'"))?,
        None => config.bind_addr()?,
    };

    let auth = Authenticator::new(config.auth.tokens);
    if auth.is_empty() {
        warn!("no auth tokens configured; every request will be rejected with 401");
    }

    let kv = Arc::new(MemoryKv::new());
    let state = AppState::new(kv, auth);
    let app = router(state);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("binding {addr}"))?;
    info!(%addr, "tallyd listening");
    axum::serve(listener, app).await?;
    Ok(())
}

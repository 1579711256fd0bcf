// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Marquee service daemon.
//!
//! Binds the favorites/registration API and persists accounts through a
//! `ConfigStore` (platform config dir by default, `--data-dir` to relocate,
//! `--ephemeral` for an in-memory directory).

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use marquee_app_core::config::{ConfigService, ConfigStore};
use marquee_app_core::memory::MemoryConfigStore;
use marquee_config_fs::FsConfigStore;
use marquee_service::prefs::ServicePrefs;
use marquee_service::{router, AppState};
use tokio::net::TcpListener;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(author, version, about = "Marquee favorites service")]
struct Args {
    /// Listen address (overrides saved prefs)
    #[arg(long)]
    listen: Option<SocketAddr>,
    /// Directory for the user database (overrides saved prefs)
    #[arg(long)]
    data_dir: Option<PathBuf>,
    /// Keep accounts in memory only
    #[arg(long)]
    ephemeral: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("info".parse()?))
        .init();

    // Config (best-effort)
    let config: Option<ConfigService<FsConfigStore>> =
        FsConfigStore::new().map(ConfigService::new).ok();

    let prefs = config
        .as_ref()
        .map(ServicePrefs::load_or_init)
        .unwrap_or_default();

    let listen: SocketAddr = match args.listen {
        Some(addr) => addr,
        None => prefs
            .listen
            .parse()
            .with_context(|| format!("invalid listen address in prefs: {}", prefs.listen))?,
    };

    if args.ephemeral {
        info!("using in-memory user directory");
        return serve(MemoryConfigStore::new(), prefs.hash_cost, listen).await;
    }

    let store = match args.data_dir.or(prefs.data_dir) {
        Some(dir) => FsConfigStore::at(&dir)
            .with_context(|| format!("open data dir {}", dir.display()))?,
        None => config
            .map(ConfigService::into_inner)
            .context("no platform config dir; pass --data-dir or --ephemeral")?,
    };
    info!(dir = %store.base().display(), "using on-disk user directory");
    serve(store, prefs.hash_cost, listen).await
}

async fn serve<S>(store: S, hash_cost: u32, listen: SocketAddr) -> Result<()>
where
    S: ConfigStore + Send + Sync + 'static,
{
    let state = Arc::new(AppState::new(store).with_hash_cost(hash_cost));
    let listener = TcpListener::bind(listen)
        .await
        .with_context(|| format!("bind {listen}"))?;
    info!("marquee service listening on {}", listener.local_addr()?);
    axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    info!("marquee service stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        warn!(?err, "failed to install ctrl-c handler");
        std::future::pending::<()>().await;
    }
}

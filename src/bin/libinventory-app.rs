use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context as _;
use clap::Parser;

use libinventory::app::{AppState, router};
use libinventory::cli::SourceArgs;
use libinventory::config;
use libinventory::overrides::OverrideStore;
use libinventory::sheet::CatalogSource;
use libinventory::storefront::Language;

#[derive(Debug, Parser)]
#[command(author, version, about)]
struct AppArgs {
    #[arg(long, default_value = "127.0.0.1:8080")]
    addr: SocketAddr,

    #[command(flatten)]
    source: SourceArgs,

    /// Order form endpoint (default: $LIBINVENTORY_ORDER_URL).
    #[arg(long)]
    order_url: Option<String>,

    /// Initial storefront language.
    #[arg(long, value_enum, default_value_t = Language::Ar)]
    lang: Language,
}

#[tokio::main]
async fn main() -> std::process::ExitCode {
    if let Err(err) = try_main().await {
        eprintln!("{err:#}");
        return std::process::ExitCode::FAILURE;
    }
    std::process::ExitCode::SUCCESS
}

async fn try_main() -> anyhow::Result<()> {
    libinventory::logging::init_with_default("info,tower_http=debug")?;

    let args = AppArgs::parse();
    tracing::info!(?args, "starting libinventory-app");

    let source: Arc<dyn CatalogSource> = Arc::from(libinventory::catalog::open_source(&args.source)?);
    let overrides = args.source.overrides.as_deref().map(OverrideStore::new);
    let order_url = config::flag_or_env(args.order_url.as_deref(), config::ORDER_URL_ENV);
    if order_url.is_none() {
        tracing::warn!("no order endpoint configured; POST /api/orders will be refused");
    }

    let state = AppState::load(source, overrides, args.lang, order_url).await?;
    let app = router(state);

    let listener = tokio::net::TcpListener::bind(args.addr)
        .await
        .map_err(|err| anyhow::anyhow!("bind {}: {err}", args.addr))?;
    tracing::info!(addr = %args.addr, "listening");
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("serve")?;
    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::warn!(%err, "failed to listen for ctrl-c");
        std::future::pending::<()>().await;
    }
    tracing::info!("shutting down");
}

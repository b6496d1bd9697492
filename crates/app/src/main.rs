mod config;
mod opt;

use api::build_router;
use clap::Parser;
use services::{AppServices, Clock};
use storage::hosted::HostedStoreConfig;
use tokio::net::TcpListener;

use crate::opt::{Cli, Commands, Serve, StoreKind};

async fn build_services(args: &Serve) -> Result<AppServices, Box<dyn std::error::Error>> {
    let clock = Clock::default();
    match args.store {
        StoreKind::Sqlite => {
            let db_url = config::db_url(args.db.clone(), std::env::var("PORTAL_DB_URL").ok())?;
            // Open + migrate at startup so the first request does not pay for it.
            config::prepare_sqlite_file(&db_url)?;
            let services = AppServices::new_sqlite(&db_url, clock).await?;
            tracing::info!(%db_url, "sqlite question store ready");
            Ok(services)
        }
        StoreKind::Hosted => {
            let store = HostedStoreConfig::from_env()?;
            tracing::info!(base_url = %store.base_url, "using hosted question store");
            Ok(AppServices::new_hosted(store, clock)?)
        }
    }
}

async fn serve(args: Serve) -> Result<(), Box<dyn std::error::Error>> {
    let services = build_services(&args).await?;
    let addr = config::bind_addr(
        std::env::var("PORTAL_BIND_ADDR").ok(),
        args.host,
        args.port,
    )?;

    let listener = TcpListener::bind(addr).await?;
    tracing::info!(%addr, store = args.store.as_str(), "practice question API listening");

    axum::serve(listener, build_router(services))
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    tracing::info!("server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::warn!(error = %err, "failed to listen for ctrl-c");
        std::future::pending::<()>().await;
    }
}

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    match cli.command {
        Commands::Serve(args) => serve(args).await,
    }
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,api=debug".into()),
        )
        .init();

    if let Err(err) = run().await {
        eprintln!("{err}");
        std::process::exit(2);
    }
}

//! atelier-web - design studio site service
//!
//! Serves the portfolio site: project catalog API, gallery and contact
//! form session controllers, the contact submission endpoint with its
//! spreadsheet sink, and the embedded static UI.

use anyhow::Result;
use atelier_common::config::SiteConfig;
use atelier_web::{build_router, AppState};
use clap::Parser;
use std::path::PathBuf;
use tracing::info;

#[derive(Debug, Parser)]
#[command(name = "atelier-web", about = "Design studio site service")]
struct Args {
    /// Listen address (overrides ATELIER_BIND and the config file)
    #[arg(long)]
    bind: Option<String>,

    /// Optional TOML configuration file
    #[arg(long)]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    info!(
        "Starting atelier-web v{}",
        env!("CARGO_PKG_VERSION")
    );

    let args = Args::parse();
    let config = SiteConfig::load(args.bind.as_deref(), args.config.as_deref())?;
    if config.sheets.is_some() {
        info!("✓ Spreadsheet sink configured");
    }

    let bind_addr = config.bind_addr.clone();
    let state = AppState::new(config)?;
    let app = build_router(state);

    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;
    info!("atelier-web listening on http://{bind_addr}");
    info!("Health check: http://{bind_addr}/health");

    axum::serve(listener, app).await?;

    Ok(())
}

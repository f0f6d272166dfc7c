//! Retail analytics KPI dashboard - Entry Point
//!
//! Default: fetch the KPIs once and print the dashboard to the terminal.
//! `--serve`: run the page server.

use anyhow::Result;
use clap::Parser;
use kpiboard_client::ClientConfig;
use kpiboard_core::KpiQuery;
use tracing::info;

/// Retail analytics KPI dashboard
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Configuration file path (can also be set via KPIBOARD_CONFIG env var)
    #[arg(short, long)]
    config: Option<String>,

    /// Analytics backend base URL (overrides KPIBOARD_API_URL and the config file)
    #[arg(long)]
    api_url: Option<String>,

    /// Display locale, e.g. en-US or de-DE (defaults to the process locale)
    #[arg(long)]
    locale: Option<String>,

    /// Serve the dashboard over HTTP instead of printing it once
    #[arg(long)]
    serve: bool,

    /// Page server port
    #[arg(short, long)]
    port: Option<u16>,

    /// Inclusive start date (YYYY-MM-DD)
    #[arg(long)]
    start: Option<String>,

    /// Inclusive end date (YYYY-MM-DD)
    #[arg(long)]
    end: Option<String>,

    /// Sales territory filter
    #[arg(long)]
    region: Option<String>,

    /// Product code filter
    #[arg(long)]
    product_code: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    kpiboard_telemetry::init_logging()?;

    info!("Starting kpiboard v{}", env!("CARGO_PKG_VERSION"));

    let mut config = kpiboard::AppConfig::load(args.config.as_deref())?;

    // Base URL: CLI arg > KPIBOARD_API_URL > config file > default
    config.api.base_url =
        ClientConfig::resolve_base_url(args.api_url, Some(config.api.base_url.clone()));

    if let Some(locale) = args.locale {
        config.locale = Some(locale);
    }
    if let Some(port) = args.port {
        config.dashboard.port = port;
    }
    if let Some(start) = args.start.as_deref() {
        config.query.start = Some(KpiQuery::parse_date(start)?);
    }
    if let Some(end) = args.end.as_deref() {
        config.query.end = Some(KpiQuery::parse_date(end)?);
    }
    if args.region.is_some() {
        config.query.region = args.region;
    }
    if args.product_code.is_some() {
        config.query.product_code = args.product_code;
    }

    info!(base_url = %config.api.base_url, query = ?config.query, "Configuration loaded");

    let app = kpiboard::Application::new(config)?;

    if args.serve {
        app.serve().await?;
    } else {
        let mut stdout = std::io::stdout().lock();
        app.run_once(&mut stdout).await?;
    }

    Ok(())
}

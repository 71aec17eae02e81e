// =============================================================================
// Basis Scout — Main Entry Point
// =============================================================================
//
// Poll-and-report driver: evaluate one asset once (default) or on a fixed
// interval (--loop), print the report, and push it to Telegram when
// credentials are configured. Single-shot failures exit non-zero; loop-mode
// failures are logged and the next cycle proceeds.
// =============================================================================

mod config;
mod engine;
mod exchange;
mod indicators;
mod notify;
mod report;
mod signal;
mod types;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use crate::config::Settings;
use crate::exchange::MarketDataClient;
use crate::notify::TelegramNotifier;

/// Spot/derivatives confluence signal scout.
#[derive(Parser, Debug)]
#[command(name = "basis-scout", version, about)]
struct Cli {
    /// Market symbol, e.g. BTC/USDT (overrides SYMBOL).
    #[arg(long)]
    symbol: Option<String>,

    /// Kline timeframe, e.g. 5m (overrides TIMEFRAME).
    #[arg(long)]
    timeframe: Option<String>,

    /// Bars of history to request (overrides LOOKBACK).
    #[arg(long)]
    lookback: Option<u32>,

    /// Run continuously instead of a single evaluation.
    #[arg(long = "loop")]
    loop_mode: bool,

    /// Seconds between evaluations in loop mode.
    #[arg(long, default_value_t = 60)]
    interval: u64,
}

#[tokio::main]
async fn main() -> Result<()> {
    let _ = dotenv::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    let mut settings = Settings::from_env();
    if let Some(symbol) = cli.symbol {
        settings.symbol = symbol;
    }
    if let Some(timeframe) = cli.timeframe {
        settings.timeframe = timeframe;
    }
    if let Some(lookback) = cli.lookback {
        settings.lookback = lookback;
    }

    info!(
        symbol = %settings.symbol,
        timeframe = %settings.timeframe,
        lookback = settings.lookback,
        spot_venue = %settings.spot_venue,
        futures_venue = %settings.futures_venue,
        "basis-scout starting"
    );

    // One HTTP client for the whole process, shared by market data and
    // notifications.
    let http = reqwest::Client::builder()
        .timeout(std::time::Duration::from_secs(10))
        .build()
        .context("failed to build HTTP client")?;

    let client = MarketDataClient::with_client(http.clone());
    let notifier = TelegramNotifier::from_env(http);
    if notifier.is_none() {
        info!("telegram credentials not set — notifications disabled");
    }

    if !cli.loop_mode {
        // Single-shot: any failure propagates and exits non-zero.
        run_once(&client, &settings, notifier.as_ref()).await?;
        return Ok(());
    }

    let interval = cli.interval.max(1);
    info!(interval_secs = interval, "entering evaluation loop");

    loop {
        if let Err(e) = run_once(&client, &settings, notifier.as_ref()).await {
            error!(error = %e, "evaluation failed — continuing");
        }

        tokio::select! {
            _ = tokio::time::sleep(std::time::Duration::from_secs(interval)) => {}
            _ = tokio::signal::ctrl_c() => {
                warn!("shutdown signal received — stopping");
                break;
            }
        }
    }

    Ok(())
}

/// One evaluation cycle: analyze, print, notify (best-effort).
async fn run_once(
    client: &MarketDataClient,
    settings: &Settings,
    notifier: Option<&TelegramNotifier>,
) -> Result<()> {
    let analysis = engine::analyze(client, settings).await?;
    let text = report::format_report(&analysis);

    println!("{text}");

    if let Some(sink) = notifier {
        sink.send_best_effort(&text).await;
    }

    Ok(())
}

use std::process::ExitCode;

use alert::AlertEngine;
use alert::smtp::SmtpNotifier;
use anyhow::Context;
use clap::Parser;
use common::logger::{init_logger, loop_span};
use market::brapi::BrapiClient;
use market::{QuoteFeed, QuoteSlot};
use stock_alert::{
    cli::{Cli, Inputs},
    config::AppConfig,
    error::report_fatal,
};
use tokio::task::JoinHandle;
use tracing::Instrument;

/// Spawns the quote feed; it publishes into `slot` until aborted.
fn start_quote_feed(
    inputs: &Inputs,
    cfg: &AppConfig,
    slot: QuoteSlot,
) -> anyhow::Result<JoinHandle<()>> {
    let client = BrapiClient::new(
        cfg.provider.base_url.clone(),
        cfg.provider.token.clone(),
        cfg.provider.request_timeout,
    )
    .context("failed to build quote provider client")?;

    let feed = QuoteFeed::new(
        client,
        inputs.ticker.clone(),
        cfg.alert.stock_update_interval,
        slot,
    )
    .with_slow_fetch_warning(cfg.provider.slow_fetch_warn);

    let span = loop_span("quote_feed", inputs.ticker.as_str());
    Ok(tokio::spawn(feed.run().instrument(span)))
}

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();

    let is_production = std::env::var("APP_ENV").unwrap_or_default() == "production";
    init_logger("stock-alert", cli.json_logs || is_production);

    let inputs = match cli.validate() {
        Ok(inputs) => inputs,
        Err(e) => {
            report_fatal(&e);
            return Ok(ExitCode::FAILURE);
        }
    };

    let cfg = match AppConfig::load(&cli.config_dir) {
        Ok(cfg) => cfg,
        Err(e) => {
            report_fatal(&e);
            return Ok(ExitCode::FAILURE);
        }
    };

    tracing::info!(
        ticker = %inputs.ticker,
        buy_price = inputs.thresholds.buy_price(),
        sell_price = inputs.thresholds.sell_price(),
        recipient = %cfg.alert.recipient,
        "Starting stock-alert..."
    );

    let notifier = SmtpNotifier::new(&cfg.smtp, &cfg.credentials, &cfg.alert.recipient)
        .context("failed to set up smtp notifier")?;

    let slot = QuoteSlot::new();
    let feed = start_quote_feed(&inputs, &cfg, slot.clone())?;

    let span = loop_span("alert_engine", inputs.ticker.as_str());
    let engine = AlertEngine::new(inputs.ticker, inputs.thresholds, cfg.alert, slot, notifier);

    tokio::select! {
        _ = engine.run().instrument(span) => {}
        signal = tokio::signal::ctrl_c() => {
            signal.context("failed to listen for shutdown signal")?;
            tracing::info!("Shutdown signal received");
        }
    }

    feed.abort();

    Ok(ExitCode::SUCCESS)
}

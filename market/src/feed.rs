//! Quote feed.
//!
//! Periodically asks a `QuoteSource` for the latest quote of one ticker
//! and publishes the outcome into the shared `QuoteSlot`.
//!
//! Data flow:
//! QuoteSource → QuoteFeed → QuoteSlot → alert engine

use std::time::Duration;

use common::logger::warn_if_slow;
use tracing::{info, warn};

use crate::slot::QuoteSlot;
use crate::source::QuoteSource;
use crate::types::{Quote, Ticker};

pub struct QuoteFeed<S> {
    source: S,
    ticker: Ticker,
    every: Duration,
    slow_fetch: Duration,
    slot: QuoteSlot,
}

impl<S: QuoteSource> QuoteFeed<S> {
    /// Polls `source` for `ticker`, pausing `every` between the end of one
    /// fetch and the start of the next.
    pub fn new(source: S, ticker: Ticker, every: Duration, slot: QuoteSlot) -> Self {
        Self {
            source,
            ticker,
            every,
            slow_fetch: every,
            slot,
        }
    }

    /// Warn when a single fetch takes longer than `max`.
    pub fn with_slow_fetch_warning(mut self, max: Duration) -> Self {
        self.slow_fetch = max;
        self
    }

    /// Fetch once and publish the result.
    ///
    /// A failed fetch publishes `None`, replacing any earlier quote.
    pub async fn poll_once(&self) -> Option<Quote> {
        let fetched =
            warn_if_slow("quote_fetch", self.slow_fetch, self.source.fetch(&self.ticker)).await;

        let published = match fetched {
            Ok(quote) if quote.is_valid => {
                info!(quote = %quote, "quote updated");
                Some(quote)
            }
            Ok(quote) => {
                warn!(quote = %quote, "provider returned an invalid quote");
                Some(quote)
            }
            Err(e) => {
                warn!(error = %e, "could not refresh quote");
                None
            }
        };

        self.slot.publish(published.clone());
        published
    }

    /// Poll forever. Errors never stop the loop.
    pub async fn run(self) {
        info!(every_ms = self.every.as_millis() as u64, "quote feed started");

        loop {
            self.poll_once().await;
            tokio::time::sleep(self.every).await;
        }
    }
}

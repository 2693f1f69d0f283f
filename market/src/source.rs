use async_trait::async_trait;

use crate::errors::QuoteError;
use crate::types::{Quote, Ticker};

/// Anything that can produce the latest quote for a ticker.
///
/// Implementations perform at most one outbound request per call and do
/// not retry; the feed loop retries on its next interval.
///
/// The result is tri-state: `Ok` with a valid quote, `Ok` with a quote the
/// provider flagged (`is_valid == false`), or `Err` when nothing usable came
/// back at all.
#[async_trait]
pub trait QuoteSource: Send + Sync {
    async fn fetch(&self, ticker: &Ticker) -> Result<Quote, QuoteError>;
}

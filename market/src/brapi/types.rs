use chrono::{DateTime, Utc};
use serde::Deserialize;

use crate::errors::QuoteError;
use crate::types::{Quote, Ticker};

/// Top level body of `GET /quote/{tickers}`.
#[derive(Debug, Deserialize)]
pub struct QuoteEnvelope {
    #[serde(default)]
    pub results: Vec<QuoteResult>,
}

/// One entry of `results`. The provider omits fields freely, so every one
/// of them is optional.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuoteResult {
    pub symbol: Option<String>,
    pub short_name: Option<String>,
    pub long_name: Option<String>,
    pub currency: Option<String>,
    pub regular_market_price: Option<f64>,
    pub regular_market_change_percent: Option<f64>,
    pub updated_at: Option<DateTime<Utc>>,
    pub error: Option<bool>,
    pub message: Option<String>,
}

impl QuoteResult {
    pub fn into_quote(self) -> Quote {
        Quote {
            ticker_symbol: self.symbol.unwrap_or_default(),
            short_name: self.short_name.unwrap_or_default(),
            long_name: self.long_name.unwrap_or_default(),
            current_price: self.regular_market_price.unwrap_or(Quote::MISSING_PRICE),
            timestamp: self.updated_at.unwrap_or(DateTime::<Utc>::MIN_UTC),
            is_valid: !self.error.unwrap_or(false),
        }
    }
}

/// Decode a response body and pick the entry for `ticker`.
///
/// Only an exact symbol match counts; a body without one is an error.
pub fn parse_quote_response(body: &str, ticker: &Ticker) -> Result<Quote, QuoteError> {
    let envelope: QuoteEnvelope = serde_json::from_str(body)?;

    let entry = envelope
        .results
        .into_iter()
        .find(|r| r.symbol.as_deref() == Some(ticker.as_str()))
        .ok_or_else(|| QuoteError::SymbolNotFound(ticker.to_string()))?;

    if entry.error == Some(true) {
        tracing::debug!(
            ticker = %ticker,
            message = entry.message.as_deref().unwrap_or(""),
            "provider flagged quote entry"
        );
    }

    Ok(entry.into_quote())
}

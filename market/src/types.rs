use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use once_cell::sync::Lazy;
use regex::Regex;

use crate::errors::TickerError;

static TICKER_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)^[A-Z0-9]{4}[A-Z0-9]{1,2}$").expect("ticker pattern is a valid regex")
});

/// Exchange ticker code, e.g. `PETR4` or `TAEE11`.
///
/// Four alphanumerics followed by one or two more. Input is accepted in any
/// case and stored upper-cased, which is how the quote provider reports
/// symbols.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Ticker(String);

impl Ticker {
    pub fn parse(raw: &str) -> Result<Self, TickerError> {
        let raw = raw.trim();
        if raw.is_empty() {
            return Err(TickerError::Empty);
        }
        if !TICKER_RE.is_match(raw) {
            return Err(TickerError::Malformed(raw.to_string()));
        }
        Ok(Self(raw.to_ascii_uppercase()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl FromStr for Ticker {
    type Err = TickerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for Ticker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Snapshot of a stock's price and metadata as reported by a quote source.
///
/// A negative `current_price` marks a quote without a usable price, and
/// `is_valid == false` marks an entry the provider itself flagged as an
/// error. Quotes are never mutated; each fetch produces a new one.
#[derive(Debug, Clone, PartialEq)]
pub struct Quote {
    pub ticker_symbol: String,
    pub short_name: String,
    pub long_name: String,
    pub current_price: f64,
    /// Provider side update time.
    pub timestamp: DateTime<Utc>,
    pub is_valid: bool,
}

impl Quote {
    /// Price sentinel used when the provider omits the price.
    pub const MISSING_PRICE: f64 = -1.0;

    /// Placeholder for an entry the provider flagged as an error.
    pub fn invalid(ticker_symbol: impl Into<String>) -> Self {
        Self {
            ticker_symbol: ticker_symbol.into(),
            short_name: String::new(),
            long_name: String::new(),
            current_price: Self::MISSING_PRICE,
            timestamp: DateTime::<Utc>::MIN_UTC,
            is_valid: false,
        }
    }

    pub fn has_usable_price(&self) -> bool {
        self.current_price >= 0.0
    }
}

impl fmt::Display for Quote {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if !self.is_valid {
            return write!(f, "{{ {} flagged invalid by provider }}", self.ticker_symbol);
        }
        write!(
            f,
            "{{ ticker: {} | price: {} | updated: {} }}",
            self.ticker_symbol,
            self.current_price,
            self.timestamp.to_rfc3339()
        )
    }
}

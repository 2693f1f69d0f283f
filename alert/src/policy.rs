//! Threshold policy: where does a price sit relative to the buy/sell bounds.

use thiserror::Error;

use crate::message::Signal;

/// Result of comparing a price against the thresholds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Classification {
    WithinRange,
    BelowBuy,
    AboveSell,
}

impl Classification {
    /// Action suggested by this classification, if any.
    pub fn signal(&self) -> Option<Signal> {
        match self {
            Classification::WithinRange => None,
            Classification::BelowBuy => Some(Signal::Buy),
            Classification::AboveSell => Some(Signal::Sell),
        }
    }
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ThresholdError {
    #[error("prices must be finite numbers (buy={buy}, sell={sell})")]
    NotFinite { buy: f64, sell: f64 },

    #[error("buy price must be greater than zero, got {0}")]
    NonPositiveBuy(f64),

    #[error("sell price ({sell}) must be greater than buy price ({buy})")]
    SellNotAboveBuy { buy: f64, sell: f64 },
}

/// Buy/sell bounds fixed for the lifetime of the process.
///
/// Invariant: `0 < buy_price < sell_price`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Thresholds {
    buy_price: f64,
    sell_price: f64,
}

impl Thresholds {
    pub fn new(buy_price: f64, sell_price: f64) -> Result<Self, ThresholdError> {
        if !buy_price.is_finite() || !sell_price.is_finite() {
            return Err(ThresholdError::NotFinite {
                buy: buy_price,
                sell: sell_price,
            });
        }
        if buy_price <= 0.0 {
            return Err(ThresholdError::NonPositiveBuy(buy_price));
        }
        if sell_price <= buy_price {
            return Err(ThresholdError::SellNotAboveBuy {
                buy: buy_price,
                sell: sell_price,
            });
        }
        Ok(Self {
            buy_price,
            sell_price,
        })
    }

    pub fn buy_price(&self) -> f64 {
        self.buy_price
    }

    pub fn sell_price(&self) -> f64 {
        self.sell_price
    }

    pub fn classify(&self, price: f64) -> Classification {
        classify(price, self.buy_price, self.sell_price)
    }

    /// Bound that was crossed for a given signal.
    pub fn bound_for(&self, signal: Signal) -> f64 {
        match signal {
            Signal::Buy => self.buy_price,
            Signal::Sell => self.sell_price,
        }
    }
}

/// Classify `price` against the bounds. Only strict inequalities trigger.
///
/// The sell check runs first and the buy check second, the later match
/// winning. With `sell_price > buy_price` both can never hold at once.
pub fn classify(price: f64, buy_price: f64, sell_price: f64) -> Classification {
    let mut outcome = Classification::WithinRange;

    if price > sell_price {
        outcome = Classification::AboveSell;
    }

    if price < buy_price {
        outcome = Classification::BelowBuy;
    }

    outcome
}

use std::collections::VecDeque;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, TimeZone, Utc};
use parking_lot::Mutex;

use market::{Quote, QuoteError, QuoteSource, Ticker};

/// Replays scripted fetch results, then keeps returning the last one.
#[derive(Clone, Default)]
pub struct ScriptedSource {
    script: Arc<Mutex<VecDeque<Step>>>,
    pub calls: Arc<Mutex<usize>>,
}

#[derive(Clone)]
pub enum Step {
    Quote(Quote),
    Fail,
}

impl ScriptedSource {
    pub fn new(steps: Vec<Step>) -> Self {
        Self {
            script: Arc::new(Mutex::new(steps.into())),
            calls: Arc::default(),
        }
    }

    pub fn calls(&self) -> usize {
        *self.calls.lock()
    }
}

#[async_trait]
impl QuoteSource for ScriptedSource {
    async fn fetch(&self, ticker: &Ticker) -> Result<Quote, QuoteError> {
        *self.calls.lock() += 1;

        let step = {
            let mut script = self.script.lock();
            if script.len() > 1 {
                script.pop_front()
            } else {
                script.front().cloned()
            }
        };

        match step {
            Some(Step::Quote(q)) => Ok(q),
            Some(Step::Fail) | None => Err(QuoteError::SymbolNotFound(ticker.to_string())),
        }
    }
}

pub fn ts(minute: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 5, 10, 15, minute, 0).unwrap()
}

pub fn quote(price: f64, minute: u32) -> Quote {
    Quote {
        ticker_symbol: "PETR4".into(),
        short_name: "PETROBRAS PN".into(),
        long_name: "Petroleo Brasileiro S.A. - Petrobras".into(),
        current_price: price,
        timestamp: ts(minute),
        is_valid: true,
    }
}

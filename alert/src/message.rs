use std::fmt;

use chrono::{DateTime, Local};
use market::Quote;

/// Suggested action carried by an alert.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Signal {
    Buy,
    Sell,
}

impl Signal {
    fn subject_phrase(&self) -> &'static str {
        match self {
            Signal::Buy => "below buy price",
            Signal::Sell => "above sell price",
        }
    }

    fn direction(&self) -> &'static str {
        match self {
            Signal::Buy => "below",
            Signal::Sell => "above",
        }
    }

    fn action(&self) -> &'static str {
        match self {
            Signal::Buy => "Buy",
            Signal::Sell => "Sell",
        }
    }
}

impl fmt::Display for Signal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.action())
    }
}

/// A notification ready to be handed to a `Notifier`.
#[derive(Debug, Clone, PartialEq)]
pub struct Alert {
    pub ticker: String,
    pub short_name: String,
    pub long_name: String,
    pub price: f64,
    pub signal: Signal,
    /// Threshold that was crossed.
    pub threshold: f64,
    pub generated_at: DateTime<Local>,
}

impl Alert {
    pub fn new(
        quote: &Quote,
        signal: Signal,
        threshold: f64,
        generated_at: DateTime<Local>,
    ) -> Self {
        Self {
            ticker: quote.ticker_symbol.clone(),
            short_name: quote.short_name.clone(),
            long_name: quote.long_name.clone(),
            price: quote.current_price,
            signal,
            threshold,
            generated_at,
        }
    }

    pub fn subject(&self) -> String {
        format!(
            "{}: {} {}",
            crate::types::APP_NAME,
            self.ticker,
            self.signal.subject_phrase()
        )
    }

    pub fn html_body(&self) -> String {
        let ticker = escape_html(&self.ticker);
        let action = self.signal.action();

        format!(
            "<p>Alert for <b>{ticker}</b> at {at}: the current price is <b>{price}</b>, \
             <b>{direction}</b> the {lower} threshold of {threshold}.<br>\
             Suggested action: <b>{action} the asset</b>.</p>\
             <hr>\
             <b>ASSET INFORMATION</b><br>\
             <p>Ticker: <b>{ticker}</b><br>\
             Company: <b>{short}</b><br>\
             Company long name: <b>{long}</b><br>\
             Current price: <b>{price}</b><br>\
             {action} threshold: <b>{threshold}</b></p>\
             <hr><br><br>\
             <p>Generated automatically by {app}.</p>",
            at = self.generated_at.format("%Y-%m-%d %H:%M:%S %:z"),
            price = self.price,
            direction = self.signal.direction(),
            lower = action.to_lowercase(),
            threshold = self.threshold,
            short = escape_html(&self.short_name),
            long = escape_html(&self.long_name),
            app = crate::types::APP_NAME,
        )
    }
}

fn escape_html(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn alert(signal: Signal, threshold: f64) -> Alert {
        let quote = Quote {
            ticker_symbol: "PETR4".into(),
            short_name: "PETROBRAS PN".into(),
            long_name: "Petroleo Brasileiro S.A. <Petrobras>".into(),
            current_price: 32.5,
            timestamp: Utc.with_ymd_and_hms(2024, 5, 10, 20, 7, 0).unwrap(),
            is_valid: true,
        };
        Alert::new(&quote, signal, threshold, Local::now())
    }

    #[test]
    fn subject_names_ticker_and_direction() {
        assert_eq!(
            alert(Signal::Sell, 30.0).subject(),
            "stock-alert: PETR4 above sell price"
        );
        assert_eq!(
            alert(Signal::Buy, 40.0).subject(),
            "stock-alert: PETR4 below buy price"
        );
    }

    #[test]
    fn body_carries_price_threshold_and_action() {
        let body = alert(Signal::Sell, 30.0).html_body();

        assert!(body.contains("<b>32.5</b>"));
        assert!(body.contains("<b>above</b> the sell threshold of 30"));
        assert!(body.contains("Suggested action: <b>Sell the asset</b>"));
        assert!(body.contains("Sell threshold: <b>30</b>"));
        assert!(body.contains("Company: <b>PETROBRAS PN</b>"));
    }

    #[test]
    fn names_are_escaped() {
        let body = alert(Signal::Buy, 40.0).html_body();
        assert!(body.contains("Petroleo Brasileiro S.A. &lt;Petrobras&gt;"));
        assert!(!body.contains("<Petrobras>"));
    }
}

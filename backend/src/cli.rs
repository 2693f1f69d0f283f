use std::path::PathBuf;

use alert::Thresholds;
use clap::Parser;
use market::Ticker;

use crate::error::InputError;

pub const USAGE_EXAMPLE: &str = "stock-alert PETR4 20.00 30.00";

#[derive(Debug, Parser)]
#[command(
    name = "stock-alert",
    version,
    about = "Watch one stock and email an alert when its price leaves a buy/sell band",
    after_help = "Example: stock-alert PETR4 20.00 30.00"
)]
pub struct Cli {
    /// Ticker code to watch, e.g. PETR4
    pub ticker: String,

    /// Suggest buying when the price drops below this value
    #[arg(allow_negative_numbers = true)]
    pub buy_price: String,

    /// Suggest selling when the price rises above this value
    #[arg(allow_negative_numbers = true)]
    pub sell_price: String,

    /// Directory holding settings.ini, smtp-credentials.ini and auth-brapi.ini
    #[arg(long, default_value = "config")]
    pub config_dir: PathBuf,

    /// Emit logs as JSON lines
    #[arg(long)]
    pub json_logs: bool,
}

/// Validated command line input.
#[derive(Debug, Clone, PartialEq)]
pub struct Inputs {
    pub ticker: Ticker,
    pub thresholds: Thresholds,
}

impl Cli {
    pub fn validate(&self) -> Result<Inputs, InputError> {
        let ticker = Ticker::parse(&self.ticker)?;
        let buy = parse_price("buy", &self.buy_price)?;
        let sell = parse_price("sell", &self.sell_price)?;
        let thresholds = Thresholds::new(buy, sell)?;
        Ok(Inputs { ticker, thresholds })
    }
}

fn parse_price(which: &'static str, raw: &str) -> Result<f64, InputError> {
    raw.trim().parse().map_err(|_| InputError::Price {
        which,
        value: raw.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use alert::ThresholdError;
    use market::TickerError;

    fn parse(args: &[&str]) -> Result<Inputs, InputError> {
        let argv = std::iter::once("stock-alert").chain(args.iter().copied());
        Cli::try_parse_from(argv).expect("clap accepts the shape").validate()
    }

    #[test]
    fn accepts_the_usage_example() {
        let inputs = parse(&["PETR4", "20.00", "30.00"]).unwrap();
        assert_eq!(inputs.ticker.as_str(), "PETR4");
        assert_eq!(inputs.thresholds.buy_price(), 20.0);
        assert_eq!(inputs.thresholds.sell_price(), 30.0);
    }

    #[test]
    fn defaults_config_dir() {
        let cli = Cli::try_parse_from(["stock-alert", "PETR4", "20", "30"]).unwrap();
        assert_eq!(cli.config_dir, PathBuf::from("config"));
        assert!(!cli.json_logs);
    }

    #[test]
    fn requires_exactly_three_positionals() {
        assert!(Cli::try_parse_from(["stock-alert", "PETR4", "20"]).is_err());
        assert!(Cli::try_parse_from(["stock-alert", "PETR4", "20", "30", "40"]).is_err());
    }

    #[test]
    fn non_numeric_price_is_an_input_error() {
        assert!(matches!(
            parse(&["PETR4", "abc", "30"]),
            Err(InputError::Price { which: "buy", ref value }) if value == "abc"
        ));
        assert!(matches!(
            parse(&["PETR4", "20", "30,50"]),
            Err(InputError::Price { which: "sell", .. })
        ));
    }

    #[test]
    fn rejects_malformed_ticker() {
        assert!(matches!(
            parse(&["P3", "20", "30"]),
            Err(InputError::Ticker(TickerError::Malformed(_)))
        ));
    }

    #[test]
    fn rejects_zero_or_negative_buy_price() {
        assert!(matches!(
            parse(&["PETR4", "0", "30"]),
            Err(InputError::Thresholds(ThresholdError::NonPositiveBuy(_)))
        ));
        assert!(matches!(
            parse(&["PETR4", "-5", "30"]),
            Err(InputError::Thresholds(ThresholdError::NonPositiveBuy(_)))
        ));
    }

    #[test]
    fn rejects_sell_not_above_buy() {
        for (buy, sell) in [("30", "30"), ("30", "20")] {
            assert!(matches!(
                parse(&["PETR4", buy, sell]),
                Err(InputError::Thresholds(ThresholdError::SellNotAboveBuy { .. }))
            ));
        }
    }
}

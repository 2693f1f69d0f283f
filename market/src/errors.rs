use reqwest::StatusCode;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TickerError {
    #[error("ticker must not be empty")]
    Empty,

    #[error("'{0}' is not a valid ticker code")]
    Malformed(String),
}

#[derive(Error, Debug)]
pub enum QuoteError {
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("provider answered with status {0}")]
    Status(StatusCode),

    #[error("malformed response body: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("response has no entry for symbol {0}")]
    SymbolNotFound(String),
}

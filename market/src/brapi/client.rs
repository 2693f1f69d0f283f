use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use tracing::{debug, instrument};

use crate::brapi::types::parse_quote_response;
use crate::errors::QuoteError;
use crate::source::QuoteSource;
use crate::types::{Quote, Ticker};

/// HTTP client for the brapi.dev quote endpoint.
///
/// The access token travels as the `token` query parameter. Transport errors
/// are stripped of their URL before being returned so the token never
/// reaches the logs.
#[derive(Clone)]
pub struct BrapiClient {
    http: Client,
    base_url: String,
    token: String,
}

impl BrapiClient {
    pub fn new(
        base_url: impl Into<String>,
        token: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, QuoteError> {
        let http = Client::builder()
            .timeout(timeout)
            .pool_idle_timeout(Duration::from_secs(30))
            .tcp_keepalive(Duration::from_secs(30))
            .build()?;

        Ok(Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            token: token.into(),
        })
    }

    #[instrument(skip_all, fields(ticker = %ticker), level = "debug")]
    pub async fn fetch_quote(&self, ticker: &Ticker) -> Result<Quote, QuoteError> {
        let url = format!("{}/quote/{}", self.base_url, ticker);

        let resp = self
            .http
            .get(&url)
            .query(&[("token", self.token.as_str())])
            .send()
            .await
            .map_err(|e| QuoteError::Http(e.without_url()))?;

        let status = resp.status();
        if !status.is_success() {
            return Err(QuoteError::Status(status));
        }

        let body = resp
            .text()
            .await
            .map_err(|e| QuoteError::Http(e.without_url()))?;

        let quote = parse_quote_response(&body, ticker)?;

        debug!(
            price = quote.current_price,
            updated_at = %quote.timestamp,
            valid = quote.is_valid,
            "brapi quote fetched"
        );

        Ok(quote)
    }
}

#[async_trait]
impl QuoteSource for BrapiClient {
    async fn fetch(&self, ticker: &Ticker) -> Result<Quote, QuoteError> {
        self.fetch_quote(ticker).await
    }
}

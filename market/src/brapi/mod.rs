//! brapi.dev quote provider.

pub mod client;
pub mod types;

pub use client::BrapiClient;
pub use types::parse_quote_response;

/// Public endpoint used when the configuration does not override it.
pub const DEFAULT_BASE_URL: &str = "https://brapi.dev/api";

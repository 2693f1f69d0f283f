pub mod brapi;
pub mod errors;
pub mod feed;
pub mod slot;
pub mod source;
pub mod types;

pub use errors::{QuoteError, TickerError};
pub use feed::QuoteFeed;
pub use slot::QuoteSlot;
pub use source::QuoteSource;
pub use types::{Quote, Ticker};

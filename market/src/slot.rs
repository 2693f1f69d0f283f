use std::sync::Arc;

use parking_lot::RwLock;

use crate::types::Quote;

/// Single shared slot holding the most recently published quote.
///
/// The feed is the only writer and the alert engine the only reader. Last
/// write wins; a failed fetch publishes `None` over whatever was there.
#[derive(Clone, Default)]
pub struct QuoteSlot {
    inner: Arc<RwLock<Option<Quote>>>,
}

impl QuoteSlot {
    /// Create an empty slot.
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the slot content.
    pub fn publish(&self, quote: Option<Quote>) {
        *self.inner.write() = quote;
    }

    /// Copy of the current content, if any.
    pub fn latest(&self) -> Option<Quote> {
        self.inner.read().clone()
    }
}

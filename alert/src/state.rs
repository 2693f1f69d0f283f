//! Debounce memory of the alert engine.

use market::Quote;

/// Last quote the engine evaluated, used to skip quotes whose timestamp
/// has not moved.
///
/// Owned by the engine; never shared with the feed.
#[derive(Debug, Default)]
pub struct DebounceState {
    last: Option<Quote>,
}

impl DebounceState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether `quote` is no newer than the last evaluated one.
    pub fn is_repeat(&self, quote: &Quote) -> bool {
        self.last
            .as_ref()
            .is_some_and(|last| last.timestamp >= quote.timestamp)
    }

    /// Remember `quote` as evaluated.
    pub fn record(&mut self, quote: Quote) {
        self.last = Some(quote);
    }

    pub fn last(&self) -> Option<&Quote> {
        self.last.as_ref()
    }
}

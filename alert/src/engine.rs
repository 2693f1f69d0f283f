//! The alert decision loop.
//!
//! Each cycle it:
//!   1. Reads the latest quote from the shared `QuoteSlot`.
//!   2. Skips missing, provider-flagged or already evaluated quotes.
//!   3. Classifies the price against the thresholds.
//!   4. Hands an `Alert` to the `Notifier` when a bound was crossed.
//!
//! The returned `CycleOutcome` decides how long to sleep before the next
//! cycle. Nothing that happens inside a cycle stops the loop.

use chrono::Local;
use market::{Quote, QuoteSlot, Ticker};
use tracing::{debug, error, info, warn};

use crate::message::Alert;
use crate::notifier::Notifier;
use crate::policy::Thresholds;
use crate::state::DebounceState;
use crate::types::{AlertPolicy, CycleOutcome};

pub struct AlertEngine<N: Notifier> {
    ticker: Ticker,
    thresholds: Thresholds,
    policy: AlertPolicy,
    slot: QuoteSlot,
    notifier: N,
    debounce: DebounceState,
}

impl<N: Notifier> AlertEngine<N> {
    pub fn new(
        ticker: Ticker,
        thresholds: Thresholds,
        policy: AlertPolicy,
        slot: QuoteSlot,
        notifier: N,
    ) -> Self {
        Self {
            ticker,
            thresholds,
            policy,
            slot,
            notifier,
            debounce: DebounceState::new(),
        }
    }

    /// Last quote the engine evaluated.
    pub fn last_evaluated(&self) -> Option<&Quote> {
        self.debounce.last()
    }

    /// Run a single decision cycle.
    pub async fn tick(&mut self) -> CycleOutcome {
        let quote = match self.slot.latest() {
            Some(q) if q.is_valid => q,
            _ => {
                warn!(ticker = %self.ticker, "alert suppressed: no valid quote available");
                return CycleOutcome::Suppressed;
            }
        };

        if self.debounce.is_repeat(&quote) && !self.policy.resend_when_timestamp_unchanged {
            debug!(timestamp = %quote.timestamp, "quote unchanged since last evaluation");
            return CycleOutcome::Repeated;
        }

        self.debounce.record(quote.clone());

        if !quote.has_usable_price() {
            warn!(price = quote.current_price, "quote has no usable price");
            return CycleOutcome::Unusable;
        }

        let Some(signal) = self.thresholds.classify(quote.current_price).signal() else {
            debug!(price = quote.current_price, "price within thresholds");
            return CycleOutcome::WithinRange;
        };

        let threshold = self.thresholds.bound_for(signal);
        let alert = Alert::new(&quote, signal, threshold, Local::now());

        match self.notifier.notify(&alert).await {
            Ok(()) => {
                info!(
                    ticker = %alert.ticker,
                    price = alert.price,
                    threshold,
                    signal = %signal,
                    "alert sent"
                );
                CycleOutcome::Notified(signal)
            }
            Err(e) => {
                error!(
                    ticker = %alert.ticker,
                    recipient = %self.policy.recipient,
                    error = %e,
                    "failed to send alert"
                );
                CycleOutcome::NotifyFailed(signal)
            }
        }
    }

    /// Run cycles forever, sleeping between them as the outcome dictates.
    pub async fn run(mut self) {
        info!(
            buy_price = self.thresholds.buy_price(),
            sell_price = self.thresholds.sell_price(),
            alert_interval_ms = self.policy.alert_interval.as_millis() as u64,
            update_interval_ms = self.policy.stock_update_interval.as_millis() as u64,
            "alert engine started"
        );

        loop {
            let outcome = self.tick().await;
            tokio::time::sleep(outcome.next_delay(&self.policy)).await;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::message::Signal;
    use crate::notifier::NotifyError;
    use async_trait::async_trait;
    use chrono::{DateTime, TimeZone, Utc};
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;
    use tracing_test::traced_test;

    #[derive(Clone, Default)]
    struct CountingNotifier {
        sent: Arc<AtomicUsize>,
    }

    #[async_trait]
    impl Notifier for CountingNotifier {
        async fn notify(&self, _alert: &Alert) -> Result<(), NotifyError> {
            self.sent.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }
    }

    fn ts(minute: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 5, 10, 15, minute, 0).unwrap()
    }

    fn quote(price: f64, minute: u32) -> Quote {
        Quote {
            ticker_symbol: "PETR4".into(),
            short_name: "PETROBRAS PN".into(),
            long_name: "Petroleo Brasileiro S.A. - Petrobras".into(),
            current_price: price,
            timestamp: ts(minute),
            is_valid: true,
        }
    }

    fn policy(resend: bool) -> AlertPolicy {
        AlertPolicy {
            alert_interval: Duration::from_secs(60),
            stock_update_interval: Duration::from_secs(5),
            recipient: "me@example.com".into(),
            resend_when_timestamp_unchanged: resend,
        }
    }

    fn engine(resend: bool) -> (AlertEngine<CountingNotifier>, QuoteSlot, Arc<AtomicUsize>) {
        let slot = QuoteSlot::new();
        let notifier = CountingNotifier::default();
        let sent = notifier.sent.clone();
        let engine = AlertEngine::new(
            Ticker::parse("PETR4").unwrap(),
            Thresholds::new(20.0, 30.0).unwrap(),
            policy(resend),
            slot.clone(),
            notifier,
        );
        (engine, slot, sent)
    }

    #[tokio::test]
    #[traced_test]
    async fn empty_slot_is_suppressed() {
        let (mut engine, _slot, sent) = engine(false);

        assert_eq!(engine.tick().await, CycleOutcome::Suppressed);
        assert_eq!(sent.load(Ordering::SeqCst), 0);
        assert!(logs_contain("alert suppressed"));
    }

    #[tokio::test]
    async fn invalid_quote_never_notifies() {
        let (mut engine, slot, sent) = engine(true);
        let mut q = quote(50.0, 1);
        q.is_valid = false;
        slot.publish(Some(q));

        for _ in 0..3 {
            assert_eq!(engine.tick().await, CycleOutcome::Suppressed);
        }
        assert_eq!(sent.load(Ordering::SeqCst), 0);
        assert!(engine.last_evaluated().is_none());
    }

    #[tokio::test]
    async fn debounces_on_unchanged_timestamp() {
        let (mut engine, slot, sent) = engine(false);

        slot.publish(Some(quote(32.5, 1)));
        assert_eq!(engine.tick().await, CycleOutcome::Notified(Signal::Sell));
        assert_eq!(engine.last_evaluated().map(|q| q.timestamp), Some(ts(1)));

        assert_eq!(engine.tick().await, CycleOutcome::Repeated);
        assert_eq!(sent.load(Ordering::SeqCst), 1);

        slot.publish(Some(quote(32.5, 2)));
        assert_eq!(engine.tick().await, CycleOutcome::Notified(Signal::Sell));
        assert_eq!(sent.load(Ordering::SeqCst), 2);
        assert_eq!(engine.last_evaluated().map(|q| q.timestamp), Some(ts(2)));
    }

    #[tokio::test]
    async fn resend_flag_disables_debounce() {
        let (mut engine, slot, sent) = engine(true);
        slot.publish(Some(quote(12.0, 1)));

        assert_eq!(engine.tick().await, CycleOutcome::Notified(Signal::Buy));
        assert_eq!(engine.tick().await, CycleOutcome::Notified(Signal::Buy));
        assert_eq!(sent.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn in_range_quote_still_consumes_its_timestamp() {
        let (mut engine, slot, sent) = engine(false);

        slot.publish(Some(quote(25.0, 1)));
        assert_eq!(engine.tick().await, CycleOutcome::WithinRange);
        assert_eq!(engine.last_evaluated().map(|q| q.timestamp), Some(ts(1)));

        // Same timestamp, now out of range: still a repeat.
        slot.publish(Some(quote(35.0, 1)));
        assert_eq!(engine.tick().await, CycleOutcome::Repeated);
        assert_eq!(sent.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn negative_price_is_unusable() {
        let (mut engine, slot, sent) = engine(false);
        slot.publish(Some(quote(Quote::MISSING_PRICE, 1)));

        assert_eq!(engine.tick().await, CycleOutcome::Unusable);
        assert_eq!(sent.load(Ordering::SeqCst), 0);
        assert!(engine.last_evaluated().is_some());
    }

    #[test]
    fn outcome_picks_the_matching_interval() {
        let p = policy(false);
        assert_eq!(CycleOutcome::Suppressed.next_delay(&p), p.stock_update_interval);
        assert_eq!(CycleOutcome::Repeated.next_delay(&p), p.stock_update_interval);
        assert_eq!(CycleOutcome::Unusable.next_delay(&p), p.alert_interval);
        assert_eq!(CycleOutcome::WithinRange.next_delay(&p), p.alert_interval);
        assert_eq!(CycleOutcome::Notified(Signal::Buy).next_delay(&p), p.alert_interval);
        assert_eq!(CycleOutcome::NotifyFailed(Signal::Sell).next_delay(&p), p.alert_interval);
    }
}

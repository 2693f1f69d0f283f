//! Shared types used by the alert subsystem.

use std::time::Duration;

use crate::message::Signal;

/// Name used in alert subjects and footers.
pub const APP_NAME: &str = "stock-alert";

/// Timing and delivery knobs for the alert loop, loaded once at startup.
#[derive(Debug, Clone, PartialEq)]
pub struct AlertPolicy {
    /// Pause after a cycle that looked at a fresh quote.
    pub alert_interval: Duration,

    /// Pause after a cycle that had nothing new to look at. Also the
    /// quote feed's polling period.
    pub stock_update_interval: Duration,

    /// Address alerts are delivered to.
    pub recipient: String,

    /// When set, a quote whose timestamp did not move is evaluated again
    /// instead of being skipped.
    pub resend_when_timestamp_unchanged: bool,
}

/// What a single engine cycle did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CycleOutcome {
    /// No quote, or the provider flagged it.
    Suppressed,
    /// Quote timestamp has not moved since the last evaluated quote.
    Repeated,
    /// Quote carries no usable price.
    Unusable,
    WithinRange,
    Notified(Signal),
    NotifyFailed(Signal),
}

impl CycleOutcome {
    /// How long to wait before the next cycle.
    pub fn next_delay(&self, policy: &AlertPolicy) -> Duration {
        match self {
            CycleOutcome::Suppressed | CycleOutcome::Repeated => policy.stock_update_interval,
            CycleOutcome::Unusable
            | CycleOutcome::WithinRange
            | CycleOutcome::Notified(_)
            | CycleOutcome::NotifyFailed(_) => policy.alert_interval,
        }
    }
}

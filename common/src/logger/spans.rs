use std::future::Future;
use std::time::Duration;

use tokio::time::Instant;

use tracing::Span;

/// Span for one of the long running loops, tagged with the watched ticker.
///
/// Callers attach it with `Instrument::instrument` so every event emitted
/// inside the loop carries the loop name and ticker.
pub fn loop_span(name: &'static str, ticker: &str) -> Span {
    tracing::info_span!("loop", name = %name, ticker = %ticker)
}

/// Await `fut` and emit a warning when it took longer than `max`.
pub async fn warn_if_slow<F, T>(label: &'static str, max: Duration, fut: F) -> T
where
    F: Future<Output = T>,
{
    let start = Instant::now();
    let out = fut.await;
    let elapsed = start.elapsed();
    if elapsed > max {
        tracing::warn!(
            label = label,
            elapsed_ms = elapsed.as_millis() as u64,
            max_ms = max.as_millis() as u64,
            "slow operation detected"
        );
    }
    out
}

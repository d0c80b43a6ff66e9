use std::time::Duration;

use tracing::trace;

use crate::LOG_TARGET;

/// Suspends the calling task for at least `duration`, leaving other tasks free to run.
pub async fn sleep(duration: Duration) {
    trace!(target: LOG_TARGET, ?duration, "Sleeping.");
    tokio::time::sleep(duration).await;
}

/// [`sleep`] for `millis` milliseconds.
pub async fn sleep_ms(millis: u64) {
    sleep(Duration::from_millis(millis)).await;
}

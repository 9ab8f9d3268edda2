//! Time source used for response timestamps and the simulated inter-chunk
//! latency.
//!
//! Responders never read the wall clock or sleep directly; they go through a
//! [`Clock`] so tests can pin timestamps and skip real waiting.

use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;

/// Source of timestamps and delays for a responder.
#[async_trait]
pub trait Clock: Send + Sync + 'static {
    /// Current time as whole seconds since the Unix epoch.
    fn now_unix(&self) -> u64;

    /// Suspend the calling task for `duration`.
    async fn sleep(&self, duration: Duration);
}

/// Wall-clock time and tokio timers.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

#[async_trait]
impl Clock for SystemClock {
    fn now_unix(&self) -> u64 {
        // Pre-epoch clocks are clamped rather than wrapped.
        u64::try_from(Utc::now().timestamp()).unwrap_or(0)
    }

    async fn sleep(&self, duration: Duration) {
        tokio::time::sleep(duration).await;
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn system_clock_is_after_2020() {
        assert!(SystemClock.now_unix() > 1_577_836_800);
    }

    #[tokio::test(start_paused = true)]
    async fn system_clock_sleep_advances_tokio_time() {
        let start = tokio::time::Instant::now();
        SystemClock.sleep(Duration::from_millis(200)).await;
        assert!(start.elapsed() >= Duration::from_millis(200));
    }
}

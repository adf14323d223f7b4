use std::sync::Arc;
use std::sync::atomic::AtomicU64;
use std::sync::atomic::Ordering;
use std::time::Duration;

use tokio::time::Instant;

/// Source of "now" for a token bucket, in milliseconds
///
/// Only differences between readings matter, so the epoch is up to the
/// implementation. Readings must never go backwards.
pub trait Clock: Send + Sync {
    fn now_millis(&self) -> u64;
}

impl<C: Clock + ?Sized> Clock for Arc<C> {
    #[inline(always)]
    fn now_millis(&self) -> u64 {
        (**self).now_millis()
    }
}

/// Monotonic clock backed by the tokio timer
///
/// Measured with `tokio::time::Instant`, so paused tokio time (test-util)
/// moves this clock together with `tokio::time::sleep`.
#[derive(Debug, Clone, Copy)]
pub struct TimeSource {
    /// Epoch for relative time measurements
    epoch: Instant,
}

impl TimeSource {
    /// Create a new time source with current time as epoch
    #[inline(always)]
    pub fn new() -> Self {
        Self { epoch: Instant::now() }
    }
}

impl Clock for TimeSource {
    #[inline(always)]
    fn now_millis(&self) -> u64 {
        self.epoch.elapsed().as_millis() as u64
    }
}

impl Default for TimeSource {
    fn default() -> Self {
        Self::new()
    }
}

/// Manually driven clock for deterministic tests and simulations
#[derive(Debug, Default)]
pub struct ManualClock {
    now: AtomicU64,
}

impl ManualClock {
    pub fn new(start_millis: u64) -> Self {
        Self { now: AtomicU64::new(start_millis) }
    }

    /// Move the clock forward by whole milliseconds; any sub-millisecond
    /// remainder of `by` is dropped
    pub fn advance(&self, by: Duration) {
        self.now.fetch_add(by.as_millis() as u64, Ordering::Release);
    }

    /// Jump to an absolute reading; earlier readings are ignored
    pub fn set(&self, millis: u64) {
        self.now.fetch_max(millis, Ordering::Release);
    }
}

impl Clock for ManualClock {
    #[inline(always)]
    fn now_millis(&self) -> u64 {
        self.now.load(Ordering::Acquire)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn test_time_source_follows_tokio_time() {
        let ts = TimeSource::new();
        let t1 = ts.now_millis();
        tokio::time::sleep(Duration::from_millis(10)).await;
        let t2 = ts.now_millis();

        assert_eq!(t2 - t1, 10);
    }

    #[test]
    fn test_manual_clock() {
        let clock = ManualClock::new(5);
        clock.advance(Duration::from_millis(20));
        assert_eq!(clock.now_millis(), 25);

        clock.advance(Duration::from_micros(900));
        assert_eq!(clock.now_millis(), 25);

        // Never goes backwards
        clock.set(10);
        assert_eq!(clock.now_millis(), 25);
        clock.set(100);
        assert_eq!(clock.now_millis(), 100);
    }

    #[test]
    fn test_shared_clock() {
        let clock = Arc::new(ManualClock::default());
        let shared = Arc::clone(&clock);
        clock.advance(Duration::from_secs(1));
        assert_eq!(shared.now_millis(), 1000);
    }
}

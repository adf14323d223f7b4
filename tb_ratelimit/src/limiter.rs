use std::future::Future;
use std::pin::Pin;
use std::time::Duration;

use crate::error::Result;

/// Pending wait returned by `throttle`, resolving to the waited delay
///
/// Owns nothing from the limiter, so it can be awaited after the limiter is
/// released or moved to another task.
pub type ThrottleFuture = Pin<Box<dyn Future<Output = Result<Duration>> + Send + 'static>>;

/// Admission control shared between tasks
pub trait RateLimiter: Send + Sync {
    /// Reserve `quantity` tokens and return how long the caller must wait
    fn request(&self, quantity: u32) -> Result<Duration>;

    /// Reserve a single token
    fn request_one(&self) -> Result<Duration> {
        self.request(1)
    }

    /// Reserve `quantity` tokens now and wait out the delay when awaited
    fn throttle(&self, quantity: u32) -> ThrottleFuture;

    /// Throttle on a single token
    fn throttle_one(&self) -> ThrottleFuture {
        self.throttle(1)
    }

    /// Current balance after refill, negative while requests are queued
    fn tokens(&self) -> i64;

    /// Get the maximum capacity
    fn capacity(&self) -> u32;

    /// Reset the rate limiter to initial state
    fn reset(&self);
}

use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;

use crate::error::Result;
use crate::limiter::RateLimiter;
use crate::limiter::ThrottleFuture;
use crate::options::TokenBucketOptions;
use crate::time::Clock;
use crate::time::TimeSource;
use crate::token_bucket::TokenBucket;

/// Cloneable handle serialising access to one [`TokenBucket`]
///
/// Each call locks the bucket only for the synchronous reservation. The wait
/// of `throttle` runs after the lock is released, so sleeping callers never
/// hold up others. Requests are admitted in lock acquisition order.
pub struct SharedTokenBucket<C = TimeSource> {
    inner: Arc<Mutex<TokenBucket<C>>>,
}

impl SharedTokenBucket<TimeSource> {
    pub fn new(options: TokenBucketOptions) -> Result<Self> {
        TokenBucket::new(options).map(Self::from_bucket)
    }
}

impl<C: Clock> SharedTokenBucket<C> {
    pub fn from_bucket(bucket: TokenBucket<C>) -> Self {
        Self { inner: Arc::new(Mutex::new(bucket)) }
    }

    /// Overwrite the balance, see [`TokenBucket::set_tokens`]
    pub fn set_tokens(&self, tokens: i64) {
        self.inner.lock().set_tokens(tokens);
    }

    /// Run `f` with exclusive access to the bucket
    pub fn with_bucket<R>(&self, f: impl FnOnce(&mut TokenBucket<C>) -> R) -> R {
        f(&mut *self.inner.lock())
    }
}

impl<C> Clone for SharedTokenBucket<C> {
    fn clone(&self) -> Self {
        Self { inner: Arc::clone(&self.inner) }
    }
}

impl<C: Clock> RateLimiter for SharedTokenBucket<C> {
    fn request(&self, quantity: u32) -> Result<Duration> {
        self.inner.lock().request(quantity)
    }

    fn throttle(&self, quantity: u32) -> ThrottleFuture {
        self.inner.lock().throttle(quantity)
    }

    fn tokens(&self) -> i64 {
        self.inner.lock().current_tokens()
    }

    fn capacity(&self) -> u32 {
        self.inner.lock().bucket_size()
    }

    fn reset(&self) {
        self.inner.lock().reset();
    }
}

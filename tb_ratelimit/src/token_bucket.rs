use std::time::Duration;

use crate::error::RateLimitError;
use crate::error::Result;
use crate::limiter::ThrottleFuture;
use crate::options::TokenBucketBuilder;
use crate::options::TokenBucketOptions;
use crate::time::Clock;
use crate::time::TimeSource;

/// Token bucket with lazy refill and a bounded backlog
///
/// Tokens are restored at `tokens_per_interval` per `interval` milliseconds,
/// up to `bucket_size`. A request that finds too few tokens is still admitted
/// and leaves the bucket negative ("owed" tokens); the caller is told how long
/// to wait before its work may start. Once the backlog would exceed
/// `queue_size` the request is refused instead.
///
/// All accounting is integral. Refill credits whole tokens only and advances
/// the refill instant by the whole milliseconds those tokens cost, so leftover
/// time carries over to the next refill and is never credited twice.
///
/// The bucket is owned and mutated through `&mut self`. Use
/// [`SharedTokenBucket`](crate::SharedTokenBucket) to share one between tasks.
#[derive(Debug)]
pub struct TokenBucket<C = TimeSource> {
    /// Maximum number of tokens (capacity)
    bucket_size: u32,

    /// Refill cycle in milliseconds
    interval: u32,

    /// Tokens restored every cycle
    tokens_per_interval: u32,

    /// Maximum backlog before requests are refused
    queue_size: u32,

    /// Current balance, negative while requests are queued
    tokens: i64,

    /// Clock reading up to which refill has been accounted for
    last_request: u64,

    clock: C,
}

impl TokenBucket<TimeSource> {
    /// Create a bucket on the tokio clock
    pub fn new(options: TokenBucketOptions) -> Result<Self> {
        Self::with_clock(options, TimeSource::new())
    }

    /// Create a builder for configuring a token bucket
    pub fn builder() -> TokenBucketBuilder {
        TokenBucketBuilder::new()
    }
}

impl<C: Clock> TokenBucket<C> {
    /// Create a bucket reading time from `clock`
    pub fn with_clock(options: TokenBucketOptions, clock: C) -> Result<Self> {
        options.validate()?;

        let mut bucket = Self {
            bucket_size: options.bucket_size,
            interval: options.interval_ms,
            tokens_per_interval: options.tokens_per_interval,
            queue_size: options.effective_queue_size(),
            tokens: 0,
            last_request: 0,
            clock,
        };
        bucket.reset();

        if let Some(tokens) = options.tokens {
            bucket.set_tokens(tokens);
        }

        Ok(bucket)
    }

    /// Credit the tokens earned since the last accounted instant
    #[inline]
    fn refill(&mut self) {
        let now = self.clock.now_millis();
        let elapsed = now.saturating_sub(self.last_request) as u128;
        let per_interval = self.tokens_per_interval as u128;
        let interval = self.interval as u128;

        // floor for tokens, ceil for the time they consumed
        let earned = elapsed * per_interval / interval;
        if earned > 0 {
            let consumed = (earned * interval).div_ceil(per_interval);
            self.tokens = self.tokens.saturating_add(earned.min(i64::MAX as u128) as i64);
            self.last_request += consumed as u64;
        }

        if self.tokens > self.bucket_size as i64 {
            self.reset();
        }
    }

    /// Reserve `quantity` tokens and return how long to wait before using them
    ///
    /// A zero delay means the request may proceed immediately. Otherwise the
    /// delay covers the whole refill cycles needed to pay back the backlog.
    ///
    /// Fails with [`RateLimitError::InvalidArgument`] for a zero quantity and
    /// with [`RateLimitError::QueueOverflow`] when the backlog would exceed the
    /// queue size, in which case no tokens are reserved.
    pub fn request(&mut self, quantity: u32) -> Result<Duration> {
        if quantity == 0 {
            return Err(RateLimitError::InvalidArgument { quantity });
        }

        self.refill();

        let remaining = self.tokens.saturating_sub(quantity as i64);
        if remaining < 0 && remaining.unsigned_abs() > self.queue_size as u64 {
            return Err(RateLimitError::QueueOverflow { requested: quantity, queue_size: self.queue_size });
        }

        self.tokens = remaining;
        Ok(self.backlog_delay())
    }

    /// Reserve a single token
    #[inline]
    pub fn request_one(&mut self) -> Result<Duration> {
        self.request(1)
    }

    fn backlog_delay(&self) -> Duration {
        if self.tokens >= 0 {
            return Duration::ZERO;
        }

        let cycles = self.tokens.unsigned_abs().div_ceil(self.tokens_per_interval as u64);
        Duration::from_millis(cycles.saturating_mul(self.interval as u64))
    }

    /// Reserve `quantity` tokens and wait out the resulting delay
    ///
    /// The reservation happens now, before the future is polled; the future
    /// only sleeps. Errors are reported by the future, never by this call.
    /// Dropping the future does not give the tokens back.
    pub fn throttle(&mut self, quantity: u32) -> ThrottleFuture {
        let admission = self.request(quantity);

        Box::pin(async move {
            let delay = admission?;
            if !delay.is_zero() {
                tokio::time::sleep(delay).await;
            }
            Ok(delay)
        })
    }

    /// Throttle on a single token
    #[inline]
    pub fn throttle_one(&mut self) -> ThrottleFuture {
        self.throttle(1)
    }

    /// Refill the bucket and return the current balance
    ///
    /// This advances the refill state, so it takes `&mut self`.
    pub fn current_tokens(&mut self) -> i64 {
        self.refill();
        self.tokens
    }

    /// Overwrite the balance and restart refill accounting from now
    ///
    /// The value is not clamped to the bucket size.
    pub fn set_tokens(&mut self, tokens: i64) {
        self.tokens = tokens;
        self.last_request = self.clock.now_millis();
    }

    /// Refill the bucket completely and drop any backlog
    pub fn reset(&mut self) {
        self.tokens = self.bucket_size as i64;
        self.last_request = self.clock.now_millis();
    }

    pub fn bucket_size(&self) -> u32 {
        self.bucket_size
    }

    pub fn interval(&self) -> Duration {
        Duration::from_millis(self.interval as u64)
    }

    pub fn tokens_per_interval(&self) -> u32 {
        self.tokens_per_interval
    }

    pub fn queue_size(&self) -> u32 {
        self.queue_size
    }
}

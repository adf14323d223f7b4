use std::time::Duration;

use serde::Deserialize;

use crate::error::RateLimitError;
use crate::error::Result;
use crate::time::Clock;
use crate::token_bucket::TokenBucket;

/// Backlog allowed when no queue size is configured
pub const DEFAULT_QUEUE_SIZE: u32 = 50;

/// Construction options for a [`TokenBucket`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct TokenBucketOptions {
    /// Maximum number of tokens inside the bucket
    pub bucket_size: u32,

    /// Refill cycle in milliseconds
    #[serde(alias = "interval")]
    pub interval_ms: u32,

    /// Tokens restored every `interval_ms`
    pub tokens_per_interval: u32,

    /// Maximum number of tokens the bucket may go negative by
    #[serde(default)]
    pub queue_size: Option<u32>,

    /// Initial token count, defaults to `bucket_size`
    #[serde(default)]
    pub tokens: Option<i64>,
}

impl TokenBucketOptions {
    pub fn new(bucket_size: u32, interval: Duration, tokens_per_interval: u32) -> Self {
        Self {
            bucket_size,
            interval_ms: interval.as_millis().min(u32::MAX as u128) as u32,
            tokens_per_interval,
            queue_size: None,
            tokens: None,
        }
    }

    pub fn with_queue_size(mut self, queue_size: u32) -> Self {
        self.queue_size = Some(queue_size);
        self
    }

    pub fn with_tokens(mut self, tokens: i64) -> Self {
        self.tokens = Some(tokens);
        self
    }

    /// Queue size with the default applied
    pub fn effective_queue_size(&self) -> u32 {
        self.queue_size.unwrap_or(DEFAULT_QUEUE_SIZE)
    }

    /// Check that every required value is a positive integer
    pub fn validate(&self) -> Result<()> {
        positive("bucket_size", self.bucket_size)?;
        positive("interval", self.interval_ms)?;
        positive("tokens_per_interval", self.tokens_per_interval)?;
        Ok(())
    }
}

#[inline]
fn positive(field: &'static str, value: u32) -> Result<()> {
    if value == 0 {
        return Err(RateLimitError::InvalidOption { field, reason: "must be a positive integer" });
    }
    Ok(())
}

fn required(field: &'static str, value: Option<u32>) -> Result<u32> {
    value.ok_or(RateLimitError::InvalidOption { field, reason: "is required" })
}

/// Builder for configuring a token bucket
#[derive(Debug, Default)]
pub struct TokenBucketBuilder {
    bucket_size: Option<u32>,
    interval_ms: Option<u32>,
    tokens_per_interval: Option<u32>,
    queue_size: Option<u32>,
    tokens: Option<i64>,
}

impl TokenBucketBuilder {
    /// Create a new builder
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the bucket capacity (max tokens)
    pub fn bucket_size(mut self, bucket_size: u32) -> Self {
        self.bucket_size = Some(bucket_size);
        self
    }

    /// Set the refill interval, truncated to whole milliseconds
    pub fn interval(mut self, interval: Duration) -> Self {
        self.interval_ms = Some(interval.as_millis().min(u32::MAX as u128) as u32);
        self
    }

    /// Set the number of tokens restored per interval
    pub fn tokens_per_interval(mut self, tokens: u32) -> Self {
        self.tokens_per_interval = Some(tokens);
        self
    }

    /// Set `tokens` restored every second
    pub fn per_second(self, tokens: u32) -> Self {
        self.tokens_per_interval(tokens).interval(Duration::from_secs(1))
    }

    /// Set `tokens` restored every minute
    pub fn per_minute(self, tokens: u32) -> Self {
        self.tokens_per_interval(tokens).interval(Duration::from_secs(60))
    }

    /// Set the maximum backlog
    pub fn queue_size(mut self, queue_size: u32) -> Self {
        self.queue_size = Some(queue_size);
        self
    }

    /// Override the initial token count
    pub fn initial_tokens(mut self, tokens: i64) -> Self {
        self.tokens = Some(tokens);
        self
    }

    /// Collect the configured values into options
    pub fn options(&self) -> Result<TokenBucketOptions> {
        Ok(TokenBucketOptions {
            bucket_size: required("bucket_size", self.bucket_size)?,
            interval_ms: required("interval", self.interval_ms)?,
            tokens_per_interval: required("tokens_per_interval", self.tokens_per_interval)?,
            queue_size: self.queue_size,
            tokens: self.tokens,
        })
    }

    /// Build the token bucket on the tokio clock
    pub fn build(self) -> Result<TokenBucket> {
        TokenBucket::new(self.options()?)
    }

    /// Build the token bucket on a custom clock
    pub fn build_with_clock<C: Clock>(self, clock: C) -> Result<TokenBucket<C>> {
        TokenBucket::with_clock(self.options()?, clock)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn options() -> TokenBucketOptions {
        TokenBucketOptions::new(2, Duration::from_secs(1), 2)
    }

    #[test]
    fn test_valid_options() {
        assert!(options().validate().is_ok());
        assert_eq!(options().effective_queue_size(), DEFAULT_QUEUE_SIZE);
        assert_eq!(options().with_queue_size(0).effective_queue_size(), 0);
    }

    #[test]
    fn test_zero_fields_rejected() {
        let cases = [
            (TokenBucketOptions { bucket_size: 0, ..options() }, "bucket_size"),
            (TokenBucketOptions { interval_ms: 0, ..options() }, "interval"),
            (TokenBucketOptions { tokens_per_interval: 0, ..options() }, "tokens_per_interval"),
        ];

        for (opts, expected) in cases {
            match opts.validate() {
                Err(RateLimitError::InvalidOption { field, .. }) => assert_eq!(field, expected),
                other => panic!("expected InvalidOption for {expected}, got {other:?}"),
            }
        }
    }

    #[test]
    fn test_sub_millisecond_interval_rejected() {
        let opts = TokenBucketOptions::new(1, Duration::from_micros(500), 1);
        assert!(matches!(opts.validate(), Err(RateLimitError::InvalidOption { field: "interval", .. })));
    }

    #[test]
    fn test_builder_missing_field() {
        let result = TokenBucketBuilder::new().bucket_size(10).tokens_per_interval(1).options();
        assert_eq!(result, Err(RateLimitError::InvalidOption { field: "interval", reason: "is required" }));
    }

    #[test]
    fn test_builder_per_minute() {
        let opts = TokenBucketBuilder::new().bucket_size(120).per_minute(60).queue_size(5).options().unwrap();
        assert_eq!(opts.interval_ms, 60_000);
        assert_eq!(opts.tokens_per_interval, 60);
        assert_eq!(opts.queue_size, Some(5));
    }

    #[test]
    fn test_deserialize() {
        let opts: TokenBucketOptions =
            serde_json::from_str(r#"{"bucket_size": 5, "interval": 1000, "tokens_per_interval": 2, "queue_size": 0}"#).unwrap();
        assert_eq!(opts, TokenBucketOptions::new(5, Duration::from_secs(1), 2).with_queue_size(0));
    }

    #[test]
    fn test_deserialize_rejects_negative() {
        let result = serde_json::from_str::<TokenBucketOptions>(r#"{"bucket_size": -1, "interval_ms": 1000, "tokens_per_interval": 2}"#);
        assert!(result.is_err());
    }
}

//! # tb_ratelimit
//!
//! Token bucket admission control with lazy integer refill and a bounded
//! backlog. `request` reports how long a caller must wait, `throttle` waits it
//! out on the tokio timer.

pub mod error;
pub mod limiter;
pub mod options;
pub mod shared;
mod time;
pub mod token_bucket;

pub use error::RateLimitError;
pub use error::Result;
pub use limiter::RateLimiter;
pub use limiter::ThrottleFuture;
pub use options::DEFAULT_QUEUE_SIZE;
pub use options::TokenBucketBuilder;
pub use options::TokenBucketOptions;
pub use shared::SharedTokenBucket;
pub use time::Clock;
pub use time::ManualClock;
pub use time::TimeSource;
pub use token_bucket::TokenBucket;

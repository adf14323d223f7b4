use tb_ratelimit::RateLimitError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    #[error("Rate limiter error: {0}")]
    RateLimit(#[from] RateLimitError),
}

pub type Result<T> = std::result::Result<T, AppError>;

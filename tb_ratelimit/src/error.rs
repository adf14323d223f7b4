use thiserror::Error;

/// Result type for rate limiting operations
pub type Result<T> = std::result::Result<T, RateLimitError>;

/// Errors that can occur during rate limiting operations
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum RateLimitError {
    /// A construction option is missing or out of range
    #[error("Invalid option {field}: {reason}")]
    InvalidOption { field: &'static str, reason: &'static str },

    /// Requested quantity is not a positive integer
    #[error("Tokens quantity must be a positive integer, got {quantity}")]
    InvalidArgument { quantity: u32 },

    /// Debiting the request would push the backlog past the queue limit
    #[error("Queue size limit reached: requested {requested} tokens with queue size {queue_size}")]
    QueueOverflow { requested: u32, queue_size: u32 },
}

impl RateLimitError {
    /// Whether the error is backpressure that a caller may retry later
    pub fn is_overflow(&self) -> bool {
        matches!(self, RateLimitError::QueueOverflow { .. })
    }
}

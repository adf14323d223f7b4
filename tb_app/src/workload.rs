use std::time::Duration;

use serde::Deserialize;
use tb_ratelimit::RateLimitError;
use tb_ratelimit::RateLimiter;
use tracing::debug;
use tracing::info;
use tracing::warn;

use crate::error::Result;

/// Simulated calls to push through the bucket
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct WorkloadConfig {
    /// Number of sequential calls
    pub requests: u32,

    /// Tokens spent per call
    pub quantity: u32,
}

impl Default for WorkloadConfig {
    fn default() -> Self {
        Self { requests: 10, quantity: 1 }
    }
}

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct WorkloadReport {
    pub admitted: u32,
    pub rejected: u32,
    pub total_waited: Duration,
}

/// Throttle `workload.requests` calls one after another
///
/// Queue overflows are counted as rejections and not retried. Any other
/// limiter error aborts the run.
pub async fn run_workload<L: RateLimiter + ?Sized>(limiter: &L, workload: &WorkloadConfig) -> Result<WorkloadReport> {
    let mut report = WorkloadReport::default();

    for call in 0..workload.requests {
        match limiter.throttle(workload.quantity).await {
            Ok(waited) => {
                debug!("Call {call} admitted after {}ms, {} tokens left", waited.as_millis(), limiter.tokens());
                report.admitted += 1;
                report.total_waited += waited;
            }
            Err(err @ RateLimitError::QueueOverflow { .. }) => {
                warn!("Call {call} rejected: {err}");
                report.rejected += 1;
            }
            Err(err) => return Err(err.into()),
        }
    }

    info!(
        "Workload finished: admitted={}, rejected={}, waited={}ms",
        report.admitted,
        report.rejected,
        report.total_waited.as_millis()
    );

    Ok(report)
}

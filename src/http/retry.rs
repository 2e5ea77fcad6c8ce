//! Retry policy for API requests: failure kinds, backoff, and sleeping.

use async_trait::async_trait;
use reqwest::StatusCode;
use std::time::Duration;
use thiserror::Error;

/// Base unit of the linear backoff between attempts.
pub const RETRY_DELAY_MS: u64 = 1000;

/// Why a single attempt failed.
///
/// Every variant counts against the same attempt budget; the retry loop does
/// not treat any of them differently.
#[derive(Debug, Error)]
pub enum AttemptError {
    /// No complete response within the per-attempt deadline.
    #[error("request timed out after {}ms", .0.as_millis())]
    Timeout(Duration),

    /// Connection refused, DNS failure, and other errors before a response.
    #[error("request failed: {0}")]
    Transport(reqwest::Error),

    /// A response arrived with a non-2xx status.
    #[error("HTTP error! status: {}", .0.as_u16())]
    Status(StatusCode),

    /// The response body could not be read.
    #[error("failed to read response body: {0}")]
    Body(reqwest::Error),

    /// The server declared JSON but the body did not parse.
    #[error("failed to parse JSON response: {0}")]
    Decode(serde_json::Error),
}

impl AttemptError {
    /// Timeouts and connection-level errors, including a connection lost
    /// while the body was being read.
    pub fn is_transport(&self) -> bool {
        matches!(
            self,
            AttemptError::Timeout(_) | AttemptError::Transport(_) | AttemptError::Body(_)
        )
    }

    /// A response was received but its status or JSON body was unusable.
    pub fn is_status(&self) -> bool {
        !self.is_transport()
    }
}

/// Delay after the failed attempt with the given 0-based index: 1s, 2s, 3s, ...
pub fn backoff_delay(attempt_index: u32) -> Duration {
    Duration::from_millis(RETRY_DELAY_MS * (u64::from(attempt_index) + 1))
}

/// Waits out the backoff between attempts.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Sleeper: Send + Sync {
    async fn sleep(&self, duration: Duration);
}

/// Sleeps on the tokio timer.
#[derive(Debug, Clone, Copy, Default)]
pub struct TokioSleeper;

#[async_trait]
impl Sleeper for TokioSleeper {
    async fn sleep(&self, duration: Duration) {
        tokio::time::sleep(duration).await;
    }
}

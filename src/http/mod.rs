//! HTTP request executor with retry logic and timeouts.

mod client;
mod retry;

pub use client::{HttpClient, build_url};
pub use retry::{AttemptError, RETRY_DELAY_MS, Sleeper, TokioSleeper, backoff_delay};

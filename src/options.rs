//! Per-call options and their defaults.

use std::time::Duration;

/// Attempts made when the caller does not say otherwise.
pub const DEFAULT_MAX_RETRIES: u32 = 3;

/// Per-attempt deadline in milliseconds.
pub const DEFAULT_TIMEOUT_MS: u64 = 10_000;

/// `User-Agent` sent when the caller does not provide one.
pub const DEFAULT_USER_AGENT: &str = "wikipedia-jp-api/1.0.0";

/// Options recognised by every API call. Unset fields fall back to the
/// defaults above when the call starts.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ApiOptions {
    pub max_retries: Option<u32>,
    pub timeout_ms: Option<u64>,
    pub user_agent: Option<String>,
}

impl ApiOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = Some(max_retries);
        self
    }

    pub fn timeout_ms(mut self, timeout_ms: u64) -> Self {
        self.timeout_ms = Some(timeout_ms);
        self
    }

    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = Some(user_agent.into());
        self
    }

    /// Fills in defaults. A retry ceiling of 0 is raised to 1.
    pub fn resolve(&self) -> ResolvedOptions {
        ResolvedOptions {
            max_retries: self.max_retries.unwrap_or(DEFAULT_MAX_RETRIES).max(1),
            timeout: Duration::from_millis(self.timeout_ms.unwrap_or(DEFAULT_TIMEOUT_MS)),
            user_agent: self
                .user_agent
                .clone()
                .unwrap_or_else(|| DEFAULT_USER_AGENT.to_string()),
        }
    }
}

/// Options with every default applied; fixed for the lifetime of one call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedOptions {
    pub max_retries: u32,
    pub timeout: Duration,
    pub user_agent: String,
}

impl Default for ResolvedOptions {
    fn default() -> Self {
        ApiOptions::default().resolve()
    }
}

//! Request executor: one GET against the API endpoint, bounded by a timeout
//! and retried with linear backoff.

use anyhow::{Context, Result};
use log::{debug, warn};
use reqwest::{
    Client, Url,
    header::{CONTENT_TYPE, USER_AGENT},
};
use std::sync::Arc;

use super::retry::{AttemptError, Sleeper, TokioSleeper, backoff_delay};
use crate::options::ResolvedOptions;
use crate::params::Params;
use crate::response::{ApiResponse, is_json_content_type};

/// HTTP client with built-in retry logic for API requests.
#[derive(Clone)]
pub struct HttpClient {
    client: Client,
    sleeper: Arc<dyn Sleeper>,
}

impl HttpClient {
    /// Creates a new HTTP client wrapping the given reqwest Client.
    pub fn new(client: Client) -> Self {
        Self {
            client,
            sleeper: Arc::new(TokioSleeper),
        }
    }

    /// Replaces how backoff delays are waited out.
    pub fn with_sleeper(mut self, sleeper: Arc<dyn Sleeper>) -> Self {
        self.sleeper = sleeper;
        self
    }

    /// Performs a GET against `endpoint` with `params` merged over the default
    /// parameters, retrying any failure until `options.max_retries` attempts
    /// have been made.
    ///
    /// The last attempt's failure is returned with the endpoint as context.
    #[tracing::instrument(skip(self, params, options))]
    pub async fn execute(
        &self,
        endpoint: &str,
        params: &Params,
        options: &ResolvedOptions,
    ) -> Result<ApiResponse> {
        let url = build_url(endpoint, params)?;
        debug!("GET {} (up to {} attempts)...", url, options.max_retries);

        let mut attempt: u32 = 0;
        loop {
            match self.attempt_once(&url, options).await {
                Ok(response) => return Ok(response),
                Err(e) if attempt + 1 >= options.max_retries => {
                    debug!(
                        "GET {}: attempt {}/{} failed ({}), giving up",
                        endpoint,
                        attempt + 1,
                        options.max_retries,
                        e
                    );
                    return Err(anyhow::Error::from(e).context(format!(
                        "GET {} failed after {} attempt(s)",
                        endpoint,
                        attempt + 1
                    )));
                }
                Err(e) => {
                    let delay = backoff_delay(attempt);
                    warn!(
                        "GET {}: attempt {}/{} failed ({}), retrying in {}ms...",
                        endpoint,
                        attempt + 1,
                        options.max_retries,
                        e,
                        delay.as_millis()
                    );
                    self.sleeper.sleep(delay).await;
                    attempt += 1;
                }
            }
        }
    }

    /// A single attempt. Headers and body must both arrive before the
    /// deadline; on expiry the in-flight request is dropped.
    async fn attempt_once(
        &self,
        url: &Url,
        options: &ResolvedOptions,
    ) -> Result<ApiResponse, AttemptError> {
        let request = async {
            let response = self
                .client
                .get(url.clone())
                .header(USER_AGENT, &options.user_agent)
                .send()
                .await
                .map_err(AttemptError::Transport)?;

            let status = response.status();
            if !status.is_success() {
                return Err(AttemptError::Status(status));
            }

            let content_type = response
                .headers()
                .get(CONTENT_TYPE)
                .and_then(|v| v.to_str().ok())
                .map(str::to_owned);

            let body = response.text().await.map_err(AttemptError::Body)?;

            if is_json_content_type(content_type.as_deref()) {
                serde_json::from_str(&body)
                    .map(ApiResponse::Json)
                    .map_err(AttemptError::Decode)
            } else {
                Ok(ApiResponse::Text(body))
            }
        };

        tokio::time::timeout(options.timeout, request)
            .await
            .map_err(|_| AttemptError::Timeout(options.timeout))?
    }
}

/// Builds the request URL: the endpoint with the default parameters, overlaid
/// by `params`, appended to its query string.
pub fn build_url(endpoint: &str, params: &Params) -> Result<Url> {
    let mut url =
        Url::parse(endpoint).with_context(|| format!("Invalid API endpoint: {}", endpoint))?;

    url.query_pairs_mut()
        .extend_pairs(params.merged_with_defaults().to_query());

    Ok(url)
}

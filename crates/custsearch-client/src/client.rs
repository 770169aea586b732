//! Search client: request shaping, per-attempt timeout, and bounded retry
//! on top of a [`SearchTransport`].

use crate::error::TransportError;
use crate::transport::SearchTransport;
use custsearch_core::config::{ClientConfig, SearchConfig};
use custsearch_core::{SearchPage, SearchRequest};
use std::time::Duration;

/// Timeout and retry knobs for one logical search.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Ceiling on a single attempt.
    pub timeout: Duration,
    /// Extra attempts after the first; transient failures only.
    pub retries: u32,
    /// Pause between attempts.
    pub delay: Duration,
}

impl RetryPolicy {
    pub fn from_config(cfg: &ClientConfig) -> Self {
        Self {
            timeout: cfg.timeout(),
            retries: cfg.retry_count,
            delay: cfg.retry_delay(),
        }
    }

    pub fn max_attempts(&self) -> u32 {
        self.retries.saturating_add(1)
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::from_config(&ClientConfig::default())
    }
}

pub struct SearchClient<T> {
    transport: T,
    policy: RetryPolicy,
    min_characters: usize,
}

impl<T: SearchTransport> SearchClient<T> {
    pub fn new(transport: T, policy: RetryPolicy) -> Self {
        Self {
            transport,
            policy,
            min_characters: SearchConfig::default().min_characters,
        }
    }

    /// Minimum trimmed query length below which no request is sent.
    pub fn with_min_characters(mut self, min_characters: usize) -> Self {
        self.min_characters = min_characters.max(1);
        self
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub fn policy(&self) -> &RetryPolicy {
        &self.policy
    }

    /// Run one logical search.
    ///
    /// The query is trimmed; a short one resolves to an empty page without
    /// touching the transport. Otherwise up to `retries + 1` attempts are
    /// made, each bounded by `timeout`. Only transient failures are retried,
    /// and the last error is returned once attempts run out.
    pub async fn call(
        &self,
        query: &str,
        limit: Option<usize>,
    ) -> Result<SearchPage, TransportError> {
        let query = query.trim();
        if query.chars().count() < self.min_characters {
            return Ok(SearchPage::empty());
        }

        let mut request = SearchRequest::new(query);
        request.limit = limit;

        let mut attempt = 0u32;
        loop {
            attempt += 1;
            let outcome =
                match tokio::time::timeout(self.policy.timeout, self.transport.search(&request)).await {
                    Ok(result) => result,
                    Err(_) => Err(TransportError::Timeout(self.policy.timeout)),
                };

            match outcome {
                Ok(page) => {
                    tracing::debug!(query, attempt, total = page.total_count, "search ok");
                    return Ok(page);
                }
                Err(err) if err.is_transient() && attempt < self.policy.max_attempts() => {
                    tracing::warn!(query, attempt, error = %err, "search attempt failed; retrying");
                    tokio::time::sleep(self.policy.delay).await;
                }
                Err(err) => {
                    tracing::warn!(query, attempt, error = %err, "search failed");
                    return Err(err);
                }
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

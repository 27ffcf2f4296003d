//! Retry with exponential backoff and a per-attempt timeout
//!
//! Calls to the knowledge retriever and the text generation service go
//! through [`run`]. Only failures the error type classifies as transient are
//! repeated. Calls that must not be duplicated, such as sending an SMS, use
//! [`run_at_most_once`], where a timed-out attempt is final.

use crate::notification::NotifyError;
use nexora_llm::LLMError;
use nexora_retrieval::RetrievalError;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fmt::Display;
use std::future::Future;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, warn};

/// Retry behavior for calls to external services
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RetryPolicy {
    /// Total attempts including the first (at least 1)
    pub max_attempts: u32,

    /// Base delay, multiplied by 2^attempt
    pub base_delay_ms: u64,

    /// Upper bound on the backoff delay before jitter
    pub max_delay_ms: u64,

    /// Time limit for a single attempt
    pub timeout_ms: u64,

    /// Add 0-50% random jitter to each delay
    pub jitter: bool,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            base_delay_ms: 250,
            max_delay_ms: 4000,
            timeout_ms: 30_000,
            jitter: true,
        }
    }
}

impl RetryPolicy {
    /// A single attempt, no backoff
    pub fn no_retry() -> Self {
        Self {
            max_attempts: 1,
            ..Self::default()
        }
    }

    pub fn with_max_attempts(mut self, max_attempts: u32) -> Self {
        self.max_attempts = max_attempts;
        self
    }

    pub fn with_timeout_ms(mut self, timeout_ms: u64) -> Self {
        self.timeout_ms = timeout_ms;
        self
    }

    pub fn with_jitter(mut self, jitter: bool) -> Self {
        self.jitter = jitter;
        self
    }
}

/// Classifies errors as transient or permanent
pub trait Retryable {
    fn is_retryable(&self) -> bool;
}

impl Retryable for LLMError {
    fn is_retryable(&self) -> bool {
        LLMError::is_retryable(self)
    }
}

impl Retryable for RetrievalError {
    fn is_retryable(&self) -> bool {
        RetrievalError::is_retryable(self)
    }
}

impl Retryable for NotifyError {
    fn is_retryable(&self) -> bool {
        NotifyError::is_retryable(self)
    }
}

/// Outcome of an operation that did not succeed
#[derive(Debug, Error)]
pub enum RetryError<E>
where
    E: std::error::Error + 'static,
{
    /// The final attempt ran past the per-attempt timeout
    #[error("{operation} timed out after {attempts} attempt(s)")]
    Timeout { operation: String, attempts: u32 },

    /// Every attempt failed with a transient error
    #[error("{operation} failed after {attempts} attempt(s): {last}")]
    Exhausted {
        operation: String,
        attempts: u32,
        #[source]
        last: E,
    },

    /// A permanent error; not retried
    #[error("{operation} failed: {source}")]
    Permanent {
        operation: String,
        #[source]
        source: E,
    },
}

impl<E> RetryError<E>
where
    E: std::error::Error + 'static,
{
    /// The underlying error, if the failure was not a timeout
    pub fn inner(&self) -> Option<&E> {
        match self {
            RetryError::Timeout { .. } => None,
            RetryError::Exhausted { last, .. } => Some(last),
            RetryError::Permanent { source, .. } => Some(source),
        }
    }
}

/// Delay before retry number `attempt + 1`
pub fn calculate_delay(attempt: u32, policy: &RetryPolicy) -> Duration {
    let multiplier = 2u64.saturating_pow(attempt.min(63));
    let capped = policy
        .base_delay_ms
        .saturating_mul(multiplier)
        .min(policy.max_delay_ms);

    let delay = if policy.jitter && capped > 0 {
        let factor: f64 = 1.0 + rand::thread_rng().gen_range(0.0..=0.5);
        (capped as f64 * factor) as u64
    } else {
        capped
    };

    Duration::from_millis(delay)
}

/// Run `operation` under `policy`
///
/// A timed-out attempt counts as transient and is retried.
pub async fn run<T, E, F, Fut>(
    policy: &RetryPolicy,
    operation: &str,
    f: F,
) -> std::result::Result<T, RetryError<E>>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = std::result::Result<T, E>>,
    E: Retryable + Display + std::error::Error + 'static,
{
    run_attempts(policy, operation, true, f).await
}

/// Run a non-idempotent `operation` under `policy`
///
/// The attempt may have taken effect when it times out, so a timeout ends
/// the run. The error type must only classify as transient those failures
/// that prove the operation did not happen.
pub async fn run_at_most_once<T, E, F, Fut>(
    policy: &RetryPolicy,
    operation: &str,
    f: F,
) -> std::result::Result<T, RetryError<E>>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = std::result::Result<T, E>>,
    E: Retryable + Display + std::error::Error + 'static,
{
    run_attempts(policy, operation, false, f).await
}

async fn run_attempts<T, E, F, Fut>(
    policy: &RetryPolicy,
    operation: &str,
    retry_timeouts: bool,
    mut f: F,
) -> std::result::Result<T, RetryError<E>>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = std::result::Result<T, E>>,
    E: Retryable + Display + std::error::Error + 'static,
{
    let max_attempts = policy.max_attempts.max(1);
    let timeout = Duration::from_millis(policy.timeout_ms);
    let mut last_error: Option<E> = None;

    for attempt in 0..max_attempts {
        if attempt > 0 {
            let delay = calculate_delay(attempt - 1, policy);
            debug!(operation, attempt = attempt + 1, ?delay, "retrying");
            tokio::time::sleep(delay).await;
        }

        match tokio::time::timeout(timeout, f()).await {
            Ok(Ok(value)) => return Ok(value),
            Ok(Err(e)) if e.is_retryable() => {
                warn!(operation, attempt = attempt + 1, error = %e, "transient failure");
                last_error = Some(e);
            }
            Ok(Err(e)) => {
                warn!(operation, error = %e, "permanent failure");
                return Err(RetryError::Permanent {
                    operation: operation.to_string(),
                    source: e,
                });
            }
            Err(_) => {
                warn!(operation, attempt = attempt + 1, timeout_ms = policy.timeout_ms, "attempt timed out");
                if !retry_timeouts {
                    return Err(RetryError::Timeout {
                        operation: operation.to_string(),
                        attempts: attempt + 1,
                    });
                }
                last_error = None;
            }
        }
    }

    Err(match last_error {
        Some(last) => RetryError::Exhausted {
            operation: operation.to_string(),
            attempts: max_attempts,
            last,
        },
        None => RetryError::Timeout {
            operation: operation.to_string(),
            attempts: max_attempts,
        },
    })
}

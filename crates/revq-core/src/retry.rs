// SPDX-License-Identifier: Apache-2.0

//! Retry logic with exponential backoff for transient failures.
//!
//! Only network-level failures and 5xx server errors are considered
//! retryable. Application-level 4xx responses (including 403 secondary
//! rate limits and 429) are surfaced to the caller immediately so that
//! rate-limit handling stays explicit instead of being hidden behind
//! blind retries.

use backon::ExponentialBuilder;

/// Determines if an HTTP status code is retryable.
///
/// Retryable status codes are the transient server errors:
/// - 500 (Internal Server Error)
/// - 502 (Bad Gateway)
/// - 503 (Service Unavailable)
/// - 504 (Gateway Timeout)
///
/// 4xx application errors are never retried.
///
/// # Arguments
///
/// * `status` - HTTP status code as u16
///
/// # Returns
///
/// `true` if the status code indicates a transient error that should be retried
#[must_use]
pub fn is_retryable_http(status: u16) -> bool {
    matches!(status, 500 | 502 | 503 | 504)
}

/// Determines if an octocrab error is retryable.
///
/// Retryable octocrab errors include:
/// - GitHub API errors with a 5xx status code
/// - Service errors (transient)
/// - Hyper errors (network-related)
///
/// # Arguments
///
/// * `e` - Reference to an octocrab error
///
/// # Returns
///
/// `true` if the error is transient and should be retried
#[must_use]
pub fn is_retryable_octocrab(e: &octocrab::Error) -> bool {
    match e {
        octocrab::Error::GitHub { source, .. } => is_retryable_http(source.status_code.as_u16()),
        octocrab::Error::Service { .. } | octocrab::Error::Hyper { .. } => true,
        _ => false,
    }
}

/// Creates a configured exponential backoff builder for retries.
///
/// Configuration:
/// - Factor: 2 (exponential growth)
/// - Min delay: 1 second
/// - Max delay: 10 seconds
/// - Max times: 3 (total of 3 attempts)
/// - Jitter: enabled
///
/// # Returns
///
/// An `ExponentialBuilder` configured for retry operations
#[must_use]
pub fn retry_backoff() -> ExponentialBuilder {
    ExponentialBuilder::default()
        .with_factor(2.0)
        .with_min_delay(std::time::Duration::from_secs(1))
        .with_max_delay(std::time::Duration::from_secs(10))
        .with_max_times(3)
        .with_jitter()
}

// SPDX-License-Identifier: Apache-2.0

//! Error types for revq.
//!
//! Uses `thiserror` for deriving `std::error::Error` implementations.
//! Application code in the binaries should use `anyhow::Result` for
//! top-level error handling.

use thiserror::Error;

/// Errors that can occur during revq operations.
#[derive(Error, Debug)]
pub enum RevqError {
    /// Generic GitHub API error carrying the upstream message verbatim.
    #[error("GitHub API error: {message}")]
    GitHub {
        /// Error message from the GitHub API.
        message: String,
    },

    /// The GitHub token was rejected (HTTP 401).
    #[error("Invalid GitHub credentials")]
    InvalidCredentials,

    /// The requested resource does not exist (HTTP 404).
    #[error("Resource not found: {resource}")]
    NotFound {
        /// Description of the missing resource (e.g. "PR #42 in owner/repo").
        resource: String,
    },

    /// GitHub rate limit exceeded (HTTP 403 secondary limit or 429).
    #[error("GitHub rate limit exceeded, retry after {retry_after}s")]
    RateLimited {
        /// Number of seconds to wait before retrying.
        retry_after: u64,
    },

    /// Network-level failure after exhausting retries.
    #[error("GitHub connection failed: {message}")]
    Connection {
        /// Description of the underlying transport failure.
        message: String,
    },

    /// Configuration error (malformed bot pattern, policy file, or config file).
    #[error("Configuration error: {message}")]
    Config {
        /// Error message.
        message: String,
    },

    /// No GitHub token is available - set `GITHUB_TOKEN` or `GH_TOKEN`.
    #[error("Authentication required - set the GITHUB_TOKEN environment variable")]
    NotAuthenticated,

    /// Malformed input payload (event or comment data).
    #[error("Invalid input: {message}")]
    Validation {
        /// Error message describing the malformed field.
        message: String,
    },

    /// Local thread-mapping store could not be read or written.
    #[error("Storage error: {message}")]
    Storage {
        /// Error message.
        message: String,
    },
}

/// Default retry-after hint when GitHub does not report one.
const DEFAULT_RETRY_AFTER_SECS: u64 = 60;

impl From<octocrab::Error> for RevqError {
    fn from(err: octocrab::Error) -> Self {
        match &err {
            octocrab::Error::GitHub { source, .. } => match source.status_code.as_u16() {
                401 => RevqError::InvalidCredentials,
                404 => RevqError::NotFound {
                    resource: source.message.clone(),
                },
                403 | 429 => RevqError::RateLimited {
                    retry_after: DEFAULT_RETRY_AFTER_SECS,
                },
                _ => RevqError::GitHub {
                    message: source.message.clone(),
                },
            },
            octocrab::Error::Service { .. } | octocrab::Error::Hyper { .. } => {
                RevqError::Connection {
                    message: err.to_string(),
                }
            }
            _ => RevqError::GitHub {
                message: err.to_string(),
            },
        }
    }
}

impl From<config::ConfigError> for RevqError {
    fn from(err: config::ConfigError) -> Self {
        RevqError::Config {
            message: err.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_error_converts() {
        let err = config::ConfigError::Message("bad value".to_string());
        let revq: RevqError = err.into();
        assert!(matches!(revq, RevqError::Config { .. }));
        assert!(revq.to_string().contains("bad value"));
    }

    #[test]
    fn test_rate_limited_display() {
        let err = RevqError::RateLimited { retry_after: 30 };
        assert_eq!(err.to_string(), "GitHub rate limit exceeded, retry after 30s");
    }

    #[test]
    fn test_not_found_display() {
        let err = RevqError::NotFound {
            resource: "PR #42 in octocat/hello".to_string(),
        };
        assert!(err.to_string().contains("PR #42 in octocat/hello"));
    }

    #[test]
    fn test_not_authenticated_mentions_env_var() {
        let err = RevqError::NotAuthenticated;
        assert!(err.to_string().contains("GITHUB_TOKEN"));
    }
}

// SPDX-License-Identifier: Apache-2.0

//! CLI-specific error formatting with user-friendly hints.
//!
//! Downcasts `anyhow::Error` to `RevqError` and adds hints for the error
//! types a CLI user can act on. This keeps structured error data in the
//! library and presentation concerns here.

use anyhow::Error;
use revq_core::RevqError;

/// Formats an error for CLI display with helpful hints.
///
/// If the error is not a `RevqError`, returns the original error message.
#[must_use]
pub fn format_error(error: &Error) -> String {
    if let Some(revq_err) = error.downcast_ref::<RevqError>() {
        match revq_err {
            RevqError::NotAuthenticated => {
                format!("{revq_err}\n\nTip: export GITHUB_TOKEN=<token> or GH_TOKEN=<token>.")
            }
            RevqError::InvalidCredentials => {
                format!("{revq_err}\n\nTip: Your token was rejected. Check that it has not expired and carries the `repo` scope.")
            }
            RevqError::RateLimited { retry_after } => {
                format!(
                    "{revq_err}\n\nTip: Wait at least {retry_after} seconds before retrying."
                )
            }
            RevqError::Connection { .. } => {
                format!("{revq_err}\n\nTip: Check your internet connection and try again.")
            }
            RevqError::Config { .. } => {
                format!(
                    "{revq_err}\n\nTip: Check your config file at {}",
                    revq_core::config_file_path().display()
                )
            }
            RevqError::NotFound { .. }
            | RevqError::GitHub { .. }
            | RevqError::Validation { .. }
            | RevqError::Storage { .. } => revq_err.to_string(),
        }
    } else {
        // Not a RevqError, return the original error chain
        error.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_not_authenticated_mentions_env_vars() {
        let err = anyhow::Error::new(RevqError::NotAuthenticated);
        let formatted = format_error(&err);

        assert!(formatted.contains("GITHUB_TOKEN"));
        assert!(formatted.contains("GH_TOKEN"));
    }

    #[test]
    fn test_format_rate_limited_includes_retry_after() {
        let err = anyhow::Error::new(RevqError::RateLimited { retry_after: 30 });
        let formatted = format_error(&err);

        assert!(formatted.contains("30 seconds"));
    }

    #[test]
    fn test_format_config_error_points_at_config_file() {
        let err = anyhow::Error::new(RevqError::Config {
            message: "bad pattern".to_string(),
        });
        let formatted = format_error(&err);

        assert!(formatted.contains("bad pattern"));
        assert!(formatted.contains("config.toml"));
    }

    #[test]
    fn test_format_non_revq_error_passthrough() {
        let err = anyhow::anyhow!("Some generic error");
        assert_eq!(format_error(&err), "Some generic error");
    }
}

// SPDX-License-Identifier: Apache-2.0

//! CLI-specific `TokenProvider` implementation.
//!
//! Resolves the GitHub token from the `GH_TOKEN` or `GITHUB_TOKEN`
//! environment variables, in that order.

use revq_core::auth::TokenProvider;
use secrecy::SecretString;
use tracing::debug;

/// CLI implementation of `TokenProvider`.
pub struct CliTokenProvider;

impl TokenProvider for CliTokenProvider {
    fn github_token(&self) -> Option<SecretString> {
        for var in ["GH_TOKEN", "GITHUB_TOKEN"] {
            if let Ok(token) = std::env::var(var)
                && !token.is_empty()
            {
                debug!(source = var, "Resolved GitHub token from environment");
                return Some(SecretString::from(token));
            }
        }
        debug!("No GitHub token found in environment");
        None
    }
}

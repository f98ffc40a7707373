// SPDX-License-Identifier: Apache-2.0

//! Token provider for the MCP server using environment variables.

use revq_core::auth::TokenProvider;
use secrecy::SecretString;

/// Resolves the GitHub credential from environment variables.
///
/// Reads `GITHUB_TOKEN` (preferred) or `GH_TOKEN`.
pub struct EnvTokenProvider;

impl TokenProvider for EnvTokenProvider {
    fn github_token(&self) -> Option<SecretString> {
        for var in ["GITHUB_TOKEN", "GH_TOKEN"] {
            if let Ok(token) = std::env::var(var)
                && !token.is_empty()
            {
                return Some(SecretString::from(token));
            }
        }
        None
    }
}

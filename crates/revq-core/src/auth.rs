// SPDX-License-Identifier: Apache-2.0

//! Token provider abstraction for credential resolution.
//!
//! This module defines the `TokenProvider` trait, which abstracts GitHub
//! credential resolution across the CLI and MCP surfaces. Each binary
//! implements this trait to provide the token from its own credential
//! source (environment variables, CI secrets, ...).

use secrecy::SecretString;

/// Provides the GitHub credential for API calls.
///
/// Implementations should handle credential lookup and return `None` if
/// no credential is available.
pub trait TokenProvider: Send + Sync {
    /// Retrieves the GitHub API token.
    ///
    /// Returns `None` if no token is available from any source.
    fn github_token(&self) -> Option<SecretString>;
}

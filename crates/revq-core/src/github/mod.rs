// SPDX-License-Identifier: Apache-2.0

//! GitHub integration module.
//!
//! Provides client construction, reference parsing, and the REST/GraphQL
//! fetch functions the core consumes.

use std::time::Duration;

use octocrab::Octocrab;
use secrecy::ExposeSecret;
use tracing::debug;

use crate::auth::TokenProvider;
use crate::config::GitHubConfig;
use crate::error::RevqError;
use crate::events::PullRequestRef;

pub mod graphql;
pub mod pulls;
pub mod ratelimit;

/// Builds an authenticated Octocrab client from a token provider.
///
/// The connect timeout follows `api_timeout_seconds`; the read timeout
/// follows `graphql_timeout_seconds` so long-running GraphQL queries fit
/// within the same client.
///
/// # Errors
///
/// Returns `RevqError::NotAuthenticated` if the provider has no token, or
/// `RevqError::GitHub` if the client cannot be constructed.
pub fn build_client(
    provider: &dyn TokenProvider,
    github: &GitHubConfig,
) -> Result<Octocrab, RevqError> {
    let token = provider.github_token().ok_or(RevqError::NotAuthenticated)?;

    Octocrab::builder()
        .personal_token(token.expose_secret().to_string())
        .set_connect_timeout(Some(Duration::from_secs(github.api_timeout_seconds)))
        .set_read_timeout(Some(Duration::from_secs(github.graphql_timeout_seconds)))
        .build()
        .map_err(RevqError::from)
}

/// Parses an owner/repo string to extract owner and repo.
///
/// Validates format: exactly one `/`, non-empty parts.
///
/// # Errors
///
/// Returns `RevqError::Validation` if the format is invalid.
pub fn parse_owner_repo(s: &str) -> Result<(String, String), RevqError> {
    let parts: Vec<&str> = s.split('/').collect();
    if parts.len() != 2 || parts[0].is_empty() || parts[1].is_empty() {
        return Err(RevqError::Validation {
            message: format!("Invalid owner/repo format. Expected: owner/repo, got: {s}"),
        });
    }
    Ok((parts[0].to_string(), parts[1].to_string()))
}

/// Parses a PR reference in multiple formats.
///
/// Supports:
/// - Full URL: `https://github.com/owner/repo/pull/123`
/// - Short form: `owner/repo#123`
/// - Bare number: `123` (requires `repo_context`)
///
/// # Arguments
///
/// * `input` - The reference to parse
/// * `repo_context` - Optional repository context for bare numbers (e.g., "owner/repo")
///
/// # Errors
///
/// Returns `RevqError::Validation` if the format is invalid or a bare
/// number is used without context.
pub fn parse_pr_reference(
    input: &str,
    repo_context: Option<&str>,
) -> Result<PullRequestRef, RevqError> {
    let input = input.trim();

    // Try full GitHub URL first
    if input.starts_with("https://github.com/") || input.starts_with("http://github.com/") {
        let path = input
            .trim_start_matches("https://github.com/")
            .trim_start_matches("http://github.com/");
        // Drop trailing fragments and query params
        let path = path.split(['#', '?']).next().unwrap_or(path);

        let parts: Vec<&str> = path.trim_end_matches('/').split('/').collect();
        if parts.len() >= 4 && parts[2] == "pull" {
            let number: u64 = parts[3].parse().map_err(|_| RevqError::Validation {
                message: format!("Invalid PR number in URL: {}", parts[3]),
            })?;
            let reference = PullRequestRef {
                owner: parts[0].to_string(),
                repo: parts[1].to_string(),
                number,
            };
            debug!(%reference, "Parsed PR URL");
            return Ok(reference);
        }
        return Err(RevqError::Validation {
            message: format!("Invalid GitHub PR URL format: {input}"),
        });
    }

    // Try short form: owner/repo#123
    if let Some((repo_part, num_part)) = input.split_once('#') {
        let number: u64 = num_part.parse().map_err(|_| RevqError::Validation {
            message: format!("Invalid PR number: {num_part}"),
        })?;
        let context = if repo_part.is_empty() {
            repo_context.ok_or_else(|| RevqError::Validation {
                message: format!("PR reference '{input}' requires repository context"),
            })?
        } else {
            repo_part
        };
        let (owner, repo) = parse_owner_repo(context)?;
        let reference = PullRequestRef { owner, repo, number };
        debug!(%reference, "Parsed short-form PR reference");
        return Ok(reference);
    }

    // Try bare number with repo_context
    if let Ok(number) = input.parse::<u64>() {
        let context = repo_context.ok_or_else(|| RevqError::Validation {
            message: format!(
                "Bare PR number requires --repo flag or repository context: {input}"
            ),
        })?;
        let (owner, repo) = parse_owner_repo(context)?;
        return Ok(PullRequestRef { owner, repo, number });
    }

    Err(RevqError::Validation {
        message: format!(
            "Invalid PR reference format: {input}. Expected URL, owner/repo#number, or number with --repo"
        ),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_owner_repo_valid() {
        let (owner, repo) = parse_owner_repo("octocat/Hello-World").unwrap();
        assert_eq!(owner, "octocat");
        assert_eq!(repo, "Hello-World");
    }

    #[test]
    fn test_parse_owner_repo_invalid_no_slash() {
        assert!(parse_owner_repo("octocat").is_err());
    }

    #[test]
    fn test_parse_owner_repo_invalid_empty_owner() {
        assert!(parse_owner_repo("/repo").is_err());
    }

    #[test]
    fn test_parse_owner_repo_invalid_empty_repo() {
        assert!(parse_owner_repo("owner/").is_err());
    }

    #[test]
    fn test_parse_pr_reference_full_url() {
        let reference =
            parse_pr_reference("https://github.com/octocat/Hello-World/pull/123", None).unwrap();
        assert_eq!(reference.owner, "octocat");
        assert_eq!(reference.repo, "Hello-World");
        assert_eq!(reference.number, 123);
    }

    #[test]
    fn test_parse_pr_reference_url_with_fragment() {
        let reference = parse_pr_reference(
            "https://github.com/octocat/Hello-World/pull/123#discussion_r456",
            None,
        )
        .unwrap();
        assert_eq!(reference.number, 123);
    }

    #[test]
    fn test_parse_pr_reference_short_form() {
        let reference = parse_pr_reference("octocat/Hello-World#456", None).unwrap();
        assert_eq!(reference.owner, "octocat");
        assert_eq!(reference.number, 456);
    }

    #[test]
    fn test_parse_pr_reference_bare_number_with_context() {
        let reference = parse_pr_reference("789", Some("octocat/Hello-World")).unwrap();
        assert_eq!(reference.owner, "octocat");
        assert_eq!(reference.number, 789);
    }

    #[test]
    fn test_parse_pr_reference_bare_number_without_context() {
        let result = parse_pr_reference("123", None);
        assert!(matches!(result, Err(RevqError::Validation { .. })));
    }

    #[test]
    fn test_parse_pr_reference_hash_with_context() {
        let reference = parse_pr_reference("#42", Some("owner/repo")).unwrap();
        assert_eq!(reference.owner, "owner");
        assert_eq!(reference.number, 42);
    }

    #[test]
    fn test_parse_pr_reference_issue_url_rejected() {
        let result =
            parse_pr_reference("https://github.com/octocat/Hello-World/issues/123", None);
        assert!(result.is_err());
    }

    #[test]
    fn test_parse_pr_reference_invalid_number() {
        assert!(parse_pr_reference("octocat/Hello-World#abc", None).is_err());
    }
}

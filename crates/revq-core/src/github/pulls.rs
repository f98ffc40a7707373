// SPDX-License-Identifier: Apache-2.0

//! Pull request data fetching via Octocrab.
//!
//! REST fetches for PR metadata, submitted reviews, and inline review
//! comments. Network calls retry transient failures only; 4xx responses
//! surface immediately as typed errors.

use backon::Retryable;
use chrono::{DateTime, Utc};
use octocrab::Octocrab;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use crate::comments::RawComment;
use crate::error::RevqError;
use crate::events::PullRequestRef;
use crate::retry::{is_retryable_octocrab, retry_backoff};

/// Pull request metadata used by the review orchestration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PrInfo {
    /// Pull request number.
    pub number: u64,
    /// Pull request title.
    pub title: String,
    /// Pull request state ("open", "closed").
    pub state: String,
    /// Login of the PR author.
    pub author_login: String,
    /// Head commit SHA.
    pub head_sha: String,
}

/// A submitted review on a pull request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReviewSummary {
    /// Review identifier.
    pub id: u64,
    /// Review state as reported by the API
    /// (`APPROVED`, `CHANGES_REQUESTED`, `COMMENTED`, ...).
    pub state: String,
    /// Login of the reviewer.
    pub author_login: String,
    /// Review body.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub body: Option<String>,
    /// When the review was submitted.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub submitted_at: Option<DateTime<Utc>>,
}

/// Author object in REST responses.
#[derive(Debug, Clone, Deserialize)]
struct RestUser {
    login: String,
}

/// Inline review comment in the REST response shape.
#[derive(Debug, Clone, Deserialize)]
struct RestReviewComment {
    id: u64,
    user: RestUser,
    body: String,
    created_at: DateTime<Utc>,
    #[serde(default)]
    path: Option<String>,
    #[serde(default)]
    line: Option<u64>,
    #[serde(default)]
    original_line: Option<u64>,
    #[serde(default)]
    diff_hunk: Option<String>,
    #[serde(default)]
    in_reply_to_id: Option<u64>,
    #[serde(default)]
    commit_id: Option<String>,
}

impl From<RestReviewComment> for RawComment {
    fn from(comment: RestReviewComment) -> Self {
        RawComment {
            id: comment.id,
            author_login: comment.user.login,
            body: comment.body,
            created_at: comment.created_at,
            path: comment.path,
            line: comment.line,
            original_line: comment.original_line,
            diff_hunk: comment.diff_hunk,
            in_reply_to_id: comment.in_reply_to_id,
            commit_id: comment.commit_id,
        }
    }
}

/// Submitted review in the REST response shape.
#[derive(Debug, Clone, Deserialize)]
struct RestReview {
    id: u64,
    #[serde(default)]
    state: Option<String>,
    #[serde(default)]
    user: Option<RestUser>,
    #[serde(default)]
    body: Option<String>,
    #[serde(default)]
    submitted_at: Option<DateTime<Utc>>,
}

impl From<RestReview> for ReviewSummary {
    fn from(review: RestReview) -> Self {
        ReviewSummary {
            id: review.id,
            state: review.state.unwrap_or_default(),
            author_login: review.user.map(|u| u.login).unwrap_or_default(),
            body: review.body.filter(|b| !b.is_empty()),
            submitted_at: review.submitted_at,
        }
    }
}

/// Fetches pull request metadata.
///
/// # Errors
///
/// Returns a typed error if the API call fails or the PR is not found.
#[instrument(skip(client), fields(pr = %pr))]
pub async fn fetch_pr_info(client: &Octocrab, pr: &PullRequestRef) -> Result<PrInfo, RevqError> {
    debug!("Fetching PR info");

    let pull = (|| async { client.pulls(&pr.owner, &pr.repo).get(pr.number).await })
        .retry(retry_backoff())
        .when(is_retryable_octocrab)
        .await?;

    Ok(PrInfo {
        number: pull.number,
        title: pull.title.unwrap_or_default(),
        state: pull
            .state
            .map(|s| format!("{s:?}").to_lowercase())
            .unwrap_or_default(),
        author_login: pull.user.map(|u| u.login).unwrap_or_default(),
        head_sha: pull.head.sha,
    })
}

/// Fetches submitted reviews for a pull request.
///
/// # Errors
///
/// Returns a typed error if the API call fails.
#[instrument(skip(client), fields(pr = %pr))]
pub async fn fetch_reviews(
    client: &Octocrab,
    pr: &PullRequestRef,
) -> Result<Vec<ReviewSummary>, RevqError> {
    let route = format!(
        "/repos/{}/{}/pulls/{}/reviews?per_page=100",
        pr.owner, pr.repo, pr.number
    );

    let reviews: Vec<RestReview> = (|| async { client.get(&route, None::<&()>).await })
        .retry(retry_backoff())
        .when(is_retryable_octocrab)
        .await?;

    debug!(count = reviews.len(), "Fetched reviews");
    Ok(reviews.into_iter().map(ReviewSummary::from).collect())
}

/// Fetches inline review comments for a pull request.
///
/// # Errors
///
/// Returns a typed error if the API call fails.
#[instrument(skip(client), fields(pr = %pr))]
pub async fn fetch_inline_comments(
    client: &Octocrab,
    pr: &PullRequestRef,
) -> Result<Vec<RawComment>, RevqError> {
    let route = format!(
        "/repos/{}/{}/pulls/{}/comments?per_page=100",
        pr.owner, pr.repo, pr.number
    );

    let comments: Vec<RestReviewComment> = (|| async { client.get(&route, None::<&()>).await })
        .retry(retry_backoff())
        .when(is_retryable_octocrab)
        .await?;

    debug!(count = comments.len(), "Fetched inline comments");
    Ok(comments.into_iter().map(RawComment::from).collect())
}

/// Resolves the authenticated actor's login.
///
/// # Errors
///
/// Returns a typed error if the API call fails.
#[instrument(skip(client))]
pub async fn fetch_authenticated_login(client: &Octocrab) -> Result<String, RevqError> {
    let user = (|| async { client.current().user().await })
        .retry(retry_backoff())
        .when(is_retryable_octocrab)
        .await?;

    debug!(login = %user.login, "Resolved authenticated login");
    Ok(user.login)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rest_comment_maps_to_raw_comment() {
        let json = serde_json::json!({
            "id": 101,
            "user": { "login": "alice" },
            "body": "nit: rename",
            "created_at": "2024-01-01T00:00:00Z",
            "path": "src/lib.rs",
            "line": 5,
            "diff_hunk": "@@ -1 +1 @@",
            "commit_id": "abc123"
        });

        let rest: RestReviewComment = serde_json::from_value(json).unwrap();
        let comment = RawComment::from(rest);

        assert_eq!(comment.id, 101);
        assert_eq!(comment.author_login, "alice");
        assert_eq!(comment.path.as_deref(), Some("src/lib.rs"));
        assert_eq!(comment.line, Some(5));
        assert_eq!(comment.in_reply_to_id, None);
    }

    #[test]
    fn test_rest_comment_reply_fields() {
        let json = serde_json::json!({
            "id": 102,
            "user": { "login": "bob" },
            "body": "agreed",
            "created_at": "2024-01-02T00:00:00Z",
            "in_reply_to_id": 101
        });

        let rest: RestReviewComment = serde_json::from_value(json).unwrap();
        let comment = RawComment::from(rest);

        assert_eq!(comment.in_reply_to_id, Some(101));
        assert!(comment.path.is_none());
    }

    #[test]
    fn test_rest_review_maps_to_summary() {
        let json = serde_json::json!({
            "id": 900,
            "state": "CHANGES_REQUESTED",
            "user": { "login": "carol" },
            "body": "",
            "submitted_at": "2024-01-03T00:00:00Z"
        });

        let rest: RestReview = serde_json::from_value(json).unwrap();
        let review = ReviewSummary::from(rest);

        assert_eq!(review.id, 900);
        assert_eq!(review.state, "CHANGES_REQUESTED");
        assert_eq!(review.author_login, "carol");
        // Empty body is normalized to absent
        assert_eq!(review.body, None);
        assert!(review.submitted_at.is_some());
    }

    #[test]
    fn test_rest_review_tolerates_missing_user() {
        let json = serde_json::json!({ "id": 901 });

        let rest: RestReview = serde_json::from_value(json).unwrap();
        let review = ReviewSummary::from(rest);

        assert_eq!(review.author_login, "");
        assert_eq!(review.state, "");
    }
}

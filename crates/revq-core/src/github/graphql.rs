// SPDX-License-Identifier: Apache-2.0

//! GraphQL queries for GitHub API - pending review handling.
//!
//! Pending (started but unsubmitted) reviews are only reachable through
//! the GraphQL API. The query fetches pending reviews with their inline
//! comments; the mutation submits a pending review.

use backon::Retryable;
use octocrab::Octocrab;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use tracing::{debug, instrument};

use crate::error::RevqError;
use crate::events::PullRequestRef;
use crate::retry::{is_retryable_octocrab, retry_backoff};

/// A pending review with its inline comments.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PendingReview {
    /// GraphQL node id (used for submission).
    pub id: String,
    /// REST-compatible database id.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub database_id: Option<u64>,
    /// Review state (always `PENDING` here).
    pub state: String,
    /// Draft review body.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub body: Option<String>,
    /// Login of the review author.
    pub author_login: String,
    /// Inline comments attached to the pending review.
    pub comments: Vec<PendingComment>,
}

/// An inline comment attached to a pending review.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PendingComment {
    /// GraphQL node id.
    pub id: String,
    /// REST-compatible database id.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub database_id: Option<u64>,
    /// Comment body.
    pub body: String,
    /// File path the comment is anchored to.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
    /// Line number.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub line: Option<u64>,
    /// Original line number when the diff has shifted.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub original_line: Option<u64>,
    /// Diff hunk the comment is anchored to.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub diff_hunk: Option<String>,
    /// Creation timestamp (ISO 8601).
    pub created_at: String,
    /// Login of the comment author.
    pub author_login: String,
}

/// Pending reviews for one pull request.
///
/// Distinct from an absent section: a PR with this struct and
/// `count == 0` definitively has no pending reviews.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PendingReviews {
    /// The pending reviews.
    pub reviews: Vec<PendingReview>,
    /// Number of pending reviews.
    pub count: usize,
    /// Whether any pending review carries inline comments.
    pub has_comments: bool,
}

/// Event to submit a pending review with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitEvent {
    /// Approve the changes.
    Approve,
    /// Request changes.
    RequestChanges,
    /// Comment without a verdict.
    Comment,
}

impl SubmitEvent {
    /// GraphQL enum value for this event.
    #[must_use]
    pub fn as_graphql(&self) -> &'static str {
        match self {
            SubmitEvent::Approve => "APPROVE",
            SubmitEvent::RequestChanges => "REQUEST_CHANGES",
            SubmitEvent::Comment => "COMMENT",
        }
    }
}

/// Builds the pending-reviews query for one pull request.
fn build_pending_reviews_query(pr: &PullRequestRef) -> Value {
    let query = format!(
        r#"query {{
            repository(owner: "{owner}", name: "{repo}") {{
                pullRequest(number: {number}) {{
                    reviews(first: 10, states: [PENDING]) {{
                        nodes {{
                            id
                            databaseId
                            state
                            body
                            author {{ login }}
                            comments(first: 10) {{
                                nodes {{
                                    id
                                    databaseId
                                    body
                                    path
                                    line
                                    originalLine
                                    diffHunk
                                    createdAt
                                    author {{ login }}
                                }}
                            }}
                        }}
                    }}
                }}
            }}
        }}"#,
        owner = pr.owner,
        repo = pr.repo,
        number = pr.number
    );

    json!({ "query": query })
}

/// Extracts the first GraphQL error message from a response, if any.
fn graphql_error(response: &Value) -> Option<String> {
    response.get("errors").map(|errors| {
        errors
            .get(0)
            .and_then(|e| e.get("message"))
            .and_then(Value::as_str)
            .unwrap_or("Unknown GraphQL error")
            .to_string()
    })
}

/// Fetches pending reviews with inline comments for a pull request.
///
/// Returns `None` when the pending-review section is unavailable upstream
/// (repository or PR not visible to the query). That is a distinct state
/// from a present section with zero pending reviews.
///
/// # Errors
///
/// Returns a typed error if the query fails.
#[instrument(skip(client), fields(pr = %pr))]
pub async fn fetch_pending_reviews(
    client: &Octocrab,
    pr: &PullRequestRef,
) -> Result<Option<PendingReviews>, RevqError> {
    let payload = build_pending_reviews_query(pr);

    let response: Value = (|| async { client.graphql(&payload).await })
        .retry(retry_backoff())
        .when(is_retryable_octocrab)
        .await?;

    if let Some(message) = graphql_error(&response) {
        return Err(RevqError::GitHub {
            message: format!("GraphQL error: {message}"),
        });
    }

    let Some(nodes) = response
        .pointer("/data/repository/pullRequest/reviews/nodes")
        .and_then(Value::as_array)
    else {
        debug!("Pending review section unavailable");
        return Ok(None);
    };

    let reviews: Vec<PendingReview> = nodes.iter().map(parse_pending_review).collect();
    let has_comments = reviews.iter().any(|r| !r.comments.is_empty());

    debug!(count = reviews.len(), "Fetched pending reviews");
    Ok(Some(PendingReviews {
        count: reviews.len(),
        has_comments,
        reviews,
    }))
}

fn parse_pending_review(node: &Value) -> PendingReview {
    let comments = node
        .pointer("/comments/nodes")
        .and_then(Value::as_array)
        .map(|nodes| nodes.iter().map(parse_pending_comment).collect())
        .unwrap_or_default();

    PendingReview {
        id: string_at(node, "/id"),
        database_id: node.pointer("/databaseId").and_then(Value::as_u64),
        state: string_at(node, "/state"),
        body: node
            .pointer("/body")
            .and_then(Value::as_str)
            .filter(|b| !b.is_empty())
            .map(ToString::to_string),
        author_login: string_at(node, "/author/login"),
        comments,
    }
}

fn parse_pending_comment(node: &Value) -> PendingComment {
    PendingComment {
        id: string_at(node, "/id"),
        database_id: node.pointer("/databaseId").and_then(Value::as_u64),
        body: string_at(node, "/body"),
        path: node
            .pointer("/path")
            .and_then(Value::as_str)
            .map(ToString::to_string),
        line: node.pointer("/line").and_then(Value::as_u64),
        original_line: node.pointer("/originalLine").and_then(Value::as_u64),
        diff_hunk: node
            .pointer("/diffHunk")
            .and_then(Value::as_str)
            .map(ToString::to_string),
        created_at: string_at(node, "/createdAt"),
        author_login: string_at(node, "/author/login"),
    }
}

fn string_at(node: &Value, pointer: &str) -> String {
    node.pointer(pointer)
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string()
}

/// Submits a pending review via GraphQL mutation.
///
/// # Errors
///
/// Returns a typed error if the mutation fails.
#[instrument(skip(client, body), fields(review_id = %review_id, event = event.as_graphql()))]
pub async fn submit_pending_review(
    client: &Octocrab,
    review_id: &str,
    event: SubmitEvent,
    body: &str,
) -> Result<Value, RevqError> {
    let payload = json!({
        "query": r"mutation($input: SubmitPullRequestReviewInput!) {
            submitPullRequestReview(input: $input) {
                pullRequestReview { id databaseId state }
            }
        }",
        "variables": {
            "input": {
                "pullRequestReviewId": review_id,
                "event": event.as_graphql(),
                "body": body,
            }
        }
    });

    let response: Value = (|| async { client.graphql(&payload).await })
        .retry(retry_backoff())
        .when(is_retryable_octocrab)
        .await?;

    if let Some(message) = graphql_error(&response) {
        return Err(RevqError::GitHub {
            message: format!("GraphQL error: {message}"),
        });
    }

    response
        .pointer("/data/submitPullRequestReview/pullRequestReview")
        .cloned()
        .ok_or_else(|| RevqError::GitHub {
            message: "Missing review in submit response".to_string(),
        })
}

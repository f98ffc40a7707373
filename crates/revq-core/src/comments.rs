// SPDX-License-Identifier: Apache-2.0

//! GitHub comment type classification for accurate response routing.
//!
//! GitHub has several comment surfaces (issue comments, inline review
//! comments, replies, reviews) that each require a different endpoint and
//! payload shape. [`classify_comment`] inspects a raw comment's structural
//! attributes and derives the metadata needed to dispatch a reply through
//! the correct API.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

/// External representation of one inline or general PR comment.
///
/// Immutable once fetched; optional fields are absent for plain issue
/// comments and present for inline review comments.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawComment {
    /// Comment identifier.
    pub id: u64,
    /// Login of the comment author.
    pub author_login: String,
    /// Comment body.
    pub body: String,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// File path for inline comments.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
    /// Line number for inline comments.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub line: Option<u64>,
    /// Original line number when the diff has shifted.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub original_line: Option<u64>,
    /// Diff hunk the comment is anchored to.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub diff_hunk: Option<String>,
    /// Identifier of the comment this one replies to.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub in_reply_to_id: Option<u64>,
    /// Commit the comment was made against.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub commit_id: Option<String>,
}

/// GitHub comment types with specific API requirements.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CommentType {
    /// General PR discussion comment.
    #[serde(rename = "issue_comment")]
    IssueComment,
    /// Inline code comment.
    #[serde(rename = "review_comment")]
    ReviewComment,
    /// Reply to an inline comment.
    #[serde(rename = "review_reply")]
    ReviewCommentReply,
    /// Overall PR review.
    #[serde(rename = "pr_review")]
    PullRequestReview,
    /// Inline comment on a not-yet-submitted review.
    #[serde(rename = "pending_comment")]
    PendingReviewComment,
    /// Code suggestion comment.
    #[serde(rename = "suggestion")]
    Suggestion,
}

/// Metadata required to dispatch a reply for a given comment type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CommentMetadata {
    /// Classified comment type.
    pub comment_type: CommentType,
    /// Pull request number the comment belongs to.
    pub pr_number: u64,
    /// Source comment identifier.
    pub comment_id: u64,
    /// File path, for inline comments.
    pub path: Option<String>,
    /// Line number, for inline comments.
    pub line: Option<u64>,
    /// Commit id, auto-detected downstream when absent.
    pub commit_id: Option<String>,
    /// Reply target, for reply comments.
    pub in_reply_to: Option<u64>,
    /// Whether dispatch requires a commit id.
    pub requires_commit_id: bool,
}

/// Classify a raw comment and derive the metadata needed for API dispatch.
///
/// Decision table, evaluated top to bottom:
/// - path + line (or original line) + diff hunk + reply id -> inline reply
/// - path + line (or original line) + diff hunk -> new inline comment
/// - anything else (reply or not) -> issue comment
#[must_use]
pub fn classify_comment(comment: &RawComment, pr_number: u64) -> CommentMetadata {
    let has_path = comment.path.as_deref().is_some_and(|p| !p.is_empty());
    let has_line = comment.line.or(comment.original_line).is_some();
    let has_diff_hunk = comment.diff_hunk.as_deref().is_some_and(|h| !h.is_empty());
    let is_reply = comment.in_reply_to_id.is_some();

    let comment_type = if has_path && has_line && has_diff_hunk {
        if is_reply {
            CommentType::ReviewCommentReply
        } else {
            CommentType::ReviewComment
        }
    } else {
        CommentType::IssueComment
    };

    CommentMetadata {
        comment_type,
        pr_number,
        comment_id: comment.id,
        path: comment.path.clone(),
        line: comment.line.or(comment.original_line),
        commit_id: comment.commit_id.clone(),
        in_reply_to: comment.in_reply_to_id,
        requires_commit_id: comment_type == CommentType::ReviewComment,
    }
}

impl CommentMetadata {
    /// Returns the REST endpoint path template for this comment type.
    ///
    /// Owner and repo stay as `{owner}`/`{repo}` placeholders; the PR
    /// number is rendered into the template.
    #[must_use]
    pub fn api_endpoint(&self) -> String {
        match self.comment_type {
            CommentType::ReviewComment | CommentType::ReviewCommentReply => {
                format!("/repos/{{owner}}/{{repo}}/pulls/{}/comments", self.pr_number)
            }
            _ => format!("/repos/{{owner}}/{{repo}}/issues/{}/comments", self.pr_number),
        }
    }

    /// Builds the API request payload for posting `body` as this comment type.
    #[must_use]
    pub fn request_payload(&self, body: &str) -> Value {
        let mut payload = json!({ "body": body });

        match self.comment_type {
            CommentType::ReviewComment => {
                // New inline comment - requires path, line, commit_sha
                payload["path"] = json!(self.path);
                payload["line"] = json!(self.line);
                // Auto-detected downstream if null
                payload["commit_sha"] = json!(self.commit_id);
            }
            CommentType::ReviewCommentReply => {
                payload["in_reply_to"] = json!(self.in_reply_to);
            }
            _ => {}
        }

        payload
    }

    /// Validates that this metadata carries the fields its comment type
    /// requires. Advisory: callers must check the error list before
    /// dispatch; validation itself never fails.
    #[must_use]
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();

        match self.comment_type {
            CommentType::ReviewComment => {
                if self.path.as_deref().is_none_or(str::is_empty) {
                    errors.push("path required for inline comments".to_string());
                }
                if self.line.is_none() {
                    errors.push("line required for inline comments".to_string());
                }
                // commit_id is auto-detected if missing
            }
            CommentType::ReviewCommentReply => {
                if self.in_reply_to.is_none() {
                    errors.push("in_reply_to required for comment replies".to_string());
                }
            }
            _ => {}
        }

        errors
    }
}

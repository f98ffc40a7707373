// SPDX-License-Identifier: Apache-2.0

//! Reply generation for comments and review threads.
//!
//! [`Responder`] composes reply bodies depending on the classified actor
//! type. [`reply_action`] is the smart-reply entry point: it runs the
//! comment classifier over the reply target to pick the correct comment
//! surface (inline review reply vs general issue comment) and builds the
//! matching action.

use chrono::Utc;
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::info;

use crate::classifier::ActorType;
use crate::comments::{CommentType, RawComment, classify_comment};
use crate::events::{Action, ActionType};

/// Location context of the thread being replied to.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ThreadContext {
    /// Thread identifier.
    pub id: String,
    /// File under discussion.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file: Option<String>,
    /// Line under discussion.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub line: Option<u64>,
}

/// Code context attached to a reply request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CodeContext {
    /// Path of the code under discussion.
    pub path: String,
    /// Code before the proposed change.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub before: Option<String>,
    /// Code after the proposed change.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub after: Option<String>,
}

/// Request to generate a reply for a comment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReplyRequest {
    /// Classified actor type of the comment author.
    pub actor_type: ActorType,
    /// Thread the comment belongs to.
    pub thread: ThreadContext,
    /// The comment body being replied to.
    pub comment: String,
    /// Optional code context.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code_context: Option<CodeContext>,
}

/// A generated reply plus any follow-up actions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReplyResponse {
    /// Reply body to post.
    pub body: String,
    /// Whether the thread should be resolved after replying.
    pub resolve_thread: bool,
    /// Follow-up actions to queue.
    pub followups: Vec<Action>,
}

/// Generates replies for comments and review threads.
#[derive(Debug, Default)]
pub struct Responder;

impl Responder {
    /// Generate a reply for the given request.
    #[must_use]
    pub fn generate(&self, request: &ReplyRequest) -> ReplyResponse {
        info!(
            actor_type = ?request.actor_type,
            thread_id = %request.thread.id,
            "generating reply"
        );

        match request.actor_type {
            ActorType::Bot => {
                let followups = vec![
                    Action::new(ActionType::Comment)
                        .with_value("Bot response tracked")
                        .with_metadata("thread", json!(request.thread.id)),
                ];
                ReplyResponse {
                    body: Self::bot_reply(request),
                    resolve_thread: false,
                    followups,
                }
            }
            ActorType::Human => {
                let mut followups = Vec::new();
                if let Some(context) = &request.code_context
                    && let Some(after) = &context.after
                {
                    followups.push(
                        Action::new(ActionType::Comment)
                            .with_value(format!("Proposed change:\n```diff\n{after}\n```"))
                            .with_metadata("thread", json!(request.thread.id)),
                    );
                }
                ReplyResponse {
                    body: Self::human_reply(request),
                    resolve_thread: false,
                    followups,
                }
            }
        }
    }

    fn bot_reply(request: &ReplyRequest) -> String {
        let mut base = "\u{1f916} Thanks for the automated update.".to_string();
        if request.code_context.is_some() {
            base.push_str(" We'll verify the suggested changes against policy.");
        }
        base
    }

    fn human_reply(request: &ReplyRequest) -> String {
        let mut parts = vec!["Thanks for taking the time to review this change.".to_string()];

        let summary = request.comment.trim().lines().next().unwrap_or_default();
        if !summary.is_empty() {
            parts.push(format!("You mentioned: \"{summary}\""));
        }

        if let (Some(file), Some(line)) = (&request.thread.file, request.thread.line) {
            parts.push(format!(
                "We'll revisit `{file}` line {line} and follow up shortly."
            ));
        }

        parts.join(" ")
    }
}

/// Build the reply action for a comment, routed through comment
/// classification so the reply lands on the correct API surface.
///
/// Inline targets (path + line + diff hunk) produce an
/// `add_review_comment` action; everything else produces a plain
/// `comment` action.
#[must_use]
pub fn reply_action(
    pr_number: u64,
    comment_id: u64,
    reply_text: &str,
    path: Option<&str>,
    line: Option<u64>,
    diff_hunk: Option<&str>,
) -> Action {
    // Synthetic view of the target comment, marked as a reply
    let target = RawComment {
        id: comment_id,
        author_login: String::new(),
        body: String::new(),
        created_at: Utc::now(),
        path: path.map(ToString::to_string),
        line,
        original_line: None,
        diff_hunk: diff_hunk.map(ToString::to_string),
        in_reply_to_id: Some(comment_id),
        commit_id: None,
    };

    let metadata = classify_comment(&target, pr_number);

    let action_type = if metadata.comment_type == CommentType::ReviewCommentReply {
        ActionType::AddReviewComment
    } else {
        ActionType::Comment
    };

    Action::new(action_type)
        .with_value(reply_text)
        .with_metadata("pr_number", json!(pr_number))
        .with_metadata("in_reply_to", json!(comment_id))
}

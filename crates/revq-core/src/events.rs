// SPDX-License-Identifier: Apache-2.0

//! Event and action vocabulary for triage.
//!
//! Events are a closed sum type over the PR event kinds this system
//! reacts to, matched exhaustively at triage time. Actions are the
//! side effects triage can request; they are produced here and consumed
//! by the action executor.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Reference to a pull request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PullRequestRef {
    /// Repository owner.
    pub owner: String,
    /// Repository name.
    pub repo: String,
    /// Pull request number.
    pub number: u64,
}

impl std::fmt::Display for PullRequestRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}#{}", self.owner, self.repo, self.number)
    }
}

/// State of a submitted review.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ReviewState {
    /// Review approved the changes.
    #[serde(rename = "APPROVED")]
    Approved,
    /// Review requested changes.
    #[serde(rename = "CHANGES_REQUESTED")]
    ChangesRequested,
    /// Review left comments without a verdict.
    #[serde(rename = "COMMENTED")]
    Commented,
}

/// State of a commit status or check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StatusState {
    /// Checks passed.
    Success,
    /// Checks failed.
    Failure,
    /// Checks still running.
    Pending,
}

/// A review was submitted on a pull request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReviewEvent {
    /// Pull request the review belongs to.
    pub pr: PullRequestRef,
    /// Login of the reviewing actor.
    pub actor_login: String,
    /// Display name of the reviewing actor.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub actor_name: Option<String>,
    /// Event identifier for correlation.
    pub event_id: String,
    /// Review verdict.
    pub state: ReviewState,
    /// Review body.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub body: Option<String>,
}

/// A comment was posted on a pull request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CommentEvent {
    /// Pull request the comment belongs to.
    pub pr: PullRequestRef,
    /// Login of the commenting actor.
    pub actor_login: String,
    /// Display name of the commenting actor.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub actor_name: Option<String>,
    /// Event identifier for correlation.
    pub event_id: String,
    /// Comment identifier.
    pub comment_id: u64,
    /// Comment body.
    pub body: String,
    /// File path for inline comments.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
    /// Line number for inline comments.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub line: Option<u64>,
    /// Reply target comment id.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub in_reply_to: Option<u64>,
}

/// A commit status changed on a pull request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatusEvent {
    /// Pull request the status belongs to.
    pub pr: PullRequestRef,
    /// Login of the actor that produced the status.
    pub actor_login: String,
    /// Display name of the actor.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub actor_name: Option<String>,
    /// Event identifier for correlation.
    pub event_id: String,
    /// Status outcome.
    pub state: StatusState,
    /// Status context (check name).
    pub context: String,
    /// Link to check output.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_url: Option<String>,
}

/// A classified PR event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event_type", rename_all = "snake_case")]
pub enum Event {
    /// Review submitted.
    Review(ReviewEvent),
    /// Comment posted.
    Comment(CommentEvent),
    /// Commit status changed.
    Status(StatusEvent),
}

impl Event {
    /// Login of the actor that produced the event.
    #[must_use]
    pub fn actor_login(&self) -> &str {
        match self {
            Event::Review(e) => &e.actor_login,
            Event::Comment(e) => &e.actor_login,
            Event::Status(e) => &e.actor_login,
        }
    }

    /// Display name of the actor, if known.
    #[must_use]
    pub fn actor_name(&self) -> Option<&str> {
        match self {
            Event::Review(e) => e.actor_name.as_deref(),
            Event::Comment(e) => e.actor_name.as_deref(),
            Event::Status(e) => e.actor_name.as_deref(),
        }
    }

    /// Event identifier.
    #[must_use]
    pub fn event_id(&self) -> &str {
        match self {
            Event::Review(e) => &e.event_id,
            Event::Comment(e) => &e.event_id,
            Event::Status(e) => &e.event_id,
        }
    }

    /// Pull request the event belongs to.
    #[must_use]
    pub fn pr(&self) -> &PullRequestRef {
        match self {
            Event::Review(e) => &e.pr,
            Event::Comment(e) => &e.pr,
            Event::Status(e) => &e.pr,
        }
    }
}

/// Kind of side effect an action requests.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionType {
    /// Add a label to the PR.
    ApplyLabel,
    /// Remove a label from the PR.
    RemoveLabel,
    /// Assign a user.
    Assign,
    /// Unassign a user.
    Unassign,
    /// Request a review.
    RequestReview,
    /// Post a comment.
    Comment,
    /// Re-run failed checks.
    RerunChecks,
    /// Open a follow-up issue.
    OpenIssue,
    /// Resolve a review thread.
    ResolveThread,
    /// Submit a pending review.
    SubmitReview,
    /// Dismiss a review.
    DismissReview,
    /// Add an inline review comment.
    AddReviewComment,
    /// Reply within a pending review.
    ReplyToPendingReview,
}

/// A requested side effect.
///
/// Never mutated after creation except by the context-injection step
/// that fills in a missing PR reference before execution.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Action {
    /// Kind of side effect.
    #[serde(rename = "type")]
    pub action_type: ActionType,
    /// Text payload (label name, comment body, ...).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
    /// Free-form context: target PR reference, reply-to id, commit id, ...
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub metadata: HashMap<String, Value>,
}

impl Action {
    /// Create an action with no value or metadata.
    #[must_use]
    pub fn new(action_type: ActionType) -> Self {
        Self {
            action_type,
            value: None,
            metadata: HashMap::new(),
        }
    }

    /// Set the text payload.
    #[must_use]
    pub fn with_value(mut self, value: impl Into<String>) -> Self {
        self.value = Some(value.into());
        self
    }

    /// Add a metadata entry.
    #[must_use]
    pub fn with_metadata(mut self, key: impl Into<String>, value: Value) -> Self {
        self.metadata.insert(key.into(), value);
        self
    }
}

/// Outcome of applying one action.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActionResult {
    /// The action that was applied.
    pub action: Action,
    /// Whether application succeeded.
    pub success: bool,
    /// Failure message or dry-run marker.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
}

/// Result of triaging one event.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TriagedActions {
    /// Requested side effects.
    pub actions: Vec<Action>,
    /// Labels to apply.
    pub labels: Vec<String>,
    /// Suggested assignee logins.
    pub assignments: Vec<String>,
}

// SPDX-License-Identifier: Apache-2.0

//! PR review orchestration - single entry point for comprehensive analysis.
//!
//! Composes PR data retrieval, thread analysis, and a lightweight triage
//! pass into one summarized review result with a prioritized action list.
//! Any upstream fetch error short-circuits the whole call; no partial
//! result is returned.

use async_trait::async_trait;
use octocrab::Octocrab;
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::{debug, instrument};

use crate::comments::RawComment;
use crate::error::RevqError;
use crate::events::{Action, ActionType, PullRequestRef};
use crate::github::graphql::{self, PendingReviews};
use crate::github::pulls::{self, PrInfo, ReviewSummary};
use crate::threads::{ConversationThread, ThreadAnalyzer, priority_threads};

/// Number of threads surfaced as high-priority response targets.
const PRIORITY_THREAD_LIMIT: usize = 5;

/// External collaborator contract for PR data retrieval.
///
/// The production implementation is [`GitHubSource`]; tests substitute
/// an in-memory source.
#[async_trait]
pub trait PullRequestSource: Send + Sync {
    /// Fetch PR metadata.
    async fn fetch_pr_info(&self, pr: &PullRequestRef) -> Result<PrInfo, RevqError>;

    /// Fetch submitted reviews.
    async fn fetch_reviews(&self, pr: &PullRequestRef) -> Result<Vec<ReviewSummary>, RevqError>;

    /// Fetch inline review comments.
    async fn fetch_inline_comments(
        &self,
        pr: &PullRequestRef,
    ) -> Result<Vec<RawComment>, RevqError>;

    /// Fetch pending reviews. `None` means the section was unavailable
    /// upstream, which is distinct from zero pending reviews.
    async fn fetch_pending_reviews(
        &self,
        pr: &PullRequestRef,
    ) -> Result<Option<PendingReviews>, RevqError>;

    /// Resolve the authenticated actor's login.
    async fn authenticated_login(&self) -> Result<String, RevqError>;
}

/// Production [`PullRequestSource`] backed by the GitHub API.
pub struct GitHubSource {
    client: Octocrab,
}

impl GitHubSource {
    /// Create a source from an authenticated client.
    #[must_use]
    pub fn new(client: Octocrab) -> Self {
        Self { client }
    }
}

#[async_trait]
impl PullRequestSource for GitHubSource {
    async fn fetch_pr_info(&self, pr: &PullRequestRef) -> Result<PrInfo, RevqError> {
        pulls::fetch_pr_info(&self.client, pr).await
    }

    async fn fetch_reviews(&self, pr: &PullRequestRef) -> Result<Vec<ReviewSummary>, RevqError> {
        pulls::fetch_reviews(&self.client, pr).await
    }

    async fn fetch_inline_comments(
        &self,
        pr: &PullRequestRef,
    ) -> Result<Vec<RawComment>, RevqError> {
        pulls::fetch_inline_comments(&self.client, pr).await
    }

    async fn fetch_pending_reviews(
        &self,
        pr: &PullRequestRef,
    ) -> Result<Option<PendingReviews>, RevqError> {
        graphql::fetch_pending_reviews(&self.client, pr).await
    }

    async fn authenticated_login(&self) -> Result<String, RevqError> {
        pulls::fetch_authenticated_login(&self.client).await
    }
}

/// Overall PR status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PrStatus {
    /// Conversation threads await a response.
    NeedsResponses,
    /// Pending reviews await submission.
    HasPendingReviews,
    /// Nothing outstanding.
    UpToDate,
}

/// Priority of a suggested action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    /// Respond first.
    High,
    /// Handle after responses.
    Medium,
    /// Housekeeping.
    Low,
}

/// One entry of the prioritized action list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriorityAction {
    /// Priority tier.
    pub priority: Priority,
    /// Human-readable description.
    pub description: String,
    /// The suggested action.
    pub action: Action,
}

/// Executive summary of PR status.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PrSummary {
    /// Pull request number.
    pub pr_number: u64,
    /// Pull request title.
    pub title: String,
    /// Pull request state.
    pub state: String,
    /// PR author login.
    pub author_login: String,
    /// Number of submitted reviews.
    pub total_reviews: usize,
    /// Number of inline comments.
    pub total_inline_comments: usize,
    /// Number of conversation threads.
    pub conversation_threads: usize,
    /// Number of threads awaiting a response.
    pub threads_needing_response: usize,
    /// Number of pending reviews; `None` when the section was unavailable.
    pub pending_reviews: Option<usize>,
    /// Labels suggested by the triage pass.
    pub suggested_labels: Vec<String>,
    /// Overall status.
    pub status: PrStatus,
    /// One-line suggestion for the next action.
    pub next_action: String,
}

/// Complete result of a PR review pass.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PrReviewResult {
    /// PR metadata.
    pub pr_info: PrInfo,
    /// Analyzed conversation threads, response-needed first.
    pub threads: Vec<ConversationThread>,
    /// Prioritized suggested actions.
    pub priority_actions: Vec<PriorityAction>,
    /// Executive summary.
    pub summary: PrSummary,
}

/// Orchestrates the complete PR review workflow.
pub struct Orchestrator<S> {
    source: S,
    bot_patterns: Vec<String>,
}

impl<S: PullRequestSource> Orchestrator<S> {
    /// Create an orchestrator over a PR data source.
    #[must_use]
    pub fn new(source: S, bot_patterns: Vec<String>) -> Self {
        Self {
            source,
            bot_patterns,
        }
    }

    /// Run the complete review workflow for one pull request.
    ///
    /// # Errors
    ///
    /// Any upstream fetch error fails the whole call; no partial result
    /// is returned.
    #[instrument(skip(self), fields(pr = %pr))]
    pub async fn review_pr(&self, pr: &PullRequestRef) -> Result<PrReviewResult, RevqError> {
        let login = self.source.authenticated_login().await?;
        let pr_info = self.source.fetch_pr_info(pr).await?;
        let reviews = self.source.fetch_reviews(pr).await?;
        let inline_comments = self.source.fetch_inline_comments(pr).await?;
        let pending = self.source.fetch_pending_reviews(pr).await?;

        let analyzer = ThreadAnalyzer::new(self.bot_patterns.clone(), login);
        let threads = analyzer.analyze(&inline_comments);
        let threads_needing_response = threads.iter().filter(|t| t.needs_response).count();
        let pending_count = pending.as_ref().map(|p| p.count);

        debug!(
            threads = threads.len(),
            needing_response = threads_needing_response,
            pending = ?pending_count,
            "Analyzed PR conversations"
        );

        let suggested_labels = suggest_labels(&reviews, threads_needing_response);
        let priority_actions =
            build_priority_actions(pr, &threads, pending_count, &suggested_labels);

        let status = determine_status(threads_needing_response, pending_count);
        let summary = PrSummary {
            pr_number: pr_info.number,
            title: pr_info.title.clone(),
            state: pr_info.state.clone(),
            author_login: pr_info.author_login.clone(),
            total_reviews: reviews.len(),
            total_inline_comments: inline_comments.len(),
            conversation_threads: threads.len(),
            threads_needing_response,
            pending_reviews: pending_count,
            suggested_labels,
            status,
            next_action: next_action(threads_needing_response, pending_count),
        };

        Ok(PrReviewResult {
            pr_info,
            threads,
            priority_actions,
            summary,
        })
    }
}

/// Derives suggested labels from thread and review state.
fn suggest_labels(reviews: &[ReviewSummary], threads_needing_response: usize) -> Vec<String> {
    let mut labels = Vec::new();

    if threads_needing_response > 0 {
        labels.push("needs-response".to_string());
    }

    if reviews.iter().any(|r| r.state == "CHANGES_REQUESTED") {
        labels.push("needs-changes".to_string());
    } else if reviews.iter().any(|r| r.state == "APPROVED") {
        labels.push("approved".to_string());
    }

    labels
}

/// Builds the prioritized action list: thread responses, then pending
/// review submission, then label suggestions.
fn build_priority_actions(
    pr: &PullRequestRef,
    threads: &[ConversationThread],
    pending_count: Option<usize>,
    suggested_labels: &[String],
) -> Vec<PriorityAction> {
    let mut actions = Vec::new();

    for thread in priority_threads(threads, PRIORITY_THREAD_LIMIT) {
        let mut action = Action::new(ActionType::Comment)
            .with_metadata("pr_number", json!(pr.number))
            .with_metadata("path", json!(thread.path))
            .with_metadata("line", json!(thread.line));
        if let Some(comment_id) = thread.last_external_comment_id {
            action = action.with_metadata("in_reply_to", json!(comment_id));
        }
        actions.push(PriorityAction {
            priority: Priority::High,
            description: format!(
                "Respond to thread {}:{} ({} participants)",
                thread.path,
                thread.line,
                thread.participants.len()
            ),
            action,
        });
    }

    if let Some(count) = pending_count
        && count > 0
    {
        actions.push(PriorityAction {
            priority: Priority::Medium,
            description: format!("Submit {count} pending reviews"),
            action: Action::new(ActionType::SubmitReview)
                .with_metadata("pr_number", json!(pr.number))
                .with_metadata("count", json!(count)),
        });
    }

    for label in suggested_labels {
        actions.push(PriorityAction {
            priority: Priority::Low,
            description: format!("Apply label '{label}'"),
            action: Action::new(ActionType::ApplyLabel)
                .with_value(label)
                .with_metadata("pr_number", json!(pr.number)),
        });
    }

    actions
}

/// Determines overall PR status.
fn determine_status(threads_needing_response: usize, pending_count: Option<usize>) -> PrStatus {
    if threads_needing_response > 0 {
        PrStatus::NeedsResponses
    } else if pending_count.unwrap_or(0) > 0 {
        PrStatus::HasPendingReviews
    } else {
        PrStatus::UpToDate
    }
}

/// Suggests the next action for the user.
fn next_action(threads_needing_response: usize, pending_count: Option<usize>) -> String {
    if threads_needing_response > 0 {
        format!("Respond to {threads_needing_response} conversation threads")
    } else if let Some(count) = pending_count.filter(|c| *c > 0) {
        format!("Submit {count} pending reviews")
    } else {
        "No immediate actions needed".to_string()
    }
}

// SPDX-License-Identifier: Apache-2.0

//! End-to-end review orchestration against an in-memory PR source.

use async_trait::async_trait;
use revq_core::orchestrator::{Orchestrator, PullRequestSource};
use revq_core::{
    ActionType, PendingReviews, PrInfo, PrStatus, Priority, PullRequestRef, RawComment, RevqError,
    ReviewSummary,
};

struct MockSource {
    info: PrInfo,
    reviews: Vec<ReviewSummary>,
    comments: Vec<RawComment>,
    pending: Option<PendingReviews>,
    login: String,
    fail_comments: bool,
}

impl MockSource {
    fn new() -> Self {
        Self {
            info: PrInfo {
                number: 42,
                title: "Add retry support".to_string(),
                state: "open".to_string(),
                author_login: "alice".to_string(),
                head_sha: "abc123".to_string(),
            },
            reviews: Vec::new(),
            comments: Vec::new(),
            pending: Some(PendingReviews::default()),
            login: "review-agent".to_string(),
            fail_comments: false,
        }
    }
}

#[async_trait]
impl PullRequestSource for MockSource {
    async fn fetch_pr_info(&self, _pr: &PullRequestRef) -> Result<PrInfo, RevqError> {
        Ok(self.info.clone())
    }

    async fn fetch_reviews(&self, _pr: &PullRequestRef) -> Result<Vec<ReviewSummary>, RevqError> {
        Ok(self.reviews.clone())
    }

    async fn fetch_inline_comments(
        &self,
        _pr: &PullRequestRef,
    ) -> Result<Vec<RawComment>, RevqError> {
        if self.fail_comments {
            return Err(RevqError::Connection {
                message: "connection reset".to_string(),
            });
        }
        Ok(self.comments.clone())
    }

    async fn fetch_pending_reviews(
        &self,
        _pr: &PullRequestRef,
    ) -> Result<Option<PendingReviews>, RevqError> {
        Ok(self.pending.clone())
    }

    async fn authenticated_login(&self) -> Result<String, RevqError> {
        Ok(self.login.clone())
    }
}

fn pr() -> PullRequestRef {
    PullRequestRef {
        owner: "octocat".to_string(),
        repo: "hello".to_string(),
        number: 42,
    }
}

fn comment(id: u64, author: &str, created_at: &str, reply_to: Option<u64>) -> RawComment {
    RawComment {
        id,
        author_login: author.to_string(),
        body: format!("comment {id}"),
        created_at: created_at.parse().unwrap(),
        path: Some("src/lib.rs".to_string()),
        line: Some(10),
        original_line: None,
        diff_hunk: Some("@@ -8,3 +8,4 @@".to_string()),
        in_reply_to_id: reply_to,
        commit_id: None,
    }
}

fn review(state: &str) -> ReviewSummary {
    ReviewSummary {
        id: 900,
        state: state.to_string(),
        author_login: "carol".to_string(),
        body: None,
        submitted_at: None,
    }
}

fn orchestrator(source: MockSource) -> Orchestrator<MockSource> {
    Orchestrator::new(source, vec!["dependabot".to_string()])
}

#[tokio::test]
async fn quiet_pr_is_up_to_date() {
    let result = orchestrator(MockSource::new()).review_pr(&pr()).await.unwrap();

    assert_eq!(result.summary.status, PrStatus::UpToDate);
    assert_eq!(result.summary.next_action, "No immediate actions needed");
    assert_eq!(result.summary.pending_reviews, Some(0));
    assert!(result.threads.is_empty());
    assert!(result.priority_actions.is_empty());
    assert!(result.summary.suggested_labels.is_empty());
}

#[tokio::test]
async fn unanswered_thread_drives_needs_responses() {
    let mut source = MockSource::new();
    source.comments = vec![comment(1, "alice", "2024-01-01T00:00:00Z", None)];

    let result = orchestrator(source).review_pr(&pr()).await.unwrap();

    assert_eq!(result.summary.status, PrStatus::NeedsResponses);
    assert_eq!(result.summary.threads_needing_response, 1);
    assert_eq!(
        result.summary.next_action,
        "Respond to 1 conversation threads"
    );
    assert_eq!(
        result.summary.suggested_labels,
        vec!["needs-response".to_string()]
    );

    // High-priority response action comes before the low-priority label
    assert_eq!(result.priority_actions[0].priority, Priority::High);
    assert_eq!(
        result.priority_actions[0].action.metadata["in_reply_to"],
        serde_json::json!(1)
    );
    let last = result.priority_actions.last().unwrap();
    assert_eq!(last.priority, Priority::Low);
    assert_eq!(last.action.action_type, ActionType::ApplyLabel);
}

#[tokio::test]
async fn own_reply_resolves_thread() {
    let mut source = MockSource::new();
    source.comments = vec![
        comment(1, "alice", "2024-01-01T00:00:00Z", None),
        comment(2, "review-agent", "2024-01-02T00:00:00Z", Some(1)),
    ];

    let result = orchestrator(source).review_pr(&pr()).await.unwrap();

    assert_eq!(result.summary.status, PrStatus::UpToDate);
    assert_eq!(result.summary.threads_needing_response, 0);
    assert_eq!(result.threads[0].own_last_response_id, Some(2));
}

#[tokio::test]
async fn pending_reviews_surface_when_threads_are_answered() {
    let mut source = MockSource::new();
    source.pending = Some(PendingReviews {
        reviews: Vec::new(),
        count: 2,
        has_comments: false,
    });

    let result = orchestrator(source).review_pr(&pr()).await.unwrap();

    assert_eq!(result.summary.status, PrStatus::HasPendingReviews);
    assert_eq!(result.summary.next_action, "Submit 2 pending reviews");
    assert_eq!(result.priority_actions.len(), 1);
    assert_eq!(result.priority_actions[0].priority, Priority::Medium);
    assert_eq!(
        result.priority_actions[0].action.action_type,
        ActionType::SubmitReview
    );
}

#[tokio::test]
async fn missing_pending_section_is_not_zero() {
    let mut source = MockSource::new();
    source.pending = None;

    let result = orchestrator(source).review_pr(&pr()).await.unwrap();

    assert_eq!(result.summary.pending_reviews, None);
    assert_eq!(result.summary.status, PrStatus::UpToDate);
}

#[tokio::test]
async fn review_state_drives_suggested_labels() {
    let mut source = MockSource::new();
    source.reviews = vec![review("CHANGES_REQUESTED"), review("APPROVED")];

    let result = orchestrator(source).review_pr(&pr()).await.unwrap();

    assert_eq!(
        result.summary.suggested_labels,
        vec!["needs-changes".to_string()]
    );
    assert_eq!(result.summary.total_reviews, 2);
}

#[tokio::test]
async fn fetch_failure_short_circuits_whole_call() {
    let mut source = MockSource::new();
    source.comments = vec![comment(1, "alice", "2024-01-01T00:00:00Z", None)];
    source.fail_comments = true;

    let result = orchestrator(source).review_pr(&pr()).await;

    assert!(matches!(result, Err(RevqError::Connection { .. })));
}

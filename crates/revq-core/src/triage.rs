// SPDX-License-Identifier: Apache-2.0

//! Triage logic for PR events.
//!
//! Maps a classified event plus the active policy snapshot to a set of
//! suggested labels and reply actions. Stateless per call: the policy is
//! the only shared state, held as an immutable snapshot behind a lock and
//! replaced atomically by [`TriageEngine::set_policy`].

use std::sync::{Arc, RwLock};

use serde_json::json;
use tracing::info;

use crate::classifier::{ActorClassifier, ActorType};
use crate::config::PolicyConfig;
use crate::events::{Action, ActionType, CommentEvent, Event, ReviewEvent, ReviewState, StatusEvent, StatusState, TriagedActions};

/// Acknowledgment posted when a review requests changes.
const CHANGES_REQUESTED_ACK: &str =
    "Thanks for the thorough review! We'll address these changes.";

/// Acknowledgment posted for comments from automated actors.
const BOT_COMMENT_ACK: &str =
    "\u{1f916} Automated feedback noted. Running follow-up automation if required.";

/// Acknowledgment posted for comments from humans.
const HUMAN_COMMENT_ACK: &str = "Thanks for the feedback! We'll take a look right away.";

/// Decides which actions should be taken for a GitHub event.
pub struct TriageEngine {
    classifier: Arc<ActorClassifier>,
    policy: RwLock<PolicyConfig>,
}

impl TriageEngine {
    /// Create an engine with the given classifier and policy snapshot.
    #[must_use]
    pub fn new(classifier: Arc<ActorClassifier>, policy: PolicyConfig) -> Self {
        Self {
            classifier,
            policy: RwLock::new(policy),
        }
    }

    /// Replace the active policy atomically.
    pub fn set_policy(&self, policy: PolicyConfig) {
        *self.policy.write().expect("policy lock poisoned") = policy;
    }

    /// Returns a clone of the active policy snapshot.
    #[must_use]
    pub fn policy(&self) -> PolicyConfig {
        self.policy.read().expect("policy lock poisoned").clone()
    }

    /// Triage an event into suggested actions, labels, and assignments.
    #[must_use]
    pub fn triage(&self, event: &Event) -> TriagedActions {
        let classification = self
            .classifier
            .classify(event.actor_login(), event.actor_name());

        info!(
            event_id = event.event_id(),
            actor = event.actor_login(),
            actor_type = ?classification.actor_type,
            "triaging event"
        );

        let mut triaged = TriagedActions::default();
        match event {
            Event::Review(review) => Self::handle_review(review, &mut triaged),
            Event::Comment(comment) => {
                self.handle_comment(comment, classification.actor_type, &mut triaged);
            }
            Event::Status(status) => Self::handle_status(status, &mut triaged),
        }
        triaged
    }

    fn handle_review(event: &ReviewEvent, triaged: &mut TriagedActions) {
        match event.state {
            ReviewState::ChangesRequested => {
                triaged.actions.push(
                    Action::new(ActionType::Comment)
                        .with_value(CHANGES_REQUESTED_ACK)
                        .with_metadata("event_id", json!(event.event_id)),
                );
                triaged.labels.push("needs-changes".to_string());
            }
            ReviewState::Approved => {
                triaged.labels.push("approved".to_string());
            }
            ReviewState::Commented => {}
        }
    }

    fn handle_comment(
        &self,
        event: &CommentEvent,
        actor_type: ActorType,
        triaged: &mut TriagedActions,
    ) {
        let body = match actor_type {
            ActorType::Bot => BOT_COMMENT_ACK,
            ActorType::Human => HUMAN_COMMENT_ACK,
        };
        triaged.actions.push(
            Action::new(ActionType::Comment)
                .with_value(body)
                .with_metadata("event_id", json!(event.event_id))
                .with_metadata("comment_id", json!(event.comment_id))
                .with_metadata(
                    "pr",
                    json!({
                        "owner": event.pr.owner,
                        "repo": event.pr.repo,
                        "number": event.pr.number,
                    }),
                ),
        );

        if let Some(path) = &event.path {
            let policy = self.policy.read().expect("policy lock poisoned");
            // Sorted for deterministic label order across runs
            let mut prefixes: Vec<_> = policy.labels.iter().collect();
            prefixes.sort_by(|a, b| a.0.cmp(b.0));
            for (prefix, labels) in prefixes {
                if path.starts_with(prefix.as_str()) {
                    for label in labels {
                        if !triaged.labels.contains(label) {
                            triaged.labels.push(label.clone());
                        }
                    }
                }
            }
        }
    }

    fn handle_status(event: &StatusEvent, triaged: &mut TriagedActions) {
        match event.state {
            StatusState::Failure => {
                triaged.labels.push("ci-failed".to_string());
                triaged.actions.push(
                    Action::new(ActionType::RerunChecks)
                        .with_metadata("context", json!(event.context)),
                );
            }
            StatusState::Success => {
                triaged.labels.push("ci-passed".to_string());
            }
            StatusState::Pending => {}
        }
    }
}

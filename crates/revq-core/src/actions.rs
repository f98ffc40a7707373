// SPDX-License-Identifier: Apache-2.0

//! Applies triaged actions to GitHub.
//!
//! The executor walks an action batch and applies each side effect through
//! the REST API with the standard retry policy. Per-action failures are
//! captured in the result list and never abort the batch. In dry-run mode
//! no network effect occurs and every action reports a no-op success.

use backon::Retryable;
use octocrab::Octocrab;
use serde_json::{Value, json};
use tracing::{debug, info};

use crate::error::RevqError;
use crate::events::{Action, ActionResult, ActionType};
use crate::retry::{is_retryable_octocrab, retry_backoff};

/// Applies actions to GitHub.
pub struct ActionExecutor {
    client: Octocrab,
    dry_run: bool,
}

impl ActionExecutor {
    /// Create an executor.
    ///
    /// # Arguments
    ///
    /// * `client` - Authenticated Octocrab client
    /// * `dry_run` - When set, all applies are reported as no-op successes
    #[must_use]
    pub fn new(client: Octocrab, dry_run: bool) -> Self {
        Self { client, dry_run }
    }

    /// Apply a batch of actions.
    ///
    /// `dry_run` is OR-ed with the executor's configured dry-run flag.
    pub async fn apply(&self, actions: &[Action], dry_run: bool) -> Vec<ActionResult> {
        let effective_dry_run = dry_run || self.dry_run;
        let mut results = Vec::with_capacity(actions.len());

        for action in actions {
            if effective_dry_run {
                info!(action_type = ?action.action_type, "dry-run: skipping action");
                results.push(ActionResult {
                    action: action.clone(),
                    success: true,
                    detail: Some("dry-run".to_string()),
                });
                continue;
            }

            match self.apply_action(action).await {
                Ok(()) => results.push(ActionResult {
                    action: action.clone(),
                    success: true,
                    detail: None,
                }),
                Err(e) => results.push(ActionResult {
                    action: action.clone(),
                    success: false,
                    detail: Some(e.to_string()),
                }),
            }
        }

        results
    }

    async fn apply_action(&self, action: &Action) -> Result<(), RevqError> {
        match action.action_type {
            ActionType::ApplyLabel => {
                let (owner, repo, number) = pr_target(action)?;
                let route = format!("/repos/{owner}/{repo}/issues/{number}/labels");
                let payload = json!({ "labels": [action.value] });
                self.post(&route, &payload).await
            }
            ActionType::Comment => {
                let (owner, repo, number) = pr_target(action)?;
                let route = format!("/repos/{owner}/{repo}/issues/{number}/comments");
                let payload = json!({ "body": action.value });
                self.post(&route, &payload).await
            }
            ActionType::AddReviewComment => {
                let (owner, repo, number) = pr_target(action)?;
                let route = format!("/repos/{owner}/{repo}/pulls/{number}/comments");
                let mut payload = json!({ "body": action.value });
                if let Some(in_reply_to) = action.metadata.get("in_reply_to") {
                    payload["in_reply_to"] = in_reply_to.clone();
                }
                self.post(&route, &payload).await
            }
            ActionType::RerunChecks => {
                let url = action
                    .metadata
                    .get("url")
                    .and_then(Value::as_str)
                    .ok_or_else(|| RevqError::Validation {
                        message: "rerun_checks action requires a url metadata entry".to_string(),
                    })?;
                let payload = json!({});
                self.post(url, &payload).await
            }
            _ => Err(RevqError::Validation {
                message: format!("no handler for action type {:?}", action.action_type),
            }),
        }
    }

    async fn post(&self, route: &str, payload: &Value) -> Result<(), RevqError> {
        debug!(route, "Applying action");
        let _: Value = (|| async { self.client.post(route, Some(payload)).await })
            .retry(retry_backoff())
            .when(is_retryable_octocrab)
            .await?;
        Ok(())
    }
}

/// Extracts the `(owner, repo, number)` target from action metadata.
///
/// Accepts either a nested `pr` object or flat `pr_number` plus
/// `owner`/`repo` keys.
fn pr_target(action: &Action) -> Result<(String, String, u64), RevqError> {
    let missing = || RevqError::Validation {
        message: format!(
            "action {:?} is missing its PR reference metadata",
            action.action_type
        ),
    };

    if let Some(pr) = action.metadata.get("pr") {
        let owner = pr.get("owner").and_then(Value::as_str).ok_or_else(missing)?;
        let repo = pr.get("repo").and_then(Value::as_str).ok_or_else(missing)?;
        let number = pr.get("number").and_then(Value::as_u64).ok_or_else(missing)?;
        return Ok((owner.to_string(), repo.to_string(), number));
    }

    let owner = action
        .metadata
        .get("owner")
        .and_then(Value::as_str)
        .ok_or_else(missing)?;
    let repo = action
        .metadata
        .get("repo")
        .and_then(Value::as_str)
        .ok_or_else(missing)?;
    let number = action
        .metadata
        .get("pr_number")
        .and_then(Value::as_u64)
        .ok_or_else(missing)?;
    Ok((owner.to_string(), repo.to_string(), number))
}

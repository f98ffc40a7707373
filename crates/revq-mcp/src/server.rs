// SPDX-License-Identifier: Apache-2.0

//! MCP server implementation exposing the revq tools.

use std::sync::Arc;

use rmcp::{
    ErrorData as McpError, ServerHandler,
    handler::server::{router::tool::ToolRouter, wrapper::Parameters},
    model::{
        CallToolResult, Content, Implementation, ProtocolVersion, ServerCapabilities, ServerInfo,
    },
    schemars::JsonSchema,
    tool, tool_handler, tool_router,
};
use serde::Deserialize;
use serde_json::Value;

use crate::auth::EnvTokenProvider;
use crate::error::{generic_to_mcp_error, revq_error_to_mcp};
use revq_core::orchestrator::{GitHubSource, Orchestrator};
use revq_core::triage::TriageEngine;
use revq_core::{
    Action, ActorClassifier, ActorType, AppConfig, CodeContext, Event, PolicyConfig, RawComment,
    Responder, ReplyRequest, SubmitEvent, ThreadContext, ThreadStore, build_client,
    classify_comment, load_config, load_policy, parse_pr_reference, reply_action,
};

// ---------------------------------------------------------------------------
// Tool parameter structs
// ---------------------------------------------------------------------------

/// Parameters for classifying an actor.
#[derive(Debug, Deserialize, JsonSchema)]
#[schemars(description = "Classify a GitHub actor as bot or human")]
pub struct ClassifyActorParams {
    /// Actor login.
    #[schemars(description = "Actor login, e.g. dependabot[bot]")]
    pub login: String,
    /// Actor display name.
    #[schemars(description = "Optional actor display name")]
    pub name: Option<String>,
}

/// Parameters for classifying a comment.
#[derive(Debug, Deserialize, JsonSchema)]
#[schemars(description = "Classify a comment to determine its API dispatch shape")]
pub struct ClassifyCommentParams {
    /// Raw comment object.
    #[schemars(description = "Raw comment JSON (id, author_login, body, created_at, ...)")]
    pub comment: Value,
    /// Pull request number the comment belongs to.
    #[schemars(description = "Pull request number")]
    pub pr_number: u64,
}

/// Parameters for triaging a PR event.
#[derive(Debug, Deserialize, JsonSchema)]
#[schemars(description = "Triage a PR event into suggested labels and actions")]
pub struct TriageEventParams {
    /// Event payload with an `event_type` discriminator.
    #[schemars(description = "Event JSON with event_type review|comment|status")]
    pub event: Value,
}

/// Parameters for generating a reply.
#[derive(Debug, Deserialize, JsonSchema)]
#[schemars(description = "Generate a reply for a comment based on the actor type")]
pub struct GenerateReplyParams {
    /// Classified actor type ("bot" or "human").
    #[schemars(description = "Actor type: bot or human")]
    pub actor_type: String,
    /// Thread identifier.
    #[schemars(description = "Conversation thread identifier")]
    pub thread_id: String,
    /// File under discussion.
    #[schemars(description = "Optional file path under discussion")]
    pub file: Option<String>,
    /// Line under discussion.
    #[schemars(description = "Optional line number under discussion")]
    pub line: Option<u64>,
    /// The comment being replied to.
    #[schemars(description = "Body of the comment being replied to")]
    pub comment: String,
    /// Proposed replacement code, if any.
    #[schemars(description = "Optional proposed replacement code")]
    pub code_after: Option<String>,
}

/// Parameters for building a smart reply action.
#[derive(Debug, Deserialize, JsonSchema)]
#[schemars(description = "Build the correctly-routed reply action for a comment")]
pub struct SmartReplyParams {
    /// Pull request number.
    #[schemars(description = "Pull request number")]
    pub pr_number: u64,
    /// Comment being replied to.
    #[schemars(description = "Identifier of the comment being replied to")]
    pub comment_id: u64,
    /// Reply text.
    #[schemars(description = "Reply body to post")]
    pub reply_text: String,
    /// File path if the target is an inline comment.
    #[schemars(description = "File path when replying to an inline comment")]
    pub path: Option<String>,
    /// Line number if the target is an inline comment.
    #[schemars(description = "Line number when replying to an inline comment")]
    pub line: Option<u64>,
    /// Diff hunk if the target is an inline comment.
    #[schemars(description = "Diff hunk when replying to an inline comment")]
    pub diff_hunk: Option<String>,
}

/// Parameters for applying actions.
#[derive(Debug, Deserialize, JsonSchema)]
#[schemars(description = "Apply a batch of actions to GitHub")]
pub struct ApplyActionsParams {
    /// Actions to apply.
    #[schemars(description = "Array of action objects")]
    pub actions: Value,
    /// Report actions without applying them.
    #[schemars(description = "When true, report actions as no-op successes")]
    pub dry_run: Option<bool>,
}

/// Parameters for mapping an inline thread.
#[derive(Debug, Deserialize, JsonSchema)]
#[schemars(description = "Map a review comment to a persistent thread id")]
pub struct MapInlineThreadParams {
    /// Review comment identifier.
    #[schemars(description = "Identifier of the review comment")]
    pub review_comment_id: String,
    /// File the comment is anchored to.
    #[schemars(description = "File path of the comment")]
    pub file: String,
    /// Line the comment is anchored to.
    #[schemars(description = "Line number of the comment")]
    pub line: u64,
    /// Commit the comment was made against.
    #[schemars(description = "Optional commit id")]
    pub commit_id: Option<String>,
}

/// Parameters for the full PR review workflow.
#[derive(Debug, Deserialize, JsonSchema)]
#[schemars(description = "Run the full review workflow on a pull request")]
pub struct ReviewPrParams {
    /// PR reference (e.g. "owner/repo#456" or full URL).
    #[schemars(description = "PR reference such as owner/repo#456 or a GitHub URL")]
    pub pr_ref: String,
}

/// Parameters for submitting a pending review.
#[derive(Debug, Deserialize, JsonSchema)]
#[schemars(description = "Submit a pending review on a pull request")]
pub struct SubmitPendingReviewParams {
    /// GraphQL node id of the pending review.
    #[schemars(description = "GraphQL node id of the pending review")]
    pub review_id: String,
    /// Review event type.
    #[schemars(description = "Review action: approve, request_changes, or comment")]
    pub event: String,
    /// Review body.
    #[schemars(description = "Optional review body")]
    pub body: Option<String>,
}

/// Parameters for replacing the triage policy.
#[derive(Debug, Deserialize, JsonSchema)]
#[schemars(description = "Replace the active triage policy")]
pub struct SetPolicyParams {
    /// Policy object (labels, owners, protected paths, SLA).
    #[schemars(description = "Policy JSON with labels/owners/protected_paths/sla_hours")]
    pub policy: Value,
}

/// Parameters for health check (empty for consistency).
#[derive(Debug, Deserialize, JsonSchema)]
#[schemars(description = "Check the health of credentials and local storage")]
pub struct HealthCheckParams {}

/// Health check response.
#[derive(Debug, serde::Serialize, serde::Deserialize, JsonSchema)]
pub struct HealthCheckResponse {
    /// Overall status.
    pub status: String,
    /// Whether a GitHub token is available.
    pub github_token_present: bool,
    /// Whether the thread-mapping store is readable.
    pub storage_healthy: bool,
}

// ---------------------------------------------------------------------------
// Server struct
// ---------------------------------------------------------------------------

/// MCP server exposing revq-core functionality.
#[derive(Clone)]
pub struct RevqServer {
    tool_router: ToolRouter<Self>,
    classifier: Arc<ActorClassifier>,
    engine: Arc<TriageEngine>,
    config: Arc<AppConfig>,
}

impl RevqServer {
    /// Create a server, loading configuration and the triage policy once.
    ///
    /// # Errors
    ///
    /// Returns a configuration error if the config file, policy file, or
    /// bot pattern list is invalid.
    pub fn try_new() -> revq_core::Result<Self> {
        let config = load_config()?;
        let policy = match &config.policy_path {
            Some(path) => load_policy(path)?,
            None => PolicyConfig::default(),
        };

        let classifier = Arc::new(ActorClassifier::new(&config.bot_patterns())?);
        let engine = Arc::new(TriageEngine::new(Arc::clone(&classifier), policy));

        Ok(Self {
            tool_router: Self::tool_router(),
            classifier,
            engine,
            config: Arc::new(config),
        })
    }

    fn json_result<T: serde::Serialize>(value: &T) -> Result<CallToolResult, McpError> {
        let json = serde_json::to_string_pretty(value).map_err(generic_to_mcp_error)?;
        Ok(CallToolResult::success(vec![Content::text(json)]))
    }
}

// ---------------------------------------------------------------------------
// Tools (generates Self::tool_router())
// ---------------------------------------------------------------------------

#[tool_router]
impl RevqServer {
    #[tool(
        name = "classify_actor",
        description = "Classify a GitHub actor as bot or human from login and display name",
        annotations(read_only_hint = true, idempotent_hint = true)
    )]
    async fn classify_actor(
        &self,
        Parameters(params): Parameters<ClassifyActorParams>,
    ) -> Result<CallToolResult, McpError> {
        let classification = self
            .classifier
            .classify(&params.login, params.name.as_deref());
        Self::json_result(&classification)
    }

    #[tool(
        name = "classify_comment",
        description = "Classify a comment and derive its API endpoint, payload shape, and validation errors",
        annotations(read_only_hint = true, idempotent_hint = true)
    )]
    async fn classify_comment(
        &self,
        Parameters(params): Parameters<ClassifyCommentParams>,
    ) -> Result<CallToolResult, McpError> {
        let comment: RawComment = serde_json::from_value(params.comment)
            .map_err(|e| McpError::invalid_params(format!("Invalid comment: {e}"), None))?;

        let metadata = classify_comment(&comment, params.pr_number);
        let endpoint = metadata.api_endpoint();
        let validation_errors = metadata.validate();

        Self::json_result(&serde_json::json!({
            "metadata": metadata,
            "endpoint": endpoint,
            "validation_errors": validation_errors,
        }))
    }

    #[tool(
        name = "triage_event",
        description = "Triage a PR event into suggested labels and reply actions",
        annotations(read_only_hint = true, idempotent_hint = true)
    )]
    async fn triage_event(
        &self,
        Parameters(params): Parameters<TriageEventParams>,
    ) -> Result<CallToolResult, McpError> {
        let event: Event = serde_json::from_value(params.event)
            .map_err(|e| McpError::invalid_params(format!("Invalid event: {e}"), None))?;

        let triaged = self.engine.triage(&event);
        Self::json_result(&triaged)
    }

    #[tool(
        name = "generate_reply",
        description = "Generate a reply body and follow-up actions for a comment",
        annotations(read_only_hint = true, idempotent_hint = true)
    )]
    async fn generate_reply(
        &self,
        Parameters(params): Parameters<GenerateReplyParams>,
    ) -> Result<CallToolResult, McpError> {
        let actor_type = match params.actor_type.as_str() {
            "bot" => ActorType::Bot,
            "human" => ActorType::Human,
            other => {
                return Err(McpError::invalid_params(
                    format!("Unknown actor type: {other}"),
                    None,
                ));
            }
        };

        let code_context = params.code_after.map(|after| CodeContext {
            path: params.file.clone().unwrap_or_default(),
            before: None,
            after: Some(after),
        });

        let response = Responder.generate(&ReplyRequest {
            actor_type,
            thread: ThreadContext {
                id: params.thread_id,
                file: params.file,
                line: params.line,
            },
            comment: params.comment,
            code_context,
        });
        Self::json_result(&response)
    }

    #[tool(
        name = "smart_reply",
        description = "Build the correctly-routed reply action for a comment",
        annotations(read_only_hint = true, idempotent_hint = true)
    )]
    async fn smart_reply(
        &self,
        Parameters(params): Parameters<SmartReplyParams>,
    ) -> Result<CallToolResult, McpError> {
        let action = reply_action(
            params.pr_number,
            params.comment_id,
            &params.reply_text,
            params.path.as_deref(),
            params.line,
            params.diff_hunk.as_deref(),
        );
        Self::json_result(&action)
    }

    #[tool(
        name = "apply_actions",
        description = "Apply a batch of actions (labels, comments, check re-runs) to GitHub",
        annotations(destructive_hint = true, open_world_hint = true)
    )]
    async fn apply_actions(
        &self,
        Parameters(params): Parameters<ApplyActionsParams>,
    ) -> Result<CallToolResult, McpError> {
        let actions: Vec<Action> = serde_json::from_value(params.actions)
            .map_err(|e| McpError::invalid_params(format!("Invalid actions: {e}"), None))?;

        let client = build_client(&EnvTokenProvider, &self.config.github).map_err(|e| revq_error_to_mcp(&e))?;
        let executor = revq_core::ActionExecutor::new(client, self.config.dry_run);

        let results = executor
            .apply(&actions, params.dry_run.unwrap_or(false))
            .await;
        Self::json_result(&results)
    }

    #[tool(
        name = "map_inline_thread",
        description = "Map a review comment to a persistent thread id",
        annotations(idempotent_hint = true)
    )]
    async fn map_inline_thread(
        &self,
        Parameters(params): Parameters<MapInlineThreadParams>,
    ) -> Result<CallToolResult, McpError> {
        let store = ThreadStore::at_default_path();
        let thread_id = store
            .map_thread(
                &params.review_comment_id,
                &params.file,
                params.line,
                params.commit_id.as_deref(),
            )
            .map_err(|e| revq_error_to_mcp(&e))?;

        Self::json_result(&serde_json::json!({ "thread_id": thread_id }))
    }

    #[tool(
        name = "review_pr",
        description = "Run the full review workflow on a pull request",
        annotations(read_only_hint = true, open_world_hint = true)
    )]
    async fn review_pr(
        &self,
        Parameters(params): Parameters<ReviewPrParams>,
    ) -> Result<CallToolResult, McpError> {
        let pr = parse_pr_reference(&params.pr_ref, None).map_err(|e| revq_error_to_mcp(&e))?;

        let client = build_client(&EnvTokenProvider, &self.config.github).map_err(|e| revq_error_to_mcp(&e))?;
        let orchestrator = Orchestrator::new(GitHubSource::new(client), self.config.bot_patterns());

        let result = orchestrator
            .review_pr(&pr)
            .await
            .map_err(|e| revq_error_to_mcp(&e))?;
        Self::json_result(&result)
    }

    #[tool(
        name = "submit_pending_review",
        description = "Submit a pending review with an approve, request_changes, or comment verdict",
        annotations(destructive_hint = true, open_world_hint = true)
    )]
    async fn submit_pending_review(
        &self,
        Parameters(params): Parameters<SubmitPendingReviewParams>,
    ) -> Result<CallToolResult, McpError> {
        let event = match params.event.to_lowercase().as_str() {
            "approve" => SubmitEvent::Approve,
            "request_changes" => SubmitEvent::RequestChanges,
            _ => SubmitEvent::Comment,
        };

        let client = build_client(&EnvTokenProvider, &self.config.github).map_err(|e| revq_error_to_mcp(&e))?;
        let review = revq_core::github::graphql::submit_pending_review(
            &client,
            &params.review_id,
            event,
            params.body.as_deref().unwrap_or(""),
        )
        .await
        .map_err(|e| revq_error_to_mcp(&e))?;

        Self::json_result(&serde_json::json!({ "success": true, "review": review }))
    }

    #[tool(
        name = "set_policy",
        description = "Replace the active triage policy",
        annotations(idempotent_hint = true)
    )]
    async fn set_policy(
        &self,
        Parameters(params): Parameters<SetPolicyParams>,
    ) -> Result<CallToolResult, McpError> {
        let policy: PolicyConfig = serde_json::from_value(params.policy)
            .map_err(|e| McpError::invalid_params(format!("Invalid policy: {e}"), None))?;

        self.engine.set_policy(policy);
        Self::json_result(&serde_json::json!({ "ok": true }))
    }

    #[tool(
        name = "health",
        description = "Check the health of credentials and local storage",
        annotations(read_only_hint = true, idempotent_hint = true)
    )]
    async fn health(
        &self,
        Parameters(_params): Parameters<HealthCheckParams>,
    ) -> Result<CallToolResult, McpError> {
        use revq_core::TokenProvider;

        let response = HealthCheckResponse {
            status: "ok".to_string(),
            github_token_present: EnvTokenProvider.github_token().is_some(),
            storage_healthy: ThreadStore::at_default_path().health_check(),
        };
        Self::json_result(&response)
    }
}

// ---------------------------------------------------------------------------
// ServerHandler
// ---------------------------------------------------------------------------

#[tool_handler]
impl ServerHandler for RevqServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo::new(ServerCapabilities::builder().enable_tools().build())
            .with_protocol_version(ProtocolVersion::V_2024_11_05)
            .with_server_info(Implementation::from_build_env())
            .with_instructions(
                "revq MCP server for GitHub PR review triage automation. \
                 Tools: classify_actor, classify_comment, triage_event, generate_reply, \
                 smart_reply, apply_actions, map_inline_thread, review_pr, \
                 submit_pending_review, set_policy, health.",
            )
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

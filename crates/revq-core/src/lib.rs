// SPDX-License-Identifier: Apache-2.0

#![warn(missing_docs)]

//! # revq Core
//!
//! Core library for revq - GitHub pull request review triage automation.
//!
//! This crate provides reusable components for:
//! - Actor classification (bot vs. human)
//! - Comment type classification and API dispatch metadata
//! - Conversation-thread analysis and response prioritization
//! - Event triage (labels, replies, check re-runs)
//! - Orchestrated PR review with a prioritized action list
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use revq_core::{ActorClassifier, ThreadAnalyzer, load_config};
//!
//! # fn example() -> revq_core::Result<()> {
//! // Load configuration
//! let config = load_config()?;
//!
//! // Classify an actor
//! let classifier = ActorClassifier::new(&config.bot_patterns())?;
//! let result = classifier.classify("dependabot[bot]", None);
//! println!("{:?}: {}", result.actor_type, result.reason);
//!
//! // Analyze conversation threads
//! let analyzer = ThreadAnalyzer::new(config.bot_patterns(), "review-agent");
//! let threads = analyzer.analyze(&[]);
//! assert!(threads.is_empty());
//! # Ok(())
//! # }
//! ```
//!
//! ## Modules
//!
//! - [`classifier`] - Actor classification
//! - [`comments`] - Comment classification and dispatch metadata
//! - [`threads`] - Conversation-thread analysis
//! - [`triage`] - Event triage engine
//! - [`responder`] - Reply generation and smart-reply routing
//! - [`orchestrator`] - Composed PR review workflow
//! - [`github`] - GitHub API integration
//! - [`actions`] - Action execution
//! - [`config`] - Configuration and policy loading
//! - [`storage`] - Thread-mapping persistence

// ============================================================================
// Authentication
// ============================================================================

pub use auth::TokenProvider;

// ============================================================================
// Error Handling
// ============================================================================

pub use error::RevqError;

/// Convenience Result type for revq operations.
///
/// This is equivalent to `std::result::Result<T, RevqError>`.
pub type Result<T> = std::result::Result<T, RevqError>;

// ============================================================================
// Configuration
// ============================================================================

pub use config::{
    AppConfig, CacheConfig, DEFAULT_BOT_PATTERNS, GitHubConfig, PolicyConfig, config_dir,
    config_file_path, data_dir, load_config, load_policy, merge_policy,
};

// ============================================================================
// Classification
// ============================================================================

pub use classifier::{ActorClassifier, ActorType, Classification};
pub use comments::{CommentMetadata, CommentType, RawComment, classify_comment};

// ============================================================================
// Thread Analysis
// ============================================================================

pub use threads::{ConversationThread, ThreadAnalyzer, ThreadParticipant, priority_threads};

// ============================================================================
// Events and Triage
// ============================================================================

pub use events::{
    Action, ActionResult, ActionType, CommentEvent, Event, PullRequestRef, ReviewEvent,
    ReviewState, StatusEvent, StatusState, TriagedActions,
};
pub use triage::TriageEngine;

// ============================================================================
// Replies
// ============================================================================

pub use responder::{CodeContext, Responder, ReplyRequest, ReplyResponse, ThreadContext, reply_action};

// ============================================================================
// GitHub Integration
// ============================================================================

pub use github::graphql::{PendingComment, PendingReview, PendingReviews, SubmitEvent};
pub use github::pulls::{PrInfo, ReviewSummary};
pub use github::ratelimit::{RateLimitStatus, check_rate_limit};
pub use github::{build_client, parse_owner_repo, parse_pr_reference};

// ============================================================================
// Action Execution
// ============================================================================

pub use actions::ActionExecutor;

// ============================================================================
// Orchestration
// ============================================================================

pub use orchestrator::{
    GitHubSource, Orchestrator, PrReviewResult, PrStatus, PrSummary, Priority, PriorityAction,
    PullRequestSource,
};

// ============================================================================
// Persistence
// ============================================================================

pub use storage::{ThreadMapping, ThreadStore};

// ============================================================================
// Utilities
// ============================================================================

pub use utils::{format_relative_time, truncate, truncate_with_suffix};

// ============================================================================
// Modules
// ============================================================================

pub mod actions;
pub mod auth;
pub mod cache;
pub mod classifier;
pub mod comments;
pub mod config;
pub mod error;
pub mod events;
pub mod github;
pub mod orchestrator;
pub mod responder;
pub mod retry;
pub mod storage;
pub mod threads;
pub mod triage;
pub mod utils;

// SPDX-License-Identifier: Apache-2.0

//! Conversation-thread analysis command.

use anyhow::Result;

use crate::output::ThreadList;
use crate::provider::CliTokenProvider;
use revq_core::github::pulls::{fetch_authenticated_login, fetch_inline_comments};
use revq_core::{AppConfig, ThreadAnalyzer, build_client, parse_pr_reference};

/// Analyzes conversation threads for one PR reference.
pub async fn run(
    reference: &str,
    repo_context: Option<&str>,
    needs_response_only: bool,
    config: &AppConfig,
) -> Result<ThreadList> {
    let pr = parse_pr_reference(reference, repo_context)?;

    let client = build_client(&CliTokenProvider, &config.github)?;
    let login = fetch_authenticated_login(&client).await?;
    let comments = fetch_inline_comments(&client, &pr).await?;

    let analyzer = ThreadAnalyzer::new(config.bot_patterns(), login);
    let mut threads = analyzer.analyze(&comments);

    if needs_response_only {
        threads.retain(|t| t.needs_response);
    }

    Ok(ThreadList(threads))
}

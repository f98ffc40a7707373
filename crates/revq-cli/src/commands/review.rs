// SPDX-License-Identifier: Apache-2.0

//! Full review workflow command.

use anyhow::Result;

use crate::provider::CliTokenProvider;
use revq_core::orchestrator::{GitHubSource, Orchestrator};
use revq_core::{AppConfig, PrReviewResult, build_client, parse_pr_reference};

/// Runs the orchestrated review workflow for one PR reference.
pub async fn run(
    reference: &str,
    repo_context: Option<&str>,
    config: &AppConfig,
) -> Result<PrReviewResult> {
    let pr = parse_pr_reference(reference, repo_context)?;

    let client = build_client(&CliTokenProvider, &config.github)?;
    let orchestrator = Orchestrator::new(GitHubSource::new(client), config.bot_patterns());

    let result = orchestrator.review_pr(&pr).await?;
    Ok(result)
}

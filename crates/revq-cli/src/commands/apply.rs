// SPDX-License-Identifier: Apache-2.0

//! Action application command.

use std::path::Path;

use anyhow::{Context, Result};

use crate::commands::read_input;
use crate::output::ActionResults;
use crate::provider::CliTokenProvider;
use revq_core::{Action, ActionExecutor, AppConfig, build_client};

/// Applies a batch of actions read from a JSON file or stdin.
pub async fn run(file: &Path, dry_run: bool, config: &AppConfig) -> Result<ActionResults> {
    let input = read_input(file)?;
    let actions: Vec<Action> =
        serde_json::from_str(&input).context("Failed to parse actions JSON")?;

    let client = build_client(&CliTokenProvider, &config.github)?;
    let executor = ActionExecutor::new(client, config.dry_run);

    let results = executor.apply(&actions, dry_run).await;
    Ok(ActionResults(results))
}

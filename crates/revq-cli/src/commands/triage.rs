// SPDX-License-Identifier: Apache-2.0

//! Event triage command.

use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};

use crate::commands::read_input;
use revq_core::triage::TriageEngine;
use revq_core::{
    ActorClassifier, AppConfig, Event, PolicyConfig, TriagedActions, load_policy, merge_policy,
};

/// Triages one event read from a JSON file or stdin.
///
/// The base policy comes from the configured `policy_path`; an optional
/// `--policy` file is merged over it for this invocation.
pub fn run(
    event_path: &Path,
    policy_override: Option<&Path>,
    config: &AppConfig,
) -> Result<TriagedActions> {
    let input = read_input(event_path)?;
    let event: Event = serde_json::from_str(&input).context("Failed to parse event JSON")?;

    let base_policy = match &config.policy_path {
        Some(path) => load_policy(path)?,
        None => PolicyConfig::default(),
    };
    let overlay = policy_override.map(load_policy).transpose()?;
    let policy = merge_policy(&base_policy, overlay.as_ref());

    let classifier = Arc::new(ActorClassifier::new(&config.bot_patterns())?);
    let engine = TriageEngine::new(classifier, policy);

    Ok(engine.triage(&event))
}

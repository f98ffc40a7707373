// SPDX-License-Identifier: Apache-2.0

//! Actor classification command.

use std::time::Duration;

use anyhow::Result;

use revq_core::{ActorClassifier, AppConfig, Classification};

/// Classifies one actor by login and optional display name.
pub fn run(login: &str, name: Option<&str>, config: &AppConfig) -> Result<Classification> {
    let classifier = ActorClassifier::with_cache_settings(
        &config.bot_patterns(),
        Duration::from_secs(config.cache.classifier_ttl_seconds),
        config.cache.classifier_capacity,
    )?;

    Ok(classifier.classify(login, name))
}

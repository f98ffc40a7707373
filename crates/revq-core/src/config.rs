// SPDX-License-Identifier: Apache-2.0

//! Configuration management for revq.
//!
//! Provides layered configuration from files and environment variables.
//! Uses XDG-compliant paths with environment variable support.
//!
//! # Configuration Sources (in priority order)
//!
//! 1. Environment variables (prefix: `REVQ_`)
//! 2. Config file: `~/.config/revq/config.toml`
//! 3. Built-in defaults
//!
//! Triage policies (path-prefix label routing, owners, protected paths)
//! live in a separate TOML file referenced by `policy_path` and are loaded
//! with [`load_policy`].
//!
//! # Examples
//!
//! ```bash
//! # Override the REST timeout via environment variable
//! REVQ_GITHUB__API_TIMEOUT_SECONDS=20 revq review 123 --repo owner/repo
//! ```

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use config::{Config, Environment, File};
use serde::Deserialize;

use crate::error::RevqError;

/// Stock bot patterns recognized out of the box.
///
/// Matched case-insensitively as substrings against actor logins and
/// display names. Extend the list via the `bot_actors` config key.
pub const DEFAULT_BOT_PATTERNS: &[&str] = &[
    "dependabot[bot]",
    "github-actions[bot]",
    "renovate[bot]",
    "snyk-bot",
    "semantic-release-bot",
    "codecov[bot]",
    "trivy-bot",
    "amazon-q",
    "cursor",
    "copilot",
    "openai-codex",
    "aider",
    "sweep-ai",
    "codiumai",
    "sonarqube",
    "codeql",
];

/// Application configuration.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// GitHub API settings.
    pub github: GitHubConfig,
    /// Classifier cache settings.
    pub cache: CacheConfig,
    /// Additional bot patterns appended to [`DEFAULT_BOT_PATTERNS`].
    pub bot_actors: Vec<String>,
    /// Report side-effecting actions as no-op successes instead of applying them.
    pub dry_run: bool,
    /// Path to the triage policy file (TOML).
    pub policy_path: Option<PathBuf>,
}

impl AppConfig {
    /// Returns the effective bot pattern list: stock patterns followed by
    /// any configured `bot_actors`, in configured order.
    #[must_use]
    pub fn bot_patterns(&self) -> Vec<String> {
        let mut patterns: Vec<String> = DEFAULT_BOT_PATTERNS
            .iter()
            .map(ToString::to_string)
            .collect();
        patterns.extend(self.bot_actors.iter().cloned());
        patterns
    }
}

/// GitHub API settings.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct GitHubConfig {
    /// REST request timeout in seconds.
    pub api_timeout_seconds: u64,
    /// GraphQL request timeout in seconds.
    pub graphql_timeout_seconds: u64,
}

impl Default for GitHubConfig {
    fn default() -> Self {
        Self {
            api_timeout_seconds: 10,
            graphql_timeout_seconds: 30,
        }
    }
}

/// Classifier cache settings.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    /// Classification cache TTL in seconds.
    pub classifier_ttl_seconds: u64,
    /// Maximum number of cached classifications.
    pub classifier_capacity: usize,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            classifier_ttl_seconds: 300,
            classifier_capacity: 1024,
        }
    }
}

/// Triage policy: path-prefix routing for labels and owners.
///
/// Loaded once and replaced atomically at runtime; triage reads an
/// immutable snapshot per call.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct PolicyConfig {
    /// Path prefix to labels applied when a comment touches that prefix.
    pub labels: HashMap<String, Vec<String>>,
    /// Path prefix to suggested owner logins.
    pub owners: HashMap<String, Vec<String>>,
    /// Path prefixes eligible for automatic approval.
    pub auto_approve_paths: Vec<String>,
    /// Path prefix to required approver logins.
    pub protected_paths: HashMap<String, Vec<String>>,
    /// Response SLA in hours.
    pub sla_hours: u64,
}

impl Default for PolicyConfig {
    fn default() -> Self {
        Self {
            labels: HashMap::new(),
            owners: HashMap::new(),
            auto_approve_paths: Vec::new(),
            protected_paths: HashMap::new(),
            sla_hours: 24,
        }
    }
}

/// Returns the revq configuration directory.
///
/// Respects the `XDG_CONFIG_HOME` environment variable if set,
/// otherwise defaults to `~/.config/revq`.
#[must_use]
pub fn config_dir() -> PathBuf {
    if let Ok(xdg_config) = std::env::var("XDG_CONFIG_HOME")
        && !xdg_config.is_empty()
    {
        return PathBuf::from(xdg_config).join("revq");
    }
    dirs::home_dir()
        .expect("Could not determine home directory - is HOME set?")
        .join(".config")
        .join("revq")
}

/// Returns the revq data directory.
///
/// Respects the `XDG_DATA_HOME` environment variable if set,
/// otherwise defaults to `~/.local/share/revq`.
#[must_use]
pub fn data_dir() -> PathBuf {
    if let Ok(xdg_data) = std::env::var("XDG_DATA_HOME")
        && !xdg_data.is_empty()
    {
        return PathBuf::from(xdg_data).join("revq");
    }
    dirs::home_dir()
        .expect("Could not determine home directory - is HOME set?")
        .join(".local")
        .join("share")
        .join("revq")
}

/// Returns the path to the configuration file.
#[must_use]
pub fn config_file_path() -> PathBuf {
    config_dir().join("config.toml")
}

/// Load application configuration.
///
/// Loads from config file (if exists) and environment variables.
/// Environment variables use the prefix `REVQ_` and double underscore
/// for nested keys (e.g., `REVQ_GITHUB__API_TIMEOUT_SECONDS`).
///
/// # Errors
///
/// Returns `RevqError::Config` if the config file exists but is invalid.
pub fn load_config() -> Result<AppConfig, RevqError> {
    let config_path = config_file_path();

    let config = Config::builder()
        // Load from config file (optional - may not exist)
        .add_source(File::with_name(config_path.to_string_lossy().as_ref()).required(false))
        // Override with environment variables
        .add_source(
            Environment::with_prefix("REVQ")
                .separator("__")
                .try_parsing(true),
        )
        .build()?;

    let app_config: AppConfig = config.try_deserialize()?;

    Ok(app_config)
}

/// Load a triage policy from a TOML file.
///
/// Returns the default (empty) policy if the file does not exist.
///
/// # Errors
///
/// Returns `RevqError::Config` if the file exists but cannot be parsed.
pub fn load_policy(path: &Path) -> Result<PolicyConfig, RevqError> {
    if !path.exists() {
        return Ok(PolicyConfig::default());
    }

    let config = Config::builder()
        .add_source(File::from(path))
        .build()?;

    let policy: PolicyConfig = config.try_deserialize()?;

    Ok(policy)
}

/// Merge a policy override into a base policy.
///
/// Map entries are unioned (override values appended per key); list
/// entries are concatenated; `sla_hours` takes the override value when
/// non-zero.
#[must_use]
pub fn merge_policy(base: &PolicyConfig, overlay: Option<&PolicyConfig>) -> PolicyConfig {
    let Some(overlay) = overlay else {
        return base.clone();
    };

    let mut merged = base.clone();
    for (key, values) in &overlay.labels {
        merged
            .labels
            .entry(key.clone())
            .or_default()
            .extend(values.iter().cloned());
    }
    for (key, values) in &overlay.owners {
        merged
            .owners
            .entry(key.clone())
            .or_default()
            .extend(values.iter().cloned());
    }
    for (key, values) in &overlay.protected_paths {
        merged
            .protected_paths
            .entry(key.clone())
            .or_default()
            .extend(values.iter().cloned());
    }
    merged
        .auto_approve_paths
        .extend(overlay.auto_approve_paths.iter().cloned());
    if overlay.sla_hours != 0 {
        merged.sla_hours = overlay.sla_hours;
    }
    merged
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    #[test]
    #[serial]
    fn test_load_config_defaults() {
        // Without any config file or env vars, should return defaults
        let config = load_config().expect("should load with defaults");

        assert_eq!(config.github.api_timeout_seconds, 10);
        assert_eq!(config.github.graphql_timeout_seconds, 30);
        assert_eq!(config.cache.classifier_ttl_seconds, 300);
        assert_eq!(config.cache.classifier_capacity, 1024);
        assert!(!config.dry_run);
        assert!(config.bot_actors.is_empty());
        assert!(config.policy_path.is_none());
    }

    #[test]
    fn test_bot_patterns_include_defaults_and_extras() {
        let config = AppConfig {
            bot_actors: vec!["acme-ci".to_string()],
            ..AppConfig::default()
        };

        let patterns = config.bot_patterns();
        assert!(patterns.iter().any(|p| p == "dependabot[bot]"));
        assert_eq!(patterns.last().map(String::as_str), Some("acme-ci"));
        assert_eq!(patterns.len(), DEFAULT_BOT_PATTERNS.len() + 1);
    }

    #[test]
    fn test_config_dir_ends_with_revq() {
        let dir = config_dir();
        assert!(dir.ends_with("revq"));
    }

    #[test]
    fn test_config_file_path() {
        let path = config_file_path();
        assert!(path.ends_with("config.toml"));
    }

    #[test]
    fn test_load_policy_missing_file_returns_default() {
        let policy = load_policy(Path::new("/nonexistent/policy.toml")).unwrap();
        assert!(policy.labels.is_empty());
        assert_eq!(policy.sla_hours, 24);
    }

    #[test]
    fn test_load_policy_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("policy.toml");
        std::fs::write(
            &path,
            r#"
sla_hours = 8

[labels]
"src/api/" = ["backend", "api"]

[owners]
"docs/" = ["docs-team"]
"#,
        )
        .unwrap();

        let policy = load_policy(&path).unwrap();
        assert_eq!(policy.sla_hours, 8);
        assert_eq!(
            policy.labels.get("src/api/"),
            Some(&vec!["backend".to_string(), "api".to_string()])
        );
        assert_eq!(
            policy.owners.get("docs/"),
            Some(&vec!["docs-team".to_string()])
        );
    }

    #[test]
    fn test_load_policy_malformed_file_is_config_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("policy.toml");
        std::fs::write(&path, "labels = \"not a table\"\n").unwrap();

        let result = load_policy(&path);
        assert!(matches!(result, Err(RevqError::Config { .. })));
    }

    #[test]
    fn test_merge_policy_none_returns_base() {
        let mut base = PolicyConfig::default();
        base.labels
            .insert("src/".to_string(), vec!["core".to_string()]);

        let merged = merge_policy(&base, None);
        assert_eq!(merged.labels.get("src/"), Some(&vec!["core".to_string()]));
    }

    #[test]
    fn test_merge_policy_unions_labels() {
        let mut base = PolicyConfig::default();
        base.labels
            .insert("src/".to_string(), vec!["core".to_string()]);

        let mut overlay = PolicyConfig::default();
        overlay
            .labels
            .insert("src/".to_string(), vec!["extra".to_string()]);
        overlay
            .labels
            .insert("docs/".to_string(), vec!["docs".to_string()]);
        overlay.sla_hours = 4;

        let merged = merge_policy(&base, Some(&overlay));
        assert_eq!(
            merged.labels.get("src/"),
            Some(&vec!["core".to_string(), "extra".to_string()])
        );
        assert_eq!(merged.labels.get("docs/"), Some(&vec!["docs".to_string()]));
        assert_eq!(merged.sla_hours, 4);
    }

    #[test]
    fn test_merge_policy_zero_sla_keeps_base() {
        let base = PolicyConfig {
            sla_hours: 48,
            ..PolicyConfig::default()
        };
        let overlay = PolicyConfig {
            sla_hours: 0,
            ..PolicyConfig::default()
        };

        let merged = merge_policy(&base, Some(&overlay));
        assert_eq!(merged.sla_hours, 48);
    }
}

// SPDX-License-Identifier: Apache-2.0

//! Deterministic bot/human classification for GitHub actors.
//!
//! Classification is a pure function of (login, display name, configured
//! pattern set): suffix rules first, then configured patterns against the
//! login, then against the display name. Results are cached with a
//! time-bounded TTL purely as a performance optimization.

use std::time::Duration;

use regex::{Regex, RegexBuilder};
use serde::{Deserialize, Serialize};

use crate::cache::TtlCache;
use crate::error::RevqError;

/// Default TTL for cached classifications.
const DEFAULT_CACHE_TTL: Duration = Duration::from_secs(300);

/// Default capacity of the classification cache.
const DEFAULT_CACHE_CAPACITY: usize = 1024;

/// Kind of actor interacting with a pull request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ActorType {
    /// Automated actor (CI, dependency updater, code assistant, ...).
    Bot,
    /// Human actor.
    Human,
}

/// Result of classifying an actor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Classification {
    /// Whether the actor is a bot or a human.
    pub actor_type: ActorType,
    /// Why the classification fired.
    pub reason: String,
    /// Which rule matched, if any. `"suffix"` for the built-in suffix
    /// rules, otherwise the source text of the matching pattern.
    pub matched_rule: Option<String>,
}

/// Deterministic classifier for actors.
///
/// Owns its compiled pattern set and cache; construct once at startup and
/// share by reference. Malformed patterns fail here, never at classify time.
#[derive(Debug)]
pub struct ActorClassifier {
    patterns: Vec<Regex>,
    cache: TtlCache<Classification>,
}

impl ActorClassifier {
    /// Create a classifier with default cache settings (300 s TTL, 1024 entries).
    ///
    /// # Errors
    ///
    /// Returns `RevqError::Config` if any pattern fails to compile.
    pub fn new(patterns: &[String]) -> Result<Self, RevqError> {
        Self::with_cache_settings(patterns, DEFAULT_CACHE_TTL, DEFAULT_CACHE_CAPACITY)
    }

    /// Create a classifier with explicit cache settings.
    ///
    /// # Arguments
    ///
    /// * `patterns` - Bot patterns, matched case-insensitively as
    ///   unanchored regexes, in configured order
    /// * `ttl` - Classification cache TTL
    /// * `capacity` - Classification cache capacity
    ///
    /// # Errors
    ///
    /// Returns `RevqError::Config` if any pattern fails to compile.
    pub fn with_cache_settings(
        patterns: &[String],
        ttl: Duration,
        capacity: usize,
    ) -> Result<Self, RevqError> {
        let compiled = patterns
            .iter()
            .map(|pattern| {
                RegexBuilder::new(pattern)
                    .case_insensitive(true)
                    .build()
                    .map_err(|e| RevqError::Config {
                        message: format!("invalid bot pattern '{pattern}': {e}"),
                    })
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            patterns: compiled,
            cache: TtlCache::new(ttl, capacity),
        })
    }

    /// Classify an actor by login and optional display name.
    ///
    /// Rules in strict priority order, first match wins:
    /// 1. Login ends with `[bot]` (case-insensitive)
    /// 2. Login ends with `-bot` (case-insensitive)
    /// 3. Login matches a configured pattern
    /// 4. Display name matches a configured pattern
    /// 5. Otherwise human
    pub fn classify(&self, login: &str, name: Option<&str>) -> Classification {
        let cache_key = format!("{login}:{}", name.unwrap_or(""));
        if let Some(cached) = self.cache.get(&cache_key) {
            return cached;
        }

        let result = self.classify_uncached(login, name);
        self.cache.insert(cache_key, result.clone());
        result
    }

    fn classify_uncached(&self, login: &str, name: Option<&str>) -> Classification {
        let normalized = login.to_lowercase();

        if normalized.ends_with("[bot]") {
            return Classification {
                actor_type: ActorType::Bot,
                reason: "[bot] suffix".to_string(),
                matched_rule: Some("suffix".to_string()),
            };
        }

        if normalized.ends_with("-bot") {
            return Classification {
                actor_type: ActorType::Bot,
                reason: "-bot suffix".to_string(),
                matched_rule: Some("suffix".to_string()),
            };
        }

        if let Some(pattern) = self.patterns.iter().find(|p| p.is_match(login)) {
            return Classification {
                actor_type: ActorType::Bot,
                reason: "matched configured pattern".to_string(),
                matched_rule: Some(pattern.as_str().to_string()),
            };
        }

        if let Some(name) = name
            && let Some(pattern) = self.patterns.iter().find(|p| p.is_match(name))
        {
            return Classification {
                actor_type: ActorType::Bot,
                reason: "matched name pattern".to_string(),
                matched_rule: Some(pattern.as_str().to_string()),
            };
        }

        Classification {
            actor_type: ActorType::Human,
            reason: "no bot pattern matched".to_string(),
            matched_rule: None,
        }
    }
}

/// Substring check used where a full classifier would be overkill.
///
/// Matches the pattern list case-insensitively against the login. This is
/// the flat rule set used by thread analysis, intentionally decoupled from
/// [`ActorClassifier`]'s cache and suffix rules.
#[must_use]
pub fn login_matches_patterns(login: &str, patterns: &[String]) -> bool {
    let login_lower = login.to_lowercase();
    patterns
        .iter()
        .any(|pattern| login_lower.contains(&pattern.to_lowercase()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DEFAULT_BOT_PATTERNS;

    fn default_patterns() -> Vec<String> {
        DEFAULT_BOT_PATTERNS.iter().map(ToString::to_string).collect()
    }

    fn classifier() -> ActorClassifier {
        ActorClassifier::new(&default_patterns()).expect("default patterns compile")
    }

    #[test]
    fn test_bracket_bot_suffix() {
        let result = classifier().classify("dependabot[bot]", None);
        assert_eq!(result.actor_type, ActorType::Bot);
        assert_eq!(result.reason, "[bot] suffix");
        assert_eq!(result.matched_rule.as_deref(), Some("suffix"));
    }

    #[test]
    fn test_bracket_bot_suffix_case_insensitive() {
        let result = classifier().classify("Dependabot[BOT]", None);
        assert_eq!(result.actor_type, ActorType::Bot);
        assert_eq!(result.matched_rule.as_deref(), Some("suffix"));
    }

    #[test]
    fn test_dash_bot_suffix() {
        let result = classifier().classify("snyk-bot", None);
        assert_eq!(result.actor_type, ActorType::Bot);
        assert_eq!(result.reason, "-bot suffix");
        assert_eq!(result.matched_rule.as_deref(), Some("suffix"));
    }

    #[test]
    fn test_suffix_wins_regardless_of_patterns() {
        // Empty pattern list - suffix rules still fire
        let classifier = ActorClassifier::new(&[]).unwrap();
        assert_eq!(
            classifier.classify("release-bot", None).actor_type,
            ActorType::Bot
        );
        assert_eq!(
            classifier.classify("ci[bot]", None).actor_type,
            ActorType::Bot
        );
    }

    #[test]
    fn test_configured_pattern_match() {
        let result = classifier().classify("github-copilot", None);
        assert_eq!(result.actor_type, ActorType::Bot);
        assert_eq!(result.reason, "matched configured pattern");
        assert_eq!(result.matched_rule.as_deref(), Some("copilot"));
    }

    #[test]
    fn test_name_pattern_match() {
        let result = classifier().classify("helper-account", Some("Aider Assistant"));
        assert_eq!(result.actor_type, ActorType::Bot);
        assert_eq!(result.reason, "matched name pattern");
        assert_eq!(result.matched_rule.as_deref(), Some("aider"));
    }

    #[test]
    fn test_human_fallback() {
        let result = classifier().classify("alice", Some("Alice Smith"));
        assert_eq!(result.actor_type, ActorType::Human);
        assert_eq!(result.reason, "no bot pattern matched");
        assert_eq!(result.matched_rule, None);
    }

    #[test]
    fn test_classify_is_deterministic() {
        let classifier = classifier();
        let first = classifier.classify("alice", Some("Alice"));
        let second = classifier.classify("alice", Some("Alice"));
        assert_eq!(first, second);

        // Cache disabled (zero TTL) must not change results
        let uncached =
            ActorClassifier::with_cache_settings(&default_patterns(), Duration::ZERO, 16).unwrap();
        assert_eq!(uncached.classify("alice", Some("Alice")), first);
    }

    #[test]
    fn test_malformed_pattern_fails_at_construction() {
        let result = ActorClassifier::new(&["[unclosed".to_string()]);
        assert!(matches!(result, Err(RevqError::Config { .. })));
    }

    #[test]
    fn test_login_matches_patterns() {
        let patterns = vec!["renovate".to_string()];
        assert!(login_matches_patterns("Renovate-Helper", &patterns));
        assert!(!login_matches_patterns("alice", &patterns));
    }

    #[test]
    fn test_actor_type_serializes_lowercase() {
        assert_eq!(serde_json::to_string(&ActorType::Bot).unwrap(), "\"bot\"");
        assert_eq!(
            serde_json::to_string(&ActorType::Human).unwrap(),
            "\"human\""
        );
    }
}

// SPDX-License-Identifier: Apache-2.0

//! Local persistence of review-comment to thread-id mappings.
//!
//! Stores mappings in a JSON file (default `~/.local/share/revq/threads.json`).
//! Generated thread ids are deterministic (`thread-{comment_id}`) so that
//! re-mapping the same comment is idempotent. Writes go through a temp file
//! and rename to avoid torn files.

use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::config::data_dir;
use crate::error::RevqError;

/// A persisted mapping from a review comment to its generated thread id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ThreadMapping {
    /// Generated thread identifier.
    pub thread_id: String,
    /// File the comment is anchored to.
    pub file: String,
    /// Line the comment is anchored to.
    pub line: u64,
    /// Commit the comment was made against.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub commit_id: Option<String>,
    /// When the mapping was created.
    pub created_at: DateTime<Utc>,
}

/// Container for all persisted mappings, keyed by review comment id.
#[derive(Debug, Default, Serialize, Deserialize)]
struct ThreadStoreData {
    threads: HashMap<String, ThreadMapping>,
}

/// JSON-file-backed store of thread mappings.
#[derive(Debug)]
pub struct ThreadStore {
    path: PathBuf,
}

impl ThreadStore {
    /// Create a store backed by the given file path.
    #[must_use]
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    /// Create a store at the default location under the data directory.
    #[must_use]
    pub fn at_default_path() -> Self {
        Self::new(data_dir().join("threads.json"))
    }

    /// Map a review comment to a thread id, creating the mapping if needed.
    ///
    /// Returns the existing thread id when the comment was mapped before,
    /// otherwise generates `thread-{review_comment_id}` and persists it.
    ///
    /// # Errors
    ///
    /// Returns `RevqError::Storage` if the store cannot be read or written.
    pub fn map_thread(
        &self,
        review_comment_id: &str,
        file: &str,
        line: u64,
        commit_id: Option<&str>,
    ) -> Result<String, RevqError> {
        let mut data = self.load()?;

        if let Some(existing) = data.threads.get(review_comment_id) {
            return Ok(existing.thread_id.clone());
        }

        let thread_id = format!("thread-{review_comment_id}");
        data.threads.insert(
            review_comment_id.to_string(),
            ThreadMapping {
                thread_id: thread_id.clone(),
                file: file.to_string(),
                line,
                commit_id: commit_id.map(ToString::to_string),
                created_at: Utc::now(),
            },
        );
        self.save(&data)?;

        Ok(thread_id)
    }

    /// Look up the thread id for a review comment.
    ///
    /// # Errors
    ///
    /// Returns `RevqError::Storage` if the store cannot be read.
    pub fn lookup(&self, review_comment_id: &str) -> Result<Option<String>, RevqError> {
        let data = self.load()?;
        Ok(data
            .threads
            .get(review_comment_id)
            .map(|m| m.thread_id.clone()))
    }

    /// Returns `true` if the backing file is readable (or absent).
    #[must_use]
    pub fn health_check(&self) -> bool {
        self.load().is_ok()
    }

    fn load(&self) -> Result<ThreadStoreData, RevqError> {
        if !self.path.exists() {
            return Ok(ThreadStoreData::default());
        }

        let contents = fs::read_to_string(&self.path).map_err(|e| RevqError::Storage {
            message: format!("Failed to read {}: {e}", self.path.display()),
        })?;

        serde_json::from_str(&contents).map_err(|e| RevqError::Storage {
            message: format!("Failed to parse {}: {e}", self.path.display()),
        })
    }

    fn save(&self, data: &ThreadStoreData) -> Result<(), RevqError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).map_err(|e| RevqError::Storage {
                message: format!("Failed to create {}: {e}", parent.display()),
            })?;
        }

        let contents = serde_json::to_string_pretty(data).map_err(|e| RevqError::Storage {
            message: format!("Failed to serialize thread mappings: {e}"),
        })?;

        // Atomic write: write to temp file, then rename
        let temp_path = self.path.with_extension("tmp");
        fs::write(&temp_path, contents).map_err(|e| RevqError::Storage {
            message: format!("Failed to write {}: {e}", temp_path.display()),
        })?;
        fs::rename(&temp_path, &self.path).map_err(|e| RevqError::Storage {
            message: format!("Failed to rename {}: {e}", self.path.display()),
        })?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store() -> (tempfile::TempDir, ThreadStore) {
        let dir = tempfile::tempdir().unwrap();
        let store = ThreadStore::new(dir.path().join("threads.json"));
        (dir, store)
    }

    #[test]
    fn test_map_thread_generates_deterministic_id() {
        let (_dir, store) = store();

        let id = store.map_thread("12345", "src/lib.rs", 4, None).unwrap();
        assert_eq!(id, "thread-12345");
    }

    #[test]
    fn test_map_thread_is_idempotent() {
        let (_dir, store) = store();

        let first = store
            .map_thread("12345", "src/lib.rs", 4, Some("abc"))
            .unwrap();
        let second = store.map_thread("12345", "other.rs", 9, None).unwrap();

        assert_eq!(first, second);
        // The original mapping is preserved
        assert_eq!(store.lookup("12345").unwrap(), Some(first));
    }

    #[test]
    fn test_lookup_missing_returns_none() {
        let (_dir, store) = store();
        assert_eq!(store.lookup("99").unwrap(), None);
    }

    #[test]
    fn test_mappings_persist_across_store_instances() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("threads.json");

        let store = ThreadStore::new(path.clone());
        store.map_thread("7", "a.rs", 1, None).unwrap();

        let reopened = ThreadStore::new(path);
        assert_eq!(reopened.lookup("7").unwrap(), Some("thread-7".to_string()));
    }

    #[test]
    fn test_health_check_on_missing_file() {
        let (_dir, store) = store();
        assert!(store.health_check());
    }

    #[test]
    fn test_health_check_on_corrupt_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("threads.json");
        fs::write(&path, "not json").unwrap();

        let store = ThreadStore::new(path);
        assert!(!store.health_check());
    }
}

// SPDX-License-Identifier: Apache-2.0

//! Conversation-thread analysis for smart comment prioritization.
//!
//! Groups a flat list of inline comments into threads by walking reply
//! chains to their root comment, then derives per-thread conversation
//! state: who participates, when the thread last moved, and whether the
//! authenticated actor still owes a response.

use std::collections::{BTreeMap, HashMap, HashSet};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::classifier::login_matches_patterns;
use crate::comments::RawComment;

/// Per-actor aggregate within one thread.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ThreadParticipant {
    /// Participant login.
    pub login: String,
    /// Whether the login matches the configured bot pattern list.
    pub is_bot: bool,
    /// Whether the participant is the authenticated actor.
    pub is_self: bool,
    /// Number of comments by this participant in the thread.
    pub comment_count: usize,
    /// Timestamp of the participant's most recent comment.
    pub last_comment_at: DateTime<Utc>,
}

/// A root comment plus its full reply chain, grouped by code location.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConversationThread {
    /// Thread identity: `path:line:id` of the root comment.
    pub thread_id: String,
    /// File path of the root comment ("unknown" when absent).
    pub path: String,
    /// Line number of the root comment (0 when absent).
    pub line: u64,
    /// Member comments in chronological order.
    pub comments: Vec<RawComment>,
    /// Participant roster in first-appearance order.
    pub participants: Vec<ThreadParticipant>,
    /// Number of comments in the thread.
    pub total_comments: usize,
    /// Timestamp of the chronologically last comment.
    pub last_activity: DateTime<Utc>,
    /// Whether the authenticated actor owes a response.
    pub needs_response: bool,
    /// Id of the most recent comment not authored by the authenticated actor.
    pub last_external_comment_id: Option<u64>,
    /// Id of the most recent comment authored by the authenticated actor.
    pub own_last_response_id: Option<u64>,
}

/// Analyzes comment threads to prioritize responses.
///
/// Bot detection here uses the flat pattern list only (substring,
/// case-insensitive), not the full suffix-rule classifier: thread
/// analysis must not depend on classification caching or timing.
/// Response suppression is self-only: automated replies from other
/// identities never mark a thread as answered.
#[derive(Debug)]
pub struct ThreadAnalyzer {
    bot_patterns: Vec<String>,
    self_login: String,
}

impl ThreadAnalyzer {
    /// Create a new analyzer.
    ///
    /// # Arguments
    ///
    /// * `bot_patterns` - Flat pattern list for participant bot flags
    /// * `self_login` - Login of the authenticated actor
    #[must_use]
    pub fn new(bot_patterns: Vec<String>, self_login: impl Into<String>) -> Self {
        Self {
            bot_patterns,
            self_login: self_login.into(),
        }
    }

    /// Group comments into threads and analyze conversation state.
    ///
    /// Returns threads ordered with `needs_response` first, ties broken by
    /// descending `last_activity`.
    #[must_use]
    pub fn analyze(&self, comments: &[RawComment]) -> Vec<ConversationThread> {
        let by_id: HashMap<u64, &RawComment> = comments.iter().map(|c| (c.id, c)).collect();

        let mut groups: BTreeMap<String, Vec<RawComment>> = BTreeMap::new();
        for comment in comments {
            let root = resolve_root(comment, &by_id);
            let key = format!(
                "{}:{}:{}",
                root.path.as_deref().unwrap_or("unknown"),
                root.line.unwrap_or(0),
                root.id
            );
            groups.entry(key).or_default().push(comment.clone());
        }

        let mut threads: Vec<ConversationThread> = groups
            .into_iter()
            .map(|(key, members)| self.analyze_thread(key, members))
            .collect();

        threads.sort_by(|a, b| {
            b.needs_response
                .cmp(&a.needs_response)
                .then(b.last_activity.cmp(&a.last_activity))
        });

        threads
    }

    fn analyze_thread(&self, thread_id: String, mut comments: Vec<RawComment>) -> ConversationThread {
        comments.sort_by_key(|c| c.created_at);

        let first = &comments[0];
        let path = first.path.clone().unwrap_or_else(|| "unknown".to_string());
        let line = first.line.unwrap_or(0);

        let participants = self.analyze_participants(&comments);

        let last = comments.last().expect("thread has at least one comment");
        let last_activity = last.created_at;
        let last_author_is_self = last.author_login == self.self_login;

        let own_last_response = comments
            .iter()
            .rev()
            .find(|c| c.author_login == self.self_login);
        let last_external_comment = comments
            .iter()
            .rev()
            .find(|c| c.author_login != self.self_login);

        // Response needed iff the last word belongs to someone else and no
        // own reply postdates it.
        let needs_response = !last_author_is_self
            && match (own_last_response, last_external_comment) {
                (None, _) => true,
                (Some(_), None) => false,
                (Some(own), Some(external)) => external.created_at > own.created_at,
            };

        ConversationThread {
            thread_id,
            path,
            line,
            total_comments: comments.len(),
            participants,
            last_activity,
            needs_response,
            last_external_comment_id: last_external_comment.map(|c| c.id),
            own_last_response_id: own_last_response.map(|c| c.id),
            comments,
        }
    }

    fn analyze_participants(&self, comments: &[RawComment]) -> Vec<ThreadParticipant> {
        let mut participants: Vec<ThreadParticipant> = Vec::new();

        for comment in comments {
            if let Some(existing) = participants
                .iter_mut()
                .find(|p| p.login == comment.author_login)
            {
                existing.comment_count += 1;
                if comment.created_at > existing.last_comment_at {
                    existing.last_comment_at = comment.created_at;
                }
            } else {
                participants.push(ThreadParticipant {
                    login: comment.author_login.clone(),
                    is_bot: login_matches_patterns(&comment.author_login, &self.bot_patterns),
                    is_self: comment.author_login == self.self_login,
                    comment_count: 1,
                    last_comment_at: comment.created_at,
                });
            }
        }

        participants
    }
}

/// Filters to threads needing a response, preserving incoming order,
/// truncated to `limit`.
#[must_use]
pub fn priority_threads(threads: &[ConversationThread], limit: usize) -> Vec<ConversationThread> {
    threads
        .iter()
        .filter(|t| t.needs_response)
        .take(limit)
        .cloned()
        .collect()
}

/// Walks the reply chain to the root comment.
///
/// Terminates on a comment without a reply target, on a parent missing
/// from the input set (partial data - the deepest reachable ancestor is
/// taken as root), or on a cycle (the starting comment is taken as root).
fn resolve_root<'a>(
    comment: &'a RawComment,
    by_id: &HashMap<u64, &'a RawComment>,
) -> &'a RawComment {
    let mut current = comment;
    let mut visited: HashSet<u64> = HashSet::new();
    visited.insert(current.id);

    while let Some(parent_id) = current.in_reply_to_id {
        if visited.contains(&parent_id) {
            // Malformed reply graph
            return comment;
        }
        match by_id.get(&parent_id) {
            Some(parent) => {
                visited.insert(parent.id);
                current = parent;
            }
            None => break,
        }
    }

    current
}

#[cfg(test)]
mod tests {
    use super::*;

    fn comment(id: u64, author: &str, created_at: &str) -> RawComment {
        RawComment {
            id,
            author_login: author.to_string(),
            body: format!("comment {id}"),
            created_at: created_at.parse().unwrap(),
            path: Some("a.py".to_string()),
            line: Some(5),
            original_line: None,
            diff_hunk: Some("@@ -1,2 +1,3 @@".to_string()),
            in_reply_to_id: None,
            commit_id: None,
        }
    }

    fn reply(id: u64, author: &str, created_at: &str, parent: u64) -> RawComment {
        RawComment {
            in_reply_to_id: Some(parent),
            ..comment(id, author, created_at)
        }
    }

    fn analyzer() -> ThreadAnalyzer {
        ThreadAnalyzer::new(vec!["dependabot".to_string()], "bot-agent")
    }

    #[test]
    fn test_reply_chain_resolves_to_root_key() {
        let comments = vec![
            comment(1, "alice", "2024-01-01T00:00:00Z"),
            reply(2, "bob", "2024-01-02T00:00:00Z", 1),
            reply(3, "alice", "2024-01-03T00:00:00Z", 2),
        ];

        let threads = analyzer().analyze(&comments);
        assert_eq!(threads.len(), 1);
        assert_eq!(threads[0].thread_id, "a.py:5:1");
        assert_eq!(threads[0].total_comments, 3);
    }

    #[test]
    fn test_separate_roots_form_separate_threads() {
        let comments = vec![
            comment(1, "alice", "2024-01-01T00:00:00Z"),
            comment(10, "bob", "2024-01-02T00:00:00Z"),
        ];

        let threads = analyzer().analyze(&comments);
        assert_eq!(threads.len(), 2);
    }

    #[test]
    fn test_missing_parent_falls_back_to_deepest_ancestor() {
        // Parent 99 is not in the input set; the reply becomes its own root
        let comments = vec![reply(2, "bob", "2024-01-02T00:00:00Z", 99)];

        let threads = analyzer().analyze(&comments);
        assert_eq!(threads.len(), 1);
        assert_eq!(threads[0].thread_id, "a.py:5:2");
    }

    #[test]
    fn test_cyclic_reply_chain_terminates() {
        let comments = vec![
            reply(1, "alice", "2024-01-01T00:00:00Z", 2),
            reply(2, "bob", "2024-01-02T00:00:00Z", 1),
        ];

        // Must not hang; every comment lands in some thread
        let threads = analyzer().analyze(&comments);
        let total: usize = threads.iter().map(|t| t.total_comments).sum();
        assert_eq!(total, 2);
    }

    #[test]
    fn test_single_external_comment_needs_response() {
        let comments = vec![comment(1, "alice", "2024-01-01T00:00:00Z")];

        let threads = analyzer().analyze(&comments);
        assert_eq!(threads.len(), 1);
        assert!(threads[0].needs_response);
        assert_eq!(threads[0].last_external_comment_id, Some(1));
        assert_eq!(threads[0].own_last_response_id, None);
    }

    #[test]
    fn test_own_reply_suppresses_needs_response() {
        let comments = vec![
            comment(1, "alice", "2024-01-01T00:00:00Z"),
            reply(2, "bot-agent", "2024-01-02T00:00:00Z", 1),
        ];

        let threads = analyzer().analyze(&comments);
        assert!(!threads[0].needs_response);
        assert_eq!(threads[0].own_last_response_id, Some(2));
        assert_eq!(threads[0].last_external_comment_id, Some(1));
    }

    #[test]
    fn test_later_external_comment_reactivates_thread() {
        let comments = vec![
            comment(1, "alice", "2024-01-01T00:00:00Z"),
            reply(2, "bot-agent", "2024-01-02T00:00:00Z", 1),
            reply(3, "alice", "2024-01-03T00:00:00Z", 2),
        ];

        let threads = analyzer().analyze(&comments);
        assert!(threads[0].needs_response);
        assert_eq!(threads[0].last_external_comment_id, Some(3));
        assert_eq!(threads[0].own_last_response_id, Some(2));
    }

    #[test]
    fn test_other_bots_count_as_external() {
        // Only the authenticated identity suppresses the flag
        let comments = vec![
            comment(1, "alice", "2024-01-01T00:00:00Z"),
            reply(2, "dependabot[bot]", "2024-01-02T00:00:00Z", 1),
        ];

        let threads = analyzer().analyze(&comments);
        assert!(threads[0].needs_response);
        assert_eq!(threads[0].last_external_comment_id, Some(2));
    }

    #[test]
    fn test_participant_roster_aggregates() {
        let comments = vec![
            comment(1, "alice", "2024-01-01T00:00:00Z"),
            reply(2, "bot-agent", "2024-01-02T00:00:00Z", 1),
            reply(3, "alice", "2024-01-03T00:00:00Z", 2),
        ];

        let threads = analyzer().analyze(&comments);
        let participants = &threads[0].participants;
        assert_eq!(participants.len(), 2);

        // First-appearance order
        assert_eq!(participants[0].login, "alice");
        assert_eq!(participants[0].comment_count, 2);
        assert_eq!(
            participants[0].last_comment_at,
            "2024-01-03T00:00:00Z".parse::<DateTime<Utc>>().unwrap()
        );
        assert!(!participants[0].is_self);

        assert_eq!(participants[1].login, "bot-agent");
        assert!(participants[1].is_self);
    }

    #[test]
    fn test_participant_bot_flag_uses_pattern_list() {
        let comments = vec![comment(1, "dependabot[bot]", "2024-01-01T00:00:00Z")];

        let threads = analyzer().analyze(&comments);
        assert!(threads[0].participants[0].is_bot);
    }

    #[test]
    fn test_threads_needing_response_sort_first() {
        let mut answered_root = comment(10, "alice", "2024-01-05T00:00:00Z");
        answered_root.line = Some(9);
        let comments = vec![
            // Answered thread with newer activity
            answered_root,
            reply(11, "bot-agent", "2024-01-06T00:00:00Z", 10),
            // Unanswered thread with older activity
            comment(1, "bob", "2024-01-01T00:00:00Z"),
        ];

        let threads = analyzer().analyze(&comments);
        assert_eq!(threads.len(), 2);
        assert!(threads[0].needs_response);
        assert_eq!(threads[0].thread_id, "a.py:5:1");
        assert!(!threads[1].needs_response);
    }

    #[test]
    fn test_ties_broken_by_descending_activity() {
        let mut second = comment(2, "bob", "2024-01-02T00:00:00Z");
        second.line = Some(6);
        let comments = vec![comment(1, "alice", "2024-01-01T00:00:00Z"), second];

        let threads = analyzer().analyze(&comments);
        assert_eq!(threads[0].thread_id, "a.py:6:2");
        assert_eq!(threads[1].thread_id, "a.py:5:1");
    }

    #[test]
    fn test_priority_threads_filters_and_truncates() {
        let comments: Vec<RawComment> = (1..=4)
            .map(|i| {
                let mut c = comment(i, "alice", "2024-01-01T00:00:00Z");
                c.line = Some(i);
                c
            })
            .collect();

        let mut threads = analyzer().analyze(&comments);
        // Mark one thread as answered
        threads[3].needs_response = false;

        let priority = priority_threads(&threads, 2);
        assert_eq!(priority.len(), 2);
        assert!(priority.iter().all(|t| t.needs_response));

        let all = priority_threads(&threads, 10);
        assert_eq!(all.len(), 3);
    }

    #[test]
    fn test_comments_sorted_chronologically() {
        let comments = vec![
            reply(3, "alice", "2024-01-03T00:00:00Z", 1),
            comment(1, "alice", "2024-01-01T00:00:00Z"),
            reply(2, "bob", "2024-01-02T00:00:00Z", 1),
        ];

        let threads = analyzer().analyze(&comments);
        let ids: Vec<u64> = threads[0].comments.iter().map(|c| c.id).collect();
        assert_eq!(ids, vec![1, 2, 3]);
    }
}

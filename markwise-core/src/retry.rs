//! Retry tracking for partially correct answers.
//!
//! Each `(session, question)` pair earns at most one retry. The decision and
//! the counter update happen under a single write lock so two concurrent
//! submissions for the same key cannot both be granted a retry.

use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, TimeDelta, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;
use tracing::{debug, warn};

use crate::evaluation::FeedbackCategory;

/// Maximum retries granted per key.
pub const MAX_RETRIES: u8 = 1;

/// Identifies one learner's attempts at one question.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RetryKey {
    pub session_id: String,
    pub question_id: String,
}

impl RetryKey {
    pub fn new(session_id: impl Into<String>, question_id: impl Into<String>) -> Self {
        Self {
            session_id: session_id.into(),
            question_id: question_id.into(),
        }
    }

    /// Key for a request, substituting a shared fallback session when the
    /// client sent none. Learners without a session id share retry state.
    pub fn resolve(session_id: Option<&str>, question_id: &str) -> Self {
        match session_id.map(str::trim).filter(|s| !s.is_empty()) {
            Some(session) => Self::new(session, question_id),
            None => {
                warn!(
                    question_id,
                    "No session id supplied; retry state is shared across clients"
                );
                Self::new(format!("fallback:{question_id}"), question_id)
            }
        }
    }
}

impl std::fmt::Display for RetryKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.session_id, self.question_id)
    }
}

/// Stored attempt count for a key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryEntry {
    pub attempts: u8,
    pub touched_at: DateTime<Utc>,
}

/// Outcome of [`RetryStore::apply`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryDecision {
    pub grant_retry: bool,
    pub attempts: u8,
}

/// Storage for per-key retry counters.
#[async_trait]
pub trait RetryStore: Send + Sync {
    /// Current attempt count for `key` (zero when unseen).
    async fn attempts(&self, key: &RetryKey) -> u8;

    /// Record a graded answer and decide whether it earns a retry.
    ///
    /// `retry_offered` is whether the feedback stage produced a hint. A retry
    /// is granted only for a partially correct answer with a hint while the
    /// key has attempts left. A correct answer resets the key.
    async fn apply(
        &self,
        key: &RetryKey,
        category: FeedbackCategory,
        retry_offered: bool,
    ) -> RetryDecision;

    /// Forget `key`.
    async fn reset(&self, key: &RetryKey);

    /// Forget every key of `session_id`. Returns how many were removed.
    async fn clear_session(&self, session_id: &str) -> usize;

    /// Drop entries idle for longer than the store's TTL.
    async fn evict_expired(&self) -> usize;

    /// Number of tracked keys.
    async fn len(&self) -> usize;
}

/// In-process [`RetryStore`] with idle-time expiry.
#[derive(Debug)]
pub struct MemoryRetryStore {
    entries: RwLock<HashMap<RetryKey, RetryEntry>>,
    ttl: Duration,
}

impl MemoryRetryStore {
    pub fn new(ttl: Duration) -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
            ttl,
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Drop entries not touched since `cutoff`.
    pub async fn evict_before(&self, cutoff: DateTime<Utc>) -> usize {
        let mut entries = self.entries.write().await;
        let before = entries.len();
        entries.retain(|_, entry| entry.touched_at > cutoff);
        before - entries.len()
    }
}

impl Default for MemoryRetryStore {
    fn default() -> Self {
        Self::new(Duration::from_secs(2 * 60 * 60))
    }
}

#[async_trait]
impl RetryStore for MemoryRetryStore {
    async fn attempts(&self, key: &RetryKey) -> u8 {
        self.entries
            .read()
            .await
            .get(key)
            .map(|e| e.attempts)
            .unwrap_or(0)
    }

    async fn apply(
        &self,
        key: &RetryKey,
        category: FeedbackCategory,
        retry_offered: bool,
    ) -> RetryDecision {
        let mut entries = self.entries.write().await;

        if category == FeedbackCategory::Correct {
            entries.remove(key);
            debug!(%key, "Correct answer; retry state reset");
            return RetryDecision {
                grant_retry: false,
                attempts: 0,
            };
        }

        let now = Utc::now();
        let entry = entries.entry(key.clone()).or_insert(RetryEntry {
            attempts: 0,
            touched_at: now,
        });
        entry.touched_at = now;

        let grant_retry = category == FeedbackCategory::PartiallyCorrect
            && retry_offered
            && entry.attempts < MAX_RETRIES;
        if grant_retry {
            entry.attempts += 1;
        }

        debug!(%key, %category, grant_retry, attempts = entry.attempts, "Retry decision");
        RetryDecision {
            grant_retry,
            attempts: entry.attempts,
        }
    }

    async fn reset(&self, key: &RetryKey) {
        self.entries.write().await.remove(key);
    }

    async fn clear_session(&self, session_id: &str) -> usize {
        let mut entries = self.entries.write().await;
        let before = entries.len();
        entries.retain(|key, _| key.session_id != session_id);
        before - entries.len()
    }

    async fn evict_expired(&self) -> usize {
        let now = Utc::now();
        let Some(cutoff) = TimeDelta::from_std(self.ttl)
            .ok()
            .and_then(|ttl| now.checked_sub_signed(ttl))
        else {
            return 0;
        };
        let evicted = self.evict_before(cutoff).await;
        if evicted > 0 {
            debug!(evicted, "Evicted idle retry entries");
        }
        evicted
    }

    async fn len(&self) -> usize {
        self.entries.read().await.len()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use FeedbackCategory::*;

    fn key() -> RetryKey {
        RetryKey::new("s1", "q1")
    }

    #[tokio::test]
    async fn first_partial_with_hint_grants_retry() {
        let store = MemoryRetryStore::default();
        let decision = store.apply(&key(), PartiallyCorrect, true).await;
        assert!(decision.grant_retry);
        assert_eq!(decision.attempts, 1);
        assert_eq!(store.attempts(&key()).await, 1);
    }

    #[tokio::test]
    async fn second_partial_is_final() {
        let store = MemoryRetryStore::default();
        store.apply(&key(), PartiallyCorrect, true).await;
        let decision = store.apply(&key(), PartiallyCorrect, true).await;
        assert!(!decision.grant_retry);
        assert_eq!(decision.attempts, 1);

        // count stays at 1, so a third partial is final too
        let decision = store.apply(&key(), PartiallyCorrect, true).await;
        assert!(!decision.grant_retry);
    }

    #[tokio::test]
    async fn partial_without_hint_is_final() {
        let store = MemoryRetryStore::default();
        let decision = store.apply(&key(), PartiallyCorrect, false).await;
        assert!(!decision.grant_retry);
        assert_eq!(store.attempts(&key()).await, 0);
    }

    #[tokio::test]
    async fn correct_resets() {
        let store = MemoryRetryStore::default();
        store.apply(&key(), PartiallyCorrect, true).await;
        let decision = store.apply(&key(), Correct, false).await;
        assert!(!decision.grant_retry);
        assert_eq!(store.attempts(&key()).await, 0);
        assert_eq!(store.len().await, 0);

        assert!(store.apply(&key(), PartiallyCorrect, true).await.grant_retry);
    }

    #[tokio::test]
    async fn incorrect_leaves_count_unchanged() {
        let store = MemoryRetryStore::default();
        store.apply(&key(), PartiallyCorrect, true).await;
        let decision = store.apply(&key(), Incorrect, false).await;
        assert!(!decision.grant_retry);
        assert_eq!(decision.attempts, 1);
    }

    #[tokio::test]
    async fn keys_are_independent() {
        let store = MemoryRetryStore::default();
        store.apply(&key(), PartiallyCorrect, true).await;
        let other_question = RetryKey::new("s1", "q2");
        let other_session = RetryKey::new("s2", "q1");
        assert!(store.apply(&other_question, PartiallyCorrect, true).await.grant_retry);
        assert!(store.apply(&other_session, PartiallyCorrect, true).await.grant_retry);
    }

    #[tokio::test]
    async fn concurrent_partials_grant_exactly_one_retry() {
        let store = Arc::new(MemoryRetryStore::default());
        let handles: Vec<_> = (0..16)
            .map(|_| {
                let store = store.clone();
                tokio::spawn(async move { store.apply(&key(), PartiallyCorrect, true).await })
            })
            .collect();

        let mut granted = 0;
        for handle in handles {
            if handle.await.unwrap().grant_retry {
                granted += 1;
            }
        }
        assert_eq!(granted, 1);
    }

    #[tokio::test]
    async fn clear_session_removes_only_that_session() {
        let store = MemoryRetryStore::default();
        store.apply(&RetryKey::new("s1", "q1"), Incorrect, false).await;
        store.apply(&RetryKey::new("s1", "q2"), Incorrect, false).await;
        store.apply(&RetryKey::new("s2", "q1"), Incorrect, false).await;

        assert_eq!(store.clear_session("s1").await, 2);
        assert_eq!(store.len().await, 1);
    }

    #[tokio::test]
    async fn zero_ttl_evicts_everything() {
        let store = MemoryRetryStore::new(Duration::ZERO);
        store.apply(&key(), PartiallyCorrect, true).await;
        assert_eq!(store.evict_expired().await, 1);
        assert_eq!(store.attempts(&key()).await, 0);
    }

    #[tokio::test]
    async fn fresh_entries_survive_eviction() {
        let store = MemoryRetryStore::default();
        store.apply(&key(), PartiallyCorrect, true).await;
        assert_eq!(store.evict_expired().await, 0);
        assert_eq!(store.len().await, 1);
    }

    #[test]
    fn missing_session_uses_shared_fallback_key() {
        assert_eq!(
            RetryKey::resolve(None, "q7"),
            RetryKey::new("fallback:q7", "q7")
        );
        assert_eq!(
            RetryKey::resolve(Some("  "), "q7").session_id,
            "fallback:q7"
        );
        assert_eq!(RetryKey::resolve(Some("abc"), "q7").session_id, "abc");
    }
}

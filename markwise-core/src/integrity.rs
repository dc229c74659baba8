//! Client-reported proctoring events (tab switches, paste attempts, ...).

use std::collections::VecDeque;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;
use tracing::{debug, info};
use uuid::Uuid;

/// Default number of events kept before the oldest are dropped.
pub const DEFAULT_CAPACITY: usize = 10_000;

/// An event as reported by the client.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IntegrityEvent {
    pub session_id: String,
    pub event_type: String,
    /// Client clock, milliseconds since the epoch.
    pub timestamp: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payload: Option<serde_json::Value>,
}

/// A stored event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IntegrityRecord {
    pub id: Uuid,
    #[serde(flatten)]
    pub event: IntegrityEvent,
    pub received_at: DateTime<Utc>,
}

/// Bounded in-memory event log.
#[derive(Debug)]
pub struct IntegrityLog {
    records: RwLock<VecDeque<IntegrityRecord>>,
    capacity: usize,
}

impl Default for IntegrityLog {
    fn default() -> Self {
        Self::with_capacity(DEFAULT_CAPACITY)
    }
}

impl IntegrityLog {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            records: RwLock::new(VecDeque::new()),
            capacity: capacity.max(1),
        }
    }

    pub async fn record(&self, event: IntegrityEvent) -> IntegrityRecord {
        let record = IntegrityRecord {
            id: Uuid::new_v4(),
            event,
            received_at: Utc::now(),
        };
        debug!(
            session_id = %record.event.session_id,
            event_type = %record.event.event_type,
            "Integrity event recorded"
        );

        let mut records = self.records.write().await;
        while records.len() >= self.capacity {
            records.pop_front();
        }
        records.push_back(record.clone());
        record
    }

    /// Events of `session_id` in arrival order.
    pub async fn for_session(&self, session_id: &str) -> Vec<IntegrityRecord> {
        self.records
            .read()
            .await
            .iter()
            .filter(|r| r.event.session_id == session_id)
            .cloned()
            .collect()
    }

    pub async fn clear_session(&self, session_id: &str) -> usize {
        let mut records = self.records.write().await;
        let before = records.len();
        records.retain(|r| r.event.session_id != session_id);
        let cleared = before - records.len();
        info!(session_id, cleared, "Cleared integrity events");
        cleared
    }

    pub async fn len(&self) -> usize {
        self.records.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.records.read().await.is_empty()
    }
}

//! Integrity log endpoints

use std::sync::Arc;

use axum::Json;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use markwise_core::{IntegrityEvent, IntegrityRecord};
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use crate::AppState;
use crate::error::ApiError;

#[derive(Debug, Serialize, Deserialize)]
pub struct LogReceivedResponse {
    pub message: String,
    pub id: Uuid,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ClearSessionResponse {
    pub message: String,
    pub cleared_logs: usize,
    pub cleared_retry_entries: usize,
}

/// POST /assessment/integrity-log
pub async fn record(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<IntegrityEvent>, JsonRejection>,
) -> Result<Json<LogReceivedResponse>, ApiError> {
    let Json(event) = payload?;
    let record = state.integrity.record(event).await;
    Ok(Json(LogReceivedResponse {
        message: "Log received".to_string(),
        id: record.id,
    }))
}

/// GET /assessment/integrity-logs/:session_id
pub async fn list(
    State(state): State<Arc<AppState>>,
    Path(session_id): Path<String>,
) -> Json<Vec<IntegrityRecord>> {
    Json(state.integrity.for_session(&session_id).await)
}

/// POST /assessment/clear-session/:session_id
///
/// Drops the session's integrity events and its retry state.
pub async fn clear_session(
    State(state): State<Arc<AppState>>,
    Path(session_id): Path<String>,
) -> Json<ClearSessionResponse> {
    let cleared_logs = state.integrity.clear_session(&session_id).await;
    let cleared_retry_entries = state.retries.clear_session(&session_id).await;
    info!(%session_id, cleared_logs, cleared_retry_entries, "Session cleared");

    Json(ClearSessionResponse {
        message: format!("Cleared {cleared_logs} logs for session {session_id}"),
        cleared_logs,
        cleared_retry_entries,
    })
}

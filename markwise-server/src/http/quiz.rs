//! Quiz answer endpoint

use std::sync::Arc;

use axum::Json;
use axum::extract::State;
use axum::extract::rejection::JsonRejection;
use markwise_core::{QuizAnswer, QuizFeedback};

use crate::AppState;
use crate::error::ApiError;

/// POST /assessment/quiz/answer
///
/// Model failures never surface here; only an unknown question id or a
/// malformed question bank produce an error status.
pub async fn answer(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<QuizAnswer>, JsonRejection>,
) -> Result<Json<QuizFeedback>, ApiError> {
    let Json(submission) = payload?;
    let feedback = state.grader.grade(submission).await?;
    Ok(Json(feedback))
}

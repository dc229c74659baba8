//! Shared application state for the markwise server

use std::sync::Arc;

use chrono::{DateTime, Utc};
use markwise_core::{
    IntegrityLog, LlmFeedbackGenerator, LlmSemanticEvaluator, ModelClient, QuizGrader, RetryStore,
};

/// Shared application state accessible by all handlers
#[derive(Clone)]
pub struct AppState {
    /// Grades submitted answers
    pub grader: QuizGrader,
    /// Retry counters, shared with the grader
    pub retries: Arc<dyn RetryStore>,
    /// Client-reported integrity events
    pub integrity: Arc<IntegrityLog>,
    /// When the server started
    pub started_at: DateTime<Utc>,
}

impl AppState {
    /// Create state around an existing grader
    pub fn new(grader: QuizGrader) -> Self {
        let retries = Arc::clone(grader.retries());
        Self {
            grader,
            retries,
            integrity: Arc::new(IntegrityLog::default()),
            started_at: Utc::now(),
        }
    }

    /// Create state whose grader uses `client` for both evaluation stages
    pub fn with_model(client: ModelClient, retries: Arc<dyn RetryStore>) -> Self {
        let grader = QuizGrader::new(
            Arc::new(LlmSemanticEvaluator::new(client.clone())),
            Arc::new(LlmFeedbackGenerator::new(client)),
            retries,
        );
        Self::new(grader)
    }

    /// Returns how long the server has been running
    pub fn uptime_seconds(&self) -> i64 {
        (Utc::now() - self.started_at).num_seconds()
    }
}

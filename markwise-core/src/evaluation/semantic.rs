//! First stage: semantic correctness scoring.

use async_trait::async_trait;
use markwise_models::providers::ResponseFormat;
use markwise_models::{Result, Validate};
use serde::Deserialize;
use tracing::{debug, instrument, warn};

use super::client::ModelClient;
use super::prompts;
use super::{EvaluationRequest, FeedbackCategory, SemanticResult};

/// Scores a student's answer against the reference answer.
#[async_trait]
pub trait SemanticScorer: Send + Sync {
    /// Errors propagate; the caller decides how to recover.
    async fn score(&self, request: &EvaluationRequest) -> Result<SemanticResult>;
}

/// Shape of the scorer's JSON reply.
#[derive(Debug, Deserialize)]
struct ScoreReply {
    score: f64,
    category: FeedbackCategory,
    reasoning: String,
}

impl Validate for ScoreReply {
    fn validate(&self) -> std::result::Result<(), String> {
        if !self.score.is_finite() || !(0.0..=1.0).contains(&self.score) {
            return Err(format!("score {} is outside [0, 1]", self.score));
        }
        Ok(())
    }
}

/// [`SemanticScorer`] backed by a chat model with a fixed rubric.
#[derive(Debug, Clone)]
pub struct LlmSemanticEvaluator {
    client: ModelClient,
}

impl LlmSemanticEvaluator {
    pub fn new(client: ModelClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl SemanticScorer for LlmSemanticEvaluator {
    #[instrument(
        name = "semantic_score",
        skip(self, request),
        fields(question_id = %request.question_id, model = %self.client.model())
    )]
    async fn score(&self, request: &EvaluationRequest) -> Result<SemanticResult> {
        let format = ResponseFormat::JsonSchema {
            name: "semantic_score".to_string(),
            schema: prompts::scoring_schema(),
        };

        let reply: ScoreReply = self
            .client
            .complete_structured(
                prompts::SCORER_SYSTEM,
                &prompts::scoring_prompt(request),
                prompts::SCORER_TEMPERATURE,
                format,
            )
            .await
            .inspect_err(|e| warn!(error = %e, "Semantic scoring failed"))?;

        let result = SemanticResult::new(reply.score, reply.reasoning);
        if reply.category != result.category {
            debug!(
                score = result.score,
                reported = %reply.category,
                derived = %result.category,
                "Model category disagrees with score; using score"
            );
        }

        debug!(score = result.score, category = %result.category, "Answer scored");
        Ok(result)
    }
}

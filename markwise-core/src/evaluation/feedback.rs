//! Second stage: learner-facing feedback for a scored answer.

use async_trait::async_trait;
use rand::seq::SliceRandom;
use tracing::{debug, instrument, warn};

use super::client::ModelClient;
use super::prompts;
use super::{EvaluationRequest, Feedback, FeedbackCategory, SemanticResult};

/// Lines shown for a correct answer, one picked at random.
pub const CELEBRATIONS: [&str; 5] = [
    "Excellent! You've got it exactly right.",
    "Perfect answer! You clearly understand the concept.",
    "Spot on! That's exactly what I was looking for.",
    "Outstanding! Your answer demonstrates complete understanding.",
    "Exactly right! Well done.",
];

/// Shown when feedback text could not be generated.
pub const APOLOGY: &str = "I encountered an error generating feedback. Please try again.";

/// Produces feedback text for a scored answer.
///
/// Implementations never fail: a generation error degrades to [`APOLOGY`]
/// (or a templated sentence) with `requires_retry` false.
#[async_trait]
pub trait FeedbackWriter: Send + Sync {
    async fn feedback(&self, request: &EvaluationRequest, result: &SemanticResult) -> Feedback;

    /// Why `chosen` is wrong and `correct` is right, for multiple choice.
    async fn explain_choice(&self, question: &str, chosen: &str, correct: &str) -> String;
}

/// [`FeedbackWriter`] backed by a chat model.
#[derive(Debug, Clone)]
pub struct LlmFeedbackGenerator {
    client: ModelClient,
}

impl LlmFeedbackGenerator {
    pub fn new(client: ModelClient) -> Self {
        Self { client }
    }
}

fn celebration() -> &'static str {
    CELEBRATIONS
        .choose(&mut rand::thread_rng())
        .copied()
        .unwrap_or(CELEBRATIONS[0])
}

fn choice_template(chosen: &str, correct: &str) -> String {
    format!("\"{chosen}\" is not correct. The correct answer is \"{correct}\".")
}

#[async_trait]
impl FeedbackWriter for LlmFeedbackGenerator {
    #[instrument(
        name = "feedback",
        skip(self, request, result),
        fields(question_id = %request.question_id, category = %result.category)
    )]
    async fn feedback(&self, request: &EvaluationRequest, result: &SemanticResult) -> Feedback {
        let correct_answer = request.ideal_answer.clone();

        match result.category {
            FeedbackCategory::Correct => Feedback {
                category: FeedbackCategory::Correct,
                text: celebration().to_string(),
                correct_answer,
                requires_retry: false,
            },
            FeedbackCategory::PartiallyCorrect => {
                let hint = self
                    .client
                    .complete_text(
                        prompts::TUTOR_SYSTEM,
                        &prompts::hint_prompt(request),
                        prompts::HINT_TEMPERATURE,
                        prompts::HINT_MAX_TOKENS,
                    )
                    .await;
                match hint {
                    Ok(text) => {
                        debug!("Hint generated");
                        Feedback {
                            category: FeedbackCategory::PartiallyCorrect,
                            text,
                            correct_answer,
                            requires_retry: true,
                        }
                    }
                    Err(e) => {
                        warn!(error = %e, "Hint generation failed");
                        Feedback {
                            category: FeedbackCategory::PartiallyCorrect,
                            text: APOLOGY.to_string(),
                            correct_answer,
                            requires_retry: false,
                        }
                    }
                }
            }
            FeedbackCategory::Incorrect => {
                let explanation = self
                    .client
                    .complete_text(
                        prompts::TUTOR_SYSTEM,
                        &prompts::explanation_prompt(request),
                        prompts::EXPLANATION_TEMPERATURE,
                        prompts::EXPLANATION_MAX_TOKENS,
                    )
                    .await;
                let text = match explanation {
                    Ok(text) => format!("{text}\n\nThe correct answer is: {correct_answer}"),
                    Err(e) => {
                        warn!(error = %e, "Explanation generation failed");
                        APOLOGY.to_string()
                    }
                };
                Feedback {
                    category: FeedbackCategory::Incorrect,
                    text,
                    correct_answer,
                    requires_retry: false,
                }
            }
        }
    }

    async fn explain_choice(&self, question: &str, chosen: &str, correct: &str) -> String {
        match self
            .client
            .complete_text(
                prompts::TUTOR_SYSTEM,
                &prompts::choice_prompt(question, chosen, correct),
                prompts::EXPLANATION_TEMPERATURE,
                prompts::EXPLANATION_MAX_TOKENS,
            )
            .await
        {
            Ok(text) => text,
            Err(e) => {
                warn!(error = %e, "Choice explanation failed; using template");
                choice_template(chosen, correct)
            }
        }
    }
}

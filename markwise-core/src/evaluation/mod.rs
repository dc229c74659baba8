//! Short-answer evaluation.
//!
//! Grading a short answer happens in two model-backed stages. The
//! [`SemanticScorer`] assigns a correctness score in `[0.0, 1.0]`; the
//! [`FeedbackWriter`] turns the score's category into learner-facing text
//! (a celebratory line, a Socratic hint, or an explanation). When the model
//! is unavailable the grader falls back to [`lexical`] overlap.

mod client;
mod feedback;
pub mod lexical;
mod prompts;
mod semantic;

use serde::{Deserialize, Serialize};

pub use client::ModelClient;
pub use feedback::{APOLOGY, CELEBRATIONS, FeedbackWriter, LlmFeedbackGenerator};
pub use semantic::{LlmSemanticEvaluator, SemanticScorer};

/// Lowest score that counts as correct.
pub const CORRECT_THRESHOLD: f64 = 0.9;

/// Lowest score that counts as partially correct.
pub const PARTIAL_THRESHOLD: f64 = 0.6;

/// Graded outcome of an answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FeedbackCategory {
    Correct,
    PartiallyCorrect,
    Incorrect,
}

impl FeedbackCategory {
    /// Category for a semantic score using the canonical thresholds.
    pub fn from_score(score: f64) -> Self {
        if score >= CORRECT_THRESHOLD {
            FeedbackCategory::Correct
        } else if score >= PARTIAL_THRESHOLD {
            FeedbackCategory::PartiallyCorrect
        } else {
            FeedbackCategory::Incorrect
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            FeedbackCategory::Correct => "correct",
            FeedbackCategory::PartiallyCorrect => "partially_correct",
            FeedbackCategory::Incorrect => "incorrect",
        }
    }
}

impl std::fmt::Display for FeedbackCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Which path produced a verdict.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EvaluationSource {
    /// Semantic scorer and feedback generator.
    Model,
    /// Word-overlap fallback after a model failure.
    LexicalFallback,
    /// Multiple-choice exact comparison.
    ExactMatch,
}

/// Everything the evaluation stages need about one short answer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvaluationRequest {
    pub question_id: String,
    pub question_text: String,
    pub ideal_answer: String,
    pub student_answer: String,
}

impl EvaluationRequest {
    pub fn new(
        question_id: impl Into<String>,
        question_text: impl Into<String>,
        ideal_answer: impl Into<String>,
        student_answer: impl Into<String>,
    ) -> Self {
        Self {
            question_id: question_id.into(),
            question_text: question_text.into(),
            ideal_answer: ideal_answer.into(),
            student_answer: student_answer.into(),
        }
    }
}

/// Output of the semantic scorer.
///
/// The category is always derived from the score; a category reported by
/// the model is advisory only.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SemanticResult {
    pub score: f64,
    pub category: FeedbackCategory,
    pub reasoning: String,
}

impl SemanticResult {
    pub fn new(score: f64, reasoning: impl Into<String>) -> Self {
        Self {
            score,
            category: FeedbackCategory::from_score(score),
            reasoning: reasoning.into(),
        }
    }
}

/// Output of the feedback generator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Feedback {
    pub category: FeedbackCategory,
    /// Celebratory line, hint or explanation depending on category.
    pub text: String,
    pub correct_answer: String,
    /// True only when the generator produced a hint for a partial answer.
    pub requires_retry: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn thresholds_partition_the_unit_interval() {
        assert_eq!(FeedbackCategory::from_score(1.0), FeedbackCategory::Correct);
        assert_eq!(FeedbackCategory::from_score(0.9), FeedbackCategory::Correct);
        assert_eq!(
            FeedbackCategory::from_score(0.89),
            FeedbackCategory::PartiallyCorrect
        );
        assert_eq!(
            FeedbackCategory::from_score(0.6),
            FeedbackCategory::PartiallyCorrect
        );
        assert_eq!(
            FeedbackCategory::from_score(0.59),
            FeedbackCategory::Incorrect
        );
        assert_eq!(FeedbackCategory::from_score(0.0), FeedbackCategory::Incorrect);
    }

    #[test]
    fn category_serializes_snake_case() {
        let json = serde_json::to_string(&FeedbackCategory::PartiallyCorrect).unwrap();
        assert_eq!(json, "\"partially_correct\"");
        assert_eq!(FeedbackCategory::Incorrect.to_string(), "incorrect");
    }

    #[test]
    fn semantic_result_derives_category() {
        let result = SemanticResult::new(0.75, "covers half the idea");
        assert_eq!(result.category, FeedbackCategory::PartiallyCorrect);
    }
}

//! Error types for markwise-core

use thiserror::Error;

/// Errors surfaced to the caller of [`QuizGrader`](crate::QuizGrader).
///
/// Model failures on the short-answer path are recovered inside the grader
/// and never appear here.
#[derive(Error, Debug)]
pub enum GradingError {
    #[error("Question not found: {0}")]
    QuestionNotFound(String),

    #[error("Question bank is empty")]
    EmptyQuestionBank,

    #[error("Short-answer question {0} has no ideal answer")]
    MissingIdealAnswer(String),

    #[error("Multiple-choice question {0} has no option marked correct")]
    MissingCorrectOption(String),
}

impl GradingError {
    /// Stable machine-readable code for API responses.
    pub fn code(&self) -> &'static str {
        match self {
            GradingError::QuestionNotFound(_) => "QUESTION_NOT_FOUND",
            GradingError::EmptyQuestionBank => "EMPTY_QUESTION_BANK",
            GradingError::MissingIdealAnswer(_) => "MISSING_IDEAL_ANSWER",
            GradingError::MissingCorrectOption(_) => "MISSING_CORRECT_OPTION",
        }
    }
}

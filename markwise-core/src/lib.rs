//! markwise-core: grading logic for quiz answers
//!
//! This crate turns a submitted quiz answer into a verdict:
//!
//! - **Question bank** - [`Question`] and [`QuestionBank`] as sent by the client
//! - **SAQ evaluation** - a two-stage model pipeline ([`SemanticScorer`] then
//!   [`FeedbackWriter`]) with a deterministic [`lexical`] fallback
//! - **Retry tracking** - [`RetryStore`] deciding whether a partially correct
//!   answer earns one more attempt
//! - **Quiz progression** - [`QuizGrader`] merging the verdict with score,
//!   answered-count and next-question selection
//! - **Integrity log** - [`IntegrityLog`] keeping client-reported proctoring events
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────┐
//! │                       QuizGrader                          │
//! │  ┌──────────────┐   ┌───────────────┐   ┌──────────────┐  │
//! │  │SemanticScorer│──▶│ FeedbackWriter│──▶│  RetryStore  │  │
//! │  └──────┬───────┘   └───────────────┘   └──────────────┘  │
//! │         │ error                                           │
//! │         ▼                                                 │
//! │  ┌──────────────┐                                         │
//! │  │lexical overlap│ (no retries granted)                   │
//! │  └──────────────┘                                         │
//! └──────────────────────────────────────────────────────────┘
//! ```

pub mod error;
pub mod evaluation;
pub mod grader;
pub mod integrity;
pub mod question;
pub mod retry;

pub use error::GradingError;
pub use evaluation::{
    EvaluationRequest, EvaluationSource, Feedback, FeedbackCategory, FeedbackWriter,
    LlmFeedbackGenerator, LlmSemanticEvaluator, ModelClient, SemanticResult, SemanticScorer,
    lexical,
};
pub use grader::{QuizAnswer, QuizFeedback, QuizGrader};
pub use integrity::{IntegrityEvent, IntegrityLog, IntegrityRecord};
pub use question::{McqOption, Question, QuestionBank, QuestionType};
pub use retry::{MemoryRetryStore, RetryDecision, RetryKey, RetryStore};

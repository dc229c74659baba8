//! Answer handling: grade one submission and advance the quiz.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{info, instrument, warn};

use crate::error::GradingError;
use crate::evaluation::{
    EvaluationRequest, EvaluationSource, FeedbackCategory, FeedbackWriter, SemanticScorer,
    lexical,
};
use crate::question::{Question, QuestionBank, QuestionType};
use crate::retry::{RetryKey, RetryStore};

/// A submitted answer together with the quiz it belongs to.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuizAnswer {
    pub question_id: String,
    pub answer: String,
    pub question_bank: QuestionBank,
    #[serde(default)]
    pub current_score: u32,
    #[serde(default)]
    pub total_questions_answered: u32,
    #[serde(default)]
    pub session_id: Option<String>,
}

/// Verdict for one submission plus the quiz state after it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuizFeedback {
    /// Score awarded and quiz advanced.
    pub is_correct: bool,
    /// Withheld while a retry is pending.
    pub correct_answer: Option<String>,
    pub next_question: Option<Question>,
    pub final_score: Option<String>,
    pub new_score: u32,
    pub new_total_questions_answered: u32,
    pub feedback_category: FeedbackCategory,
    pub hint: Option<String>,
    pub explanation: Option<String>,
    pub requires_retry: bool,
    pub evaluation_source: EvaluationSource,
}

/// Outcome of grading, before progression is applied.
#[derive(Debug, Clone, PartialEq)]
struct Verdict {
    category: FeedbackCategory,
    correct_answer: String,
    hint: Option<String>,
    explanation: Option<String>,
    requires_retry: bool,
    source: EvaluationSource,
}

impl Verdict {
    fn is_correct(&self) -> bool {
        self.category == FeedbackCategory::Correct
    }
}

/// Grades quiz answers.
///
/// Short answers go through the semantic scorer and the feedback writer;
/// when scoring fails the grader falls back to [`lexical`] overlap and never
/// surfaces the model error. Multiple-choice answers are compared exactly.
#[derive(Clone)]
pub struct QuizGrader {
    scorer: Arc<dyn SemanticScorer>,
    writer: Arc<dyn FeedbackWriter>,
    retries: Arc<dyn RetryStore>,
}

impl QuizGrader {
    pub fn new(
        scorer: Arc<dyn SemanticScorer>,
        writer: Arc<dyn FeedbackWriter>,
        retries: Arc<dyn RetryStore>,
    ) -> Self {
        Self {
            scorer,
            writer,
            retries,
        }
    }

    pub fn retries(&self) -> &Arc<dyn RetryStore> {
        &self.retries
    }

    #[instrument(
        name = "grade_answer",
        skip(self, submission),
        fields(question_id = %submission.question_id)
    )]
    pub async fn grade(&self, submission: QuizAnswer) -> Result<QuizFeedback, GradingError> {
        let bank = &submission.question_bank;
        let (index, question) = bank.find(&submission.question_id)?;

        let verdict = match question.question_type {
            QuestionType::Saq => {
                let key = RetryKey::resolve(submission.session_id.as_deref(), &question.question_id);
                self.grade_saq(question, &submission.answer, &key).await?
            }
            QuestionType::Mcq => self.grade_mcq(question, &submission.answer).await?,
        };

        info!(
            category = %verdict.category,
            requires_retry = verdict.requires_retry,
            source = ?verdict.source,
            "Answer graded"
        );
        Ok(progress(
            bank,
            index,
            verdict,
            submission.current_score,
            submission.total_questions_answered,
        ))
    }

    async fn grade_saq(
        &self,
        question: &Question,
        answer: &str,
        key: &RetryKey,
    ) -> Result<Verdict, GradingError> {
        let ideal = question.ideal_answer()?;
        let request = EvaluationRequest::new(
            &question.question_id,
            &question.question_text,
            ideal,
            answer,
        );

        let result = match self.scorer.score(&request).await {
            Ok(result) => result,
            Err(e) => {
                warn!(error = %e, "Semantic scoring unavailable; using lexical fallback");
                return Ok(self.lexical_verdict(&request, key).await);
            }
        };

        let feedback = self.writer.feedback(&request, &result).await;
        let decision = self
            .retries
            .apply(key, result.category, feedback.requires_retry)
            .await;

        let verdict = if decision.grant_retry {
            Verdict {
                category: result.category,
                correct_answer: feedback.correct_answer,
                hint: Some(feedback.text),
                explanation: None,
                requires_retry: true,
                source: EvaluationSource::Model,
            }
        } else {
            Verdict {
                category: result.category,
                correct_answer: feedback.correct_answer,
                hint: None,
                explanation: Some(feedback.text),
                requires_retry: false,
                source: EvaluationSource::Model,
            }
        };
        Ok(verdict)
    }

    async fn lexical_verdict(&self, request: &EvaluationRequest, key: &RetryKey) -> Verdict {
        let score = lexical::score(&request.student_answer, &request.ideal_answer);
        if score.is_correct() {
            self.retries.reset(key).await;
        }

        let explanation = match score.category {
            FeedbackCategory::Correct => {
                "Your answer matches the key points of the reference answer.".to_string()
            }
            FeedbackCategory::PartiallyCorrect => format!(
                "Your answer covers some of the key points. The correct answer is: {}",
                request.ideal_answer
            ),
            FeedbackCategory::Incorrect => {
                format!("Not quite. The correct answer is: {}", request.ideal_answer)
            }
        };

        Verdict {
            category: score.category,
            correct_answer: request.ideal_answer.clone(),
            hint: None,
            explanation: Some(explanation),
            requires_retry: false,
            source: EvaluationSource::LexicalFallback,
        }
    }

    async fn grade_mcq(&self, question: &Question, answer: &str) -> Result<Verdict, GradingError> {
        let correct = question.correct_option()?;

        if answer == correct.text {
            return Ok(Verdict {
                category: FeedbackCategory::Correct,
                correct_answer: correct.text.clone(),
                hint: None,
                explanation: None,
                requires_retry: false,
                source: EvaluationSource::ExactMatch,
            });
        }

        let explanation = self
            .writer
            .explain_choice(&question.question_text, answer, &correct.text)
            .await;
        Ok(Verdict {
            category: FeedbackCategory::Incorrect,
            correct_answer: correct.text.clone(),
            hint: None,
            explanation: Some(explanation),
            requires_retry: false,
            source: EvaluationSource::ExactMatch,
        })
    }
}

/// Merge a verdict with the running quiz state.
fn progress(
    bank: &QuestionBank,
    index: usize,
    verdict: Verdict,
    score: u32,
    answered: u32,
) -> QuizFeedback {
    if verdict.requires_retry {
        return QuizFeedback {
            is_correct: false,
            correct_answer: None,
            next_question: bank.questions.get(index).cloned(),
            final_score: None,
            new_score: score,
            new_total_questions_answered: answered,
            feedback_category: verdict.category,
            hint: verdict.hint,
            explanation: None,
            requires_retry: true,
            evaluation_source: verdict.source,
        };
    }

    let is_correct = verdict.is_correct();
    let new_score = score.saturating_add(u32::from(is_correct));
    let new_total = answered.saturating_add(1);
    let next_question = bank.next_after(index).cloned();
    let final_score = next_question
        .is_none()
        .then(|| format!("Quiz Complete! Your score: {new_score}/{new_total}"));

    QuizFeedback {
        is_correct,
        correct_answer: Some(verdict.correct_answer),
        next_question,
        final_score,
        new_score,
        new_total_questions_answered: new_total,
        feedback_category: verdict.category,
        hint: None,
        explanation: verdict.explanation,
        requires_retry: false,
        evaluation_source: verdict.source,
    }
}

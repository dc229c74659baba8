//! Question bank types as supplied by the client with every answer.

use serde::{Deserialize, Serialize};

use crate::error::GradingError;

/// Kind of question.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QuestionType {
    /// Multiple choice, graded by exact match.
    Mcq,
    /// Short answer, graded semantically.
    Saq,
}

/// One option of a multiple-choice question.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct McqOption {
    pub option_id: String,
    pub text: String,
    #[serde(default)]
    pub is_correct: bool,
}

/// A single quiz question.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Question {
    pub question_id: String,
    #[serde(default)]
    pub page_number: Option<u32>,
    pub question_type: QuestionType,
    pub question_text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mcq_options: Option<Vec<McqOption>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ideal_answer: Option<String>,
}

impl Question {
    /// Reference answer of a short-answer question.
    pub fn ideal_answer(&self) -> Result<&str, GradingError> {
        self.ideal_answer
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .ok_or_else(|| GradingError::MissingIdealAnswer(self.question_id.clone()))
    }

    /// The first option marked correct.
    pub fn correct_option(&self) -> Result<&McqOption, GradingError> {
        self.mcq_options
            .iter()
            .flatten()
            .find(|o| o.is_correct)
            .ok_or_else(|| GradingError::MissingCorrectOption(self.question_id.clone()))
    }
}

/// Ordered list of questions making up a quiz.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct QuestionBank {
    #[serde(default)]
    pub questions: Vec<Question>,
}

impl QuestionBank {
    pub fn new(questions: Vec<Question>) -> Self {
        Self { questions }
    }

    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }

    /// Position and question for `question_id`.
    pub fn find(&self, question_id: &str) -> Result<(usize, &Question), GradingError> {
        if self.questions.is_empty() {
            return Err(GradingError::EmptyQuestionBank);
        }
        self.questions
            .iter()
            .enumerate()
            .find(|(_, q)| q.question_id == question_id)
            .ok_or_else(|| GradingError::QuestionNotFound(question_id.to_string()))
    }

    /// Question that follows position `index`, if any.
    pub fn next_after(&self, index: usize) -> Option<&Question> {
        self.questions.get(index + 1)
    }
}


#[cfg(test)]
mod tests {
    use super::fixtures::*;
    use super::*;

    fn bank() -> QuestionBank {
        QuestionBank::new(vec![
            saq("q1", "What is the capital of France?", "Paris"),
            mcq("q2", "2 + 2?", &[("3", false), ("4", true)]),
        ])
    }

    #[test]
    fn find_returns_position() {
        let bank = bank();
        let (index, question) = bank.find("q2").unwrap();
        assert_eq!(index, 1);
        assert_eq!(question.question_type, QuestionType::Mcq);
    }

    #[test]
    fn find_unknown_id_is_not_found() {
        let err = bank().find("nope").unwrap_err();
        assert!(matches!(err, GradingError::QuestionNotFound(id) if id == "nope"));
    }

    #[test]
    fn find_in_empty_bank() {
        let err = QuestionBank::default().find("q1").unwrap_err();
        assert!(matches!(err, GradingError::EmptyQuestionBank));
    }

    #[test]
    fn next_after_last_is_none() {
        let bank = bank();
        assert_eq!(bank.next_after(0).unwrap().question_id, "q2");
        assert!(bank.next_after(1).is_none());
    }

    #[test]
    fn blank_ideal_answer_is_missing() {
        let mut q = saq("q1", "text", "   ");
        assert!(matches!(
            q.ideal_answer(),
            Err(GradingError::MissingIdealAnswer(_))
        ));
        q.ideal_answer = Some(" Paris ".into());
        assert_eq!(q.ideal_answer().unwrap(), "Paris");
    }

    #[test]
    fn correct_option_requires_flag() {
        let q = mcq("q", "text", &[("a", false), ("b", false)]);
        assert!(matches!(
            q.correct_option(),
            Err(GradingError::MissingCorrectOption(_))
        ));
    }

    #[test]
    fn deserializes_client_payload() {
        let json = r#"{
            "questions": [{
                "question_id": "saq_1",
                "page_number": 4,
                "question_type": "saq",
                "question_text": "Define osmosis.",
                "ideal_answer": "Diffusion of water across a membrane"
            }]
        }"#;
        let bank: QuestionBank = serde_json::from_str(json).unwrap();
        assert_eq!(bank.questions[0].question_type, QuestionType::Saq);
        assert_eq!(bank.questions[0].page_number, Some(4));
        assert!(bank.questions[0].mcq_options.is_none());
    }
}

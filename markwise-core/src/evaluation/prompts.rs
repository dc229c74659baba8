//! Prompt text for the evaluation stages.

use serde_json::json;

use super::EvaluationRequest;

pub(crate) const SCORER_SYSTEM: &str = "You are a strict, fair examiner grading short answers \
against a reference answer. Judge meaning, not wording. Respond with a single JSON object only.";

pub(crate) const TUTOR_SYSTEM: &str = "You are a patient tutor. You never reveal the reference \
answer unless explicitly asked to explain it.";

pub(crate) const SCORER_TEMPERATURE: f32 = 0.1;
pub(crate) const HINT_TEMPERATURE: f32 = 0.3;
pub(crate) const HINT_MAX_TOKENS: u32 = 100;
pub(crate) const EXPLANATION_TEMPERATURE: f32 = 0.3;
pub(crate) const EXPLANATION_MAX_TOKENS: u32 = 200;

/// Scoring rubric given to the semantic scorer.
pub(crate) const RUBRIC: &str = "\
Score bands:
- 1.0: fully correct, every key idea of the reference answer is present
- 0.90-0.99: correct, differs from the reference only in wording
- 0.80-0.89: mostly correct, a minor detail is missing or imprecise
- 0.60-0.79: partially correct, the core idea is present but important parts are missing
- 0.30-0.59: contains some relevant content but misses the core idea
- 0.21-0.29: mostly wrong, only a loosely related term is present
- 0.00-0.20: wrong, off-topic, empty or gibberish

Rules:
- Gibberish, random characters or an unrelated answer scores 0.0 to 0.2.
- A one- or two-word answer to a question that needs explanation scores low.
- Be strict: do not reward answers that merely repeat words from the question.";

pub(crate) fn scoring_prompt(request: &EvaluationRequest) -> String {
    format!(
        "Question: {question}\n\
         Reference answer: {ideal}\n\
         Student answer: {student}\n\n\
         {RUBRIC}\n\n\
         Reply with JSON: {{\"score\": <number between 0 and 1>, \
         \"category\": \"correct\" | \"partially_correct\" | \"incorrect\", \
         \"reasoning\": \"<one or two sentences>\"}}",
        question = request.question_text,
        ideal = request.ideal_answer,
        student = request.student_answer,
    )
}

/// JSON schema describing the scorer's expected reply.
pub(crate) fn scoring_schema() -> serde_json::Value {
    json!({
        "type": "object",
        "properties": {
            "score": { "type": "number" },
            "category": {
                "type": "string",
                "enum": ["correct", "partially_correct", "incorrect"]
            },
            "reasoning": { "type": "string" }
        },
        "required": ["score", "category", "reasoning"],
        "additionalProperties": false
    })
}

pub(crate) fn hint_prompt(request: &EvaluationRequest) -> String {
    format!(
        "Question: {question}\n\
         Reference answer (do not reveal): {ideal}\n\
         Student answer: {student}\n\n\
         The student is partly right. Write a Socratic hint of at most two sentences that \
         points them toward what is missing. Ask a guiding question; do not state the answer.",
        question = request.question_text,
        ideal = request.ideal_answer,
        student = request.student_answer,
    )
}

pub(crate) fn explanation_prompt(request: &EvaluationRequest) -> String {
    format!(
        "Question: {question}\n\
         Reference answer: {ideal}\n\
         Student answer: {student}\n\n\
         The student's answer is not correct. In two or three sentences, explain what the \
         answer gets wrong or leaves out and why the reference answer is right. \
         Be encouraging and address the student directly.",
        question = request.question_text,
        ideal = request.ideal_answer,
        student = request.student_answer,
    )
}

pub(crate) fn choice_prompt(question: &str, chosen: &str, correct: &str) -> String {
    format!(
        "Question: {question}\n\
         The student chose: {chosen}\n\
         The correct option is: {correct}\n\n\
         In two or three sentences, explain why the chosen option is wrong and why the \
         correct option is right."
    )
}

//! Grade a single answer offline against a question bank file

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Args;
use markwise_core::{QuestionBank, QuizAnswer};

use crate::config::ConfigLoader;

#[derive(Debug, Args)]
pub struct EvaluateArgs {
    /// Question bank JSON file (`{"questions": [...]}`)
    #[arg(long)]
    pub bank: PathBuf,

    /// Id of the question being answered
    #[arg(long)]
    pub question: String,

    /// The answer to grade
    #[arg(long)]
    pub answer: String,

    /// Session id for retry tracking
    #[arg(long)]
    pub session: Option<String>,

    /// Model id to grade with (overrides config)
    #[arg(long)]
    pub model: Option<String>,
}

pub async fn run(args: EvaluateArgs) -> Result<()> {
    let mut config = ConfigLoader::load()?;
    if let Some(model) = args.model {
        config.model.model = model;
    }

    let question_bank = read_bank(&args.bank)?;
    let state = super::app_state(&config)?;

    let feedback = state
        .grader
        .grade(QuizAnswer {
            question_id: args.question,
            answer: args.answer,
            question_bank,
            current_score: 0,
            total_questions_answered: 0,
            session_id: args.session,
        })
        .await?;

    println!("{}", serde_json::to_string_pretty(&feedback)?);
    Ok(())
}

fn read_bank(path: &Path) -> Result<QuestionBank> {
    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    serde_json::from_str(&contents)
        .with_context(|| format!("{} is not a valid question bank", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn reads_question_bank_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("bank.json");
        std::fs::write(
            &path,
            r#"{"questions": [{"question_id": "q1", "question_type": "saq",
                "question_text": "Capital of France?", "ideal_answer": "Paris"}]}"#,
        )
        .unwrap();

        let bank = read_bank(&path).unwrap();
        assert_eq!(bank.questions.len(), 1);
        assert_eq!(bank.questions[0].ideal_answer.as_deref(), Some("Paris"));
    }

    #[test]
    fn rejects_invalid_bank() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("bank.json");
        std::fs::write(&path, "[1, 2, 3]").unwrap();

        let err = read_bank(&path).unwrap_err();
        assert!(err.to_string().contains("not a valid question bank"));
    }
}

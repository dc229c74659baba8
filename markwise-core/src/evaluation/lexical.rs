//! Deterministic word-overlap grading used when the model is unavailable.
//!
//! The ratio is the share of the reference answer's content words (stop
//! words removed) that also appear in the student's answer. It never grants
//! a retry.

use std::collections::HashSet;
use std::sync::LazyLock;

use regex::Regex;

use super::FeedbackCategory;

/// Lowest overlap ratio that counts as correct.
pub const LEXICAL_CORRECT_THRESHOLD: f64 = 0.85;

/// Lowest overlap ratio that counts as partially correct.
pub const LEXICAL_PARTIAL_THRESHOLD: f64 = 0.50;

static WORD: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[\p{L}\p{N}]+").expect("static regex is valid"));

const STOP_WORDS: &[&str] = &[
    "a", "about", "after", "all", "also", "an", "and", "any", "are", "as", "at", "be", "because",
    "been", "but", "by", "can", "could", "did", "do", "does", "for", "from", "had", "has", "have",
    "he", "her", "his", "how", "i", "if", "in", "into", "is", "it", "its", "may", "more", "most",
    "no", "not", "of", "on", "or", "other", "our", "she", "so", "some", "such", "than", "that",
    "the", "their", "them", "then", "there", "these", "they", "this", "those", "to", "too", "very",
    "was", "we", "were", "what", "when", "where", "which", "while", "who", "why", "will", "with",
    "would", "you", "your",
];

/// Outcome of a lexical comparison.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LexicalScore {
    pub ratio: f64,
    pub category: FeedbackCategory,
}

impl LexicalScore {
    pub fn is_correct(&self) -> bool {
        self.category == FeedbackCategory::Correct
    }
}

fn content_words(text: &str) -> HashSet<String> {
    let lowered = text.to_lowercase();
    WORD.find_iter(&lowered)
        .map(|m| m.as_str())
        .filter(|w| !STOP_WORDS.contains(w))
        .map(str::to_string)
        .collect()
}

fn normalized(text: &str) -> String {
    text.split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

/// Share of `ideal`'s content words present in `student`, in `[0.0, 1.0]`.
///
/// When the reference consists only of stop words the comparison falls back
/// to case- and whitespace-insensitive equality.
pub fn overlap_ratio(student: &str, ideal: &str) -> f64 {
    let expected = content_words(ideal);
    if expected.is_empty() {
        let equal = !normalized(ideal).is_empty() && normalized(ideal) == normalized(student);
        return if equal { 1.0 } else { 0.0 };
    }

    let given = content_words(student);
    let matched = expected.iter().filter(|w| given.contains(*w)).count();
    matched as f64 / expected.len() as f64
}

/// Grade `student` against `ideal` by word overlap.
pub fn score(student: &str, ideal: &str) -> LexicalScore {
    let ratio = overlap_ratio(student, ideal);
    let category = if ratio >= LEXICAL_CORRECT_THRESHOLD {
        FeedbackCategory::Correct
    } else if ratio >= LEXICAL_PARTIAL_THRESHOLD {
        FeedbackCategory::PartiallyCorrect
    } else {
        FeedbackCategory::Incorrect
    };
    LexicalScore { ratio, category }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identical_single_word_is_correct() {
        let result = score("Paris", "Paris");
        assert_eq!(result.ratio, 1.0);
        assert!(result.is_correct());
    }

    #[test]
    fn case_and_punctuation_are_ignored() {
        assert_eq!(overlap_ratio("paris.", "PARIS"), 1.0);
    }

    #[test]
    fn gibberish_is_incorrect() {
        let result = score("xyz123gibberish", "The powerhouse of the cell");
        assert_eq!(result.ratio, 0.0);
        assert_eq!(result.category, FeedbackCategory::Incorrect);
    }

    #[test]
    fn half_overlap_is_partial() {
        // content words: gravitational, pull, moon, sun
        let result = score("the moon pulls", "The gravitational pull of the moon and sun");
        assert_eq!(result.ratio, 0.25);
        let result = score("gravitational pull", "The gravitational pull of the moon and sun");
        assert_eq!(result.ratio, 0.5);
        assert_eq!(result.category, FeedbackCategory::PartiallyCorrect);
    }

    #[test]
    fn stop_words_do_not_count() {
        assert_eq!(overlap_ratio("the of and", "The nucleus of the atom"), 0.0);
    }

    #[test]
    fn stop_word_only_reference_uses_equality() {
        assert_eq!(overlap_ratio("It is", "it  is"), 1.0);
        assert_eq!(overlap_ratio("no", "it is"), 0.0);
    }

    #[test]
    fn empty_student_answer_scores_zero() {
        assert_eq!(overlap_ratio("", "Paris"), 0.0);
    }

    #[test]
    fn deterministic() {
        let a = score("energy from glucose", "cells make energy from glucose");
        let b = score("energy from glucose", "cells make energy from glucose");
        assert_eq!(a, b);
    }
}

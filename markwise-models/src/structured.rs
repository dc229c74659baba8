//! Strict parsing of structured model output.
//!
//! Models asked for JSON do not always return bare JSON: some wrap it in a
//! Markdown fence, some add a sentence before it. [`parse_structured`]
//! walks the balanced `{ ... }` spans in order, deserializes the first one
//! that fits the declared type and runs the type's [`Validate`] check. Anything that fails any of
//! those steps is an [`Error::InvalidStructuredOutput`]; nothing malformed
//! is passed downstream.

use serde::de::DeserializeOwned;

use crate::{Error, Result};

/// Semantic checks that serde alone cannot express (ranges, consistency).
pub trait Validate {
    /// Returns a human-readable reason when the value is unacceptable.
    fn validate(&self) -> std::result::Result<(), String>;
}

/// Parse model output into `T`, rejecting anything that does not conform.
pub fn parse_structured<T>(text: &str) -> Result<T>
where
    T: DeserializeOwned + Validate,
{
    let mut last_error = None;

    for candidate in json_object_candidates(text) {
        match serde_json::from_str::<T>(candidate) {
            Ok(value) => {
                value.validate().map_err(Error::InvalidStructuredOutput)?;
                return Ok(value);
            }
            Err(e) => last_error = Some(e.to_string()),
        }
    }

    Err(Error::InvalidStructuredOutput(last_error.unwrap_or_else(|| {
        format!("no JSON object found in: {}", preview(text))
    })))
}

/// Every balanced `{ ... }` span, one per opening brace, in order.
/// String escapes are honored.
fn json_object_candidates(text: &str) -> impl Iterator<Item = &str> {
    text.match_indices('{')
        .filter_map(move |(start, _)| balanced_object_at(text, start))
}

fn balanced_object_at(text: &str, start: usize) -> Option<&str> {
    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;

    for (offset, ch) in text[start..].char_indices() {
        if in_string {
            match ch {
                _ if escaped => escaped = false,
                '\\' => escaped = true,
                '"' => in_string = false,
                _ => {}
            }
            continue;
        }

        match ch {
            '"' => in_string = true,
            '{' => depth += 1,
            '}' => {
                depth -= 1;
                if depth == 0 {
                    return Some(&text[start..start + offset + ch.len_utf8()]);
                }
            }
            _ => {}
        }
    }

    None
}

fn preview(text: &str) -> String {
    const LIMIT: usize = 80;
    let trimmed = text.trim();
    match trimmed.char_indices().nth(LIMIT) {
        Some((idx, _)) => format!("{}...", &trimmed[..idx]),
        None => trimmed.to_string(),
    }
}

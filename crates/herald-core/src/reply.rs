//! Model reply parsing.
//!
//! Replies are free-form text that should hold exactly one JSON object,
//! optionally wrapped in a Markdown code fence. Every stage parses and
//! validates its own reply through [`parse_reply`].

use serde::de::DeserializeOwned;

use crate::domain::{StageError, StageResult};

const FENCE: &str = "```";

/// Remove a surrounding Markdown code fence (with or without a language tag).
pub fn strip_code_fence(raw: &str) -> &str {
    let mut text = raw.trim();
    if let Some(rest) = text.strip_prefix(FENCE) {
        // Drop the info string (`json`, `JSON`, ...) up to the first newline.
        text = match rest.find('\n') {
            Some(newline) => &rest[newline + 1..],
            None => rest.trim_start_matches(|c: char| c.is_ascii_alphabetic()),
        };
    }
    if let Some(rest) = text.trim_end().strip_suffix(FENCE) {
        text = rest;
    }
    text.trim()
}

/// Slice from the first `{` to the last `}`, if both exist in that order.
fn object_span(text: &str) -> Option<&str> {
    let start = text.find('{')?;
    let end = text.rfind('}')?;
    (start < end).then(|| &text[start..=end])
}

/// Parse a model reply into `T`.
///
/// Missing keys, null values, and wrong value types surface as
/// [`StageError::MalformedResponse`].
pub fn parse_reply<T: DeserializeOwned>(raw: &str) -> StageResult<T> {
    let text = strip_code_fence(raw);
    if text.is_empty() {
        return Err(StageError::MalformedResponse("empty reply".to_string()));
    }

    match serde_json::from_str::<T>(text) {
        Ok(value) => Ok(value),
        Err(first) => match object_span(text) {
            // Prose around the object: retry on the object alone.
            Some(span) if span.len() < text.len() => Ok(serde_json::from_str::<T>(span)?),
            _ => Err(first.into()),
        },
    }
}

//! Ordered announcement drafts.

use serde::{Deserialize, Serialize};
use tracing::warn;

use super::error::{StageError, StageResult};

/// Maximum characters per message, counted as Unicode scalar values.
pub const MAX_MESSAGE_CHARS: usize = 280;

/// Positional marker closing the headline message of a thread.
pub const FIRST_MARKER: &str = "(1/2)";

/// Positional marker closing the deep-dive message of a thread.
pub const SECOND_MARKER: &str = "(2/2)";

/// Attention marker opening the deep-dive message of a thread.
pub const ATTENTION_MARKER: &str = "【注目】";

/// Shape of a draft set, decided by how many summaries went in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DraftLayout {
    /// One self-contained message
    Single,
    /// Headline `(1/2)` followed by a deep dive `(2/2)`
    Thread,
}

impl DraftLayout {
    /// Layout for `summary_count` summaries; `None` when there are none.
    pub fn for_summaries(summary_count: usize) -> Option<Self> {
        match summary_count {
            0 => None,
            1 => Some(DraftLayout::Single),
            _ => Some(DraftLayout::Thread),
        }
    }

    pub fn message_count(self) -> usize {
        match self {
            DraftLayout::Single => 1,
            DraftLayout::Thread => 2,
        }
    }
}

/// An ordered sequence of 1 or 2 messages, validated against its layout.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DraftSet {
    layout: DraftLayout,
    messages: Vec<String>,
}

impl DraftSet {
    /// Validate `messages` against `layout`.
    ///
    /// Messages are trimmed. A thread message missing its positional marker
    /// gets it appended; one ending in the other message's marker has it
    /// replaced. A wrong message count or an empty message is a
    /// malformed response.
    pub fn new(layout: DraftLayout, messages: Vec<String>) -> StageResult<Self> {
        let expected = layout.message_count();
        if messages.len() != expected {
            return Err(StageError::MalformedResponse(format!(
                "expected {expected} message(s), got {}",
                messages.len()
            )));
        }

        let mut normalized = Vec::with_capacity(expected);
        for (i, message) in messages.into_iter().enumerate() {
            let message = message.trim().to_string();
            if message.is_empty() {
                return Err(StageError::MalformedResponse(format!(
                    "message {} is empty",
                    i + 1
                )));
            }
            normalized.push(match layout {
                DraftLayout::Single => message,
                DraftLayout::Thread => {
                    let (marker, other) = if i == 0 {
                        (FIRST_MARKER, SECOND_MARKER)
                    } else {
                        (SECOND_MARKER, FIRST_MARKER)
                    };
                    ensure_marker(message, i + 1, marker, other)
                }
            });
        }

        Ok(Self {
            layout,
            messages: normalized,
        })
    }

    pub fn layout(&self) -> DraftLayout {
        self.layout
    }

    pub fn messages(&self) -> &[String] {
        &self.messages
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    /// Messages longer than [`MAX_MESSAGE_CHARS`], as `(position, chars)`.
    pub fn overlong(&self) -> Vec<(usize, usize)> {
        self.messages
            .iter()
            .enumerate()
            .map(|(i, m)| (i + 1, m.chars().count()))
            .filter(|(_, chars)| *chars > MAX_MESSAGE_CHARS)
            .collect()
    }
}

/// End `message` with `marker`. `other` is the marker of the opposite
/// thread position, which the model sometimes puts on the wrong message.
fn ensure_marker(message: String, position: usize, marker: &str, other: &str) -> String {
    if message.ends_with(marker) {
        return message;
    }
    if let Some(body) = message.strip_suffix(other) {
        warn!(position, found = other, expected = marker, "Replacing swapped thread marker");
        return format!("{}{marker}", body.trim_end());
    }
    match message.rfind(marker) {
        Some(pos) => {
            let (kept, dropped) = message.split_at(pos + marker.len());
            warn!(position, dropped = %dropped.trim(), "Cutting text after thread marker");
            kept.to_string()
        }
        None => format!("{message}{marker}"),
    }
}

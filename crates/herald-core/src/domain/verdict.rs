//! Reviewer verdicts.

use serde::{Deserialize, Serialize};

/// The two labels a reviewer may return.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum VerdictLabel {
    Approved,
    NeedsReview,
}

impl VerdictLabel {
    /// Parse a reply label. Case and inner whitespace are ignored, so
    /// "Needs Review" and "NeedsReview" are the same label.
    pub fn parse(label: &str) -> Option<Self> {
        let folded: String = label
            .chars()
            .filter(|c| !c.is_whitespace() && *c != '_' && *c != '-')
            .flat_map(char::to_lowercase)
            .collect();
        match folded.as_str() {
            "approved" => Some(VerdictLabel::Approved),
            "needsreview" => Some(VerdictLabel::NeedsReview),
            _ => None,
        }
    }
}

impl std::fmt::Display for VerdictLabel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            VerdictLabel::Approved => write!(f, "Approved"),
            VerdictLabel::NeedsReview => write!(f, "NeedsReview"),
        }
    }
}

/// Reviewer judgment plus its rationale.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EvaluationVerdict {
    pub label: VerdictLabel,
    pub reason: String,
}

impl EvaluationVerdict {
    pub fn approved(reason: impl Into<String>) -> Self {
        Self {
            label: VerdictLabel::Approved,
            reason: reason.into(),
        }
    }

    pub fn needs_review(reason: impl Into<String>) -> Self {
        Self {
            label: VerdictLabel::NeedsReview,
            reason: reason.into(),
        }
    }
}

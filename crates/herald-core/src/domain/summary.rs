//! Plain-language digest of one merged change.

use serde::{Deserialize, Serialize};

/// Model-generated summary of exactly one `ChangeRecord`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Summary {
    /// Pull request number the summary was derived from
    pub change_number: u64,
    /// Short descriptive text (~100 characters, not enforced)
    pub text: String,
    /// Topic tags without a leading `#`; order carries no meaning
    pub tags: Vec<String>,
}

impl Summary {
    /// Build a summary, normalizing its tags.
    pub fn new(change_number: u64, text: impl Into<String>, tags: Vec<String>) -> Self {
        Self {
            change_number,
            text: text.into().trim().to_string(),
            tags: normalize_tags(tags),
        }
    }
}

/// Strip leading `#` and whitespace, drop empties and duplicates.
pub fn normalize_tags(tags: Vec<String>) -> Vec<String> {
    let mut out: Vec<String> = Vec::with_capacity(tags.len());
    for tag in tags {
        let tag = tag.trim().trim_start_matches(['#', '＃']).trim();
        if tag.is_empty() || out.iter().any(|t| t == tag) {
            continue;
        }
        out.push(tag.to_string());
    }
    out
}

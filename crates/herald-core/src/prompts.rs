//! Instruction templates for the three model calls.
//!
//! Templates are fixed text with `{slot}` placeholders filled by the render
//! functions below. The audience reads Japanese, so every template asks for
//! Japanese output while keeping the instructions themselves in English.

use herald_gateway::ChangeRecord;

use crate::domain::draft::{ATTENTION_MARKER, FIRST_MARKER, MAX_MESSAGE_CHARS, SECOND_MARKER};
use crate::domain::Summary;

const SUMMARY_TEMPLATE: &str = r#"# Role
You are an experienced political journalist who explains policy changes to ordinary citizens.

# Objective
Summarize the policy update below in about 100 Japanese characters so that a follower interested in policy instantly understands what changed and why it matters.

# Rules
- Always cover both the change itself and its effect or purpose.
- Avoid jargon; use plain words a middle-school student would understand.
- Stay strictly factual and politically neutral. Do not add opinions or speculation.
- Write the summary and the tags in Japanese.
- Reply with the JSON object described below and nothing else.

# Input
```
{input}
```

# Output format
A JSON object with exactly two keys: "summary" (string) and "tags" (array of strings, without a leading #).
{
  "summary": "...",
  "tags": ["...", "..."]
}
"#;

const SINGLE_DRAFT_TEMPLATE: &str = r#"# Role
You are the experienced editor-in-chief running a political party's social media.

# Objective
Write one self-contained post announcing today's policy update.

# Rules
- Explain the background and the social significance of the policy within this single post.
- Keep an objective, trustworthy tone. Do not sound enthusiastic and never use "!".
- Stay within {max_chars} Japanese characters.
- Do not include emoji, icons, or hashtags.
- Write the post in Japanese.
- Reply with the JSON object described below and nothing else.
{feedback}
# Today's policy update
{summaries}

# Output format
A JSON object with a single key "posts" whose value is an array holding exactly one string.
{
  "posts": ["..."]
}
"#;

const THREAD_DRAFT_TEMPLATE: &str = r#"# Role
You are the experienced editor-in-chief running a political party's social media.

# Objective
Write a two-post thread announcing today's policy updates.

# Rules
- Post 1 (headline):
    - Cover every update below as a concise bulleted list.
    - Announce that the next post explains the most important update in depth.
    - End with "{first_marker}".
- Post 2 (deep dive):
    - Begin with "{attention_marker}".
    - Pick exactly one update, the most important one, and explain its background and social significance in more detail.
    - End with "{second_marker}".
- Keep an objective, trustworthy tone. Do not sound enthusiastic and never use "!".
- Stay within {max_chars} Japanese characters per post.
- Do not include emoji, icons, or hashtags.
- Write both posts in Japanese.
- Reply with the JSON object described below and nothing else.
{feedback}
# Today's policy updates
{summaries}

# Output format
A JSON object with a single key "posts" whose value is an array holding exactly two strings, in posting order.
{
  "posts": ["...", "..."]
}
"#;

const REVIEW_TEMPLATE: &str = r#"# Role
You are an experienced content reviewer. Your task is to confirm that posts about to be published meet quality and clarity standards.

# Objective
Review the draft posts below and decide whether they can be published as they are or need to be rewritten.

# Criteria
1. Clarity: can someone without expert knowledge understand the posts? When several updates are covered, are they organized (for example as a bulleted list) and easy to follow?
2. Accuracy: is every statement factual, with nothing misleading?
3. Consistency: when there are several posts, are they consistent with each other and do they read naturally in sequence?
4. Tone: are the posts neutral and objective, avoiding aggressive, discriminatory, or needlessly inflammatory wording?
5. Covering several updates at once is not a problem in itself.

# Draft posts
```
{drafts}
```

# Output format
A JSON object with exactly two keys:
- "evaluation": "Approved" if the posts can be published, "Needs Review" if they must be rewritten.
- "reason": a short explanation of the decision, in Japanese.
{
  "evaluation": "...",
  "reason": "..."
}
"#;

/// Summarizer input text: the title, a blank line, then the body.
pub fn change_text(record: &ChangeRecord) -> String {
    format!("タイトル: {}\n\n{}", record.title, record.body)
}

pub fn summary_prompt(record: &ChangeRecord) -> String {
    SUMMARY_TEMPLATE.replace("{input}", &change_text(record))
}

fn bullet_list(summaries: &[Summary]) -> String {
    summaries
        .iter()
        .map(|s| format!("- {}", s.text))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Extra rule block listing earlier rejection reasons; empty when there are none.
fn feedback_block(rejections: &[String]) -> String {
    if rejections.is_empty() {
        return String::new();
    }
    let reasons = rejections
        .iter()
        .map(|r| format!("    - {r}"))
        .collect::<Vec<_>>()
        .join("\n");
    format!("- Earlier drafts were rejected by the reviewer for these reasons; avoid repeating them:\n{reasons}\n")
}

pub fn single_draft_prompt(summary: &Summary, rejections: &[String]) -> String {
    SINGLE_DRAFT_TEMPLATE
        .replace("{max_chars}", &MAX_MESSAGE_CHARS.to_string())
        .replace("{feedback}", &feedback_block(rejections))
        .replace("{summaries}", &bullet_list(std::slice::from_ref(summary)))
}

pub fn thread_draft_prompt(summaries: &[Summary], rejections: &[String]) -> String {
    THREAD_DRAFT_TEMPLATE
        .replace("{first_marker}", FIRST_MARKER)
        .replace("{second_marker}", SECOND_MARKER)
        .replace("{attention_marker}", ATTENTION_MARKER)
        .replace("{max_chars}", &MAX_MESSAGE_CHARS.to_string())
        .replace("{feedback}", &feedback_block(rejections))
        .replace("{summaries}", &bullet_list(summaries))
}

/// Drafts joined with positional labels.
pub fn labelled_drafts(messages: &[String]) -> String {
    messages
        .iter()
        .enumerate()
        .map(|(i, m)| format!("--- Post {} ---\n{}", i + 1, m))
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn review_prompt(messages: &[String]) -> String {
    REVIEW_TEMPLATE.replace("{drafts}", &labelled_drafts(messages))
}

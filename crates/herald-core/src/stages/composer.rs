//! Draft Composer: one model call turning summaries into a draft set.

use std::sync::Arc;

use herald_gateway::ModelGateway;
use serde::Deserialize;
use tracing::{info, warn};

use crate::domain::{DraftLayout, DraftSet, StageError, StageResult, Summary, MAX_MESSAGE_CHARS};
use crate::prompts;
use crate::reply::parse_reply;

#[derive(Debug, Deserialize)]
struct DraftReply {
    #[serde(alias = "tweets")]
    posts: Vec<String>,
}

pub struct Composer {
    model: Arc<dyn ModelGateway>,
    /// Feed earlier rejection reasons back into the prompt
    feedback: bool,
}

impl Composer {
    pub fn new(model: Arc<dyn ModelGateway>, feedback: bool) -> Self {
        Self { model, feedback }
    }

    /// Compose drafts for `summaries`.
    ///
    /// `rejections` are only rendered into the prompt when feedback mode is
    /// on; otherwise every attempt sends the identical prompt.
    pub async fn compose(
        &self,
        summaries: &[Summary],
        rejections: &[String],
    ) -> StageResult<DraftSet> {
        let layout = DraftLayout::for_summaries(summaries.len())
            .ok_or_else(|| StageError::EmptyInput("no summaries to compose from".to_string()))?;

        let rejections: &[String] = if self.feedback { rejections } else { &[] };
        let prompt = match (layout, summaries) {
            (DraftLayout::Single, [summary]) => prompts::single_draft_prompt(summary, rejections),
            _ => prompts::thread_draft_prompt(summaries, rejections),
        };

        info!(?layout, summaries = summaries.len(), feedback = !rejections.is_empty(), "Requesting drafts");
        let reply = self.model.generate(&prompt).await?;
        let parsed: DraftReply = parse_reply(&reply)?;
        let drafts = DraftSet::new(layout, parsed.posts)?;

        for (i, message) in drafts.messages().iter().enumerate() {
            info!(position = i + 1, chars = message.chars().count(), text = %message, "Draft");
        }
        for (position, chars) in drafts.overlong() {
            warn!(position, chars, limit = MAX_MESSAGE_CHARS, "Draft exceeds the character limit");
        }
        Ok(drafts)
    }
}

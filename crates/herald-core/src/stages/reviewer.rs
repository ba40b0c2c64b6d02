//! Reviewer: model self-review of a draft set.

use std::sync::Arc;

use herald_gateway::ModelGateway;
use serde::Deserialize;
use tracing::info;

use crate::domain::{EvaluationVerdict, StageError, StageResult, VerdictLabel};
use crate::prompts;
use crate::reply::parse_reply;

#[derive(Debug, Deserialize)]
struct ReviewReply {
    evaluation: String,
    reason: String,
}

pub struct Reviewer {
    model: Arc<dyn ModelGateway>,
}

impl Reviewer {
    pub fn new(model: Arc<dyn ModelGateway>) -> Self {
        Self { model }
    }

    /// Judge `messages`. No drafts means no model call and no verdict.
    pub async fn review(&self, messages: &[String]) -> StageResult<EvaluationVerdict> {
        if messages.is_empty() {
            return Err(StageError::EmptyInput("no drafts to review".to_string()));
        }

        let reply = self.model.generate(&prompts::review_prompt(messages)).await?;
        let parsed: ReviewReply = parse_reply(&reply)?;
        let label = VerdictLabel::parse(&parsed.evaluation).ok_or_else(|| {
            StageError::MalformedResponse(format!(
                "unrecognized verdict label {:?}",
                parsed.evaluation
            ))
        })?;

        let verdict = EvaluationVerdict {
            label,
            reason: parsed.reason.trim().to_string(),
        };
        info!(verdict = %verdict.label, reason = %verdict.reason, "Review finished");
        Ok(verdict)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use herald_gateway::fakes::ScriptedModel;

    fn drafts() -> Vec<String> {
        vec!["見出し(1/2)".to_string(), "【注目】詳細(2/2)".to_string()]
    }

    #[tokio::test]
    async fn test_approved_reply() {
        let model = Arc::new(ScriptedModel::new().with_reply(
            "```json\n{\"evaluation\":\"Approved\",\"reason\":\"clear and consistent\"}\n```",
        ));
        let reviewer = Reviewer::new(model.clone());

        let verdict = reviewer.review(&drafts()).await.unwrap();

        assert_eq!(verdict, EvaluationVerdict::approved("clear and consistent"));
        assert!(model.prompts()[0].contains("--- Post 2 ---\n【注目】詳細(2/2)"));
    }

    #[tokio::test]
    async fn test_needs_review_with_space() {
        let model = Arc::new(ScriptedModel::new().with_reply(
            "{\"evaluation\":\"Needs Review\",\"reason\":\"tone too enthusiastic\"}",
        ));
        let reviewer = Reviewer::new(model);

        let verdict = reviewer.review(&drafts()).await.unwrap();
        assert_eq!(verdict, EvaluationVerdict::needs_review("tone too enthusiastic"));
    }

    #[tokio::test]
    async fn test_unknown_label_is_malformed() {
        let model = Arc::new(
            ScriptedModel::new().with_reply("{\"evaluation\":\"Maybe\",\"reason\":\"unsure\"}"),
        );
        let reviewer = Reviewer::new(model);

        let err = reviewer.review(&drafts()).await.unwrap_err();
        assert!(matches!(err, StageError::MalformedResponse(ref m) if m.contains("Maybe")));
    }

    #[tokio::test]
    async fn test_missing_reason_is_malformed() {
        let model = Arc::new(ScriptedModel::new().with_reply("{\"evaluation\":\"Approved\"}"));
        let reviewer = Reviewer::new(model);

        let err = reviewer.review(&drafts()).await.unwrap_err();
        assert!(matches!(err, StageError::MalformedResponse(_)));
    }

    #[tokio::test]
    async fn test_empty_drafts_skip_the_model() {
        let model = Arc::new(ScriptedModel::new());
        let reviewer = Reviewer::new(model.clone());

        let err = reviewer.review(&[]).await.unwrap_err();

        assert!(matches!(err, StageError::EmptyInput(_)));
        assert_eq!(model.calls(), 0);
    }
}

//! Human-escalation seam for runs that exhaust their review attempts.

use async_trait::async_trait;
use tracing::warn;

use crate::orchestrator::state::RunState;

/// Called once when a run gives up after repeated NeedsReview verdicts.
#[async_trait]
pub trait Escalation: Send + Sync {
    async fn escalate(&self, run_id: &str, state: &RunState);
}

/// Default escalation: a warning carrying every rejection reason.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogEscalation;

#[async_trait]
impl Escalation for LogEscalation {
    async fn escalate(&self, run_id: &str, state: &RunState) {
        warn!(
            event = "run.escalated",
            run_id = %run_id,
            attempts = state.attempts,
            rejections = ?state.rejections,
            drafts = ?state.draft_messages(),
            "Drafts were rejected on every attempt; human review needed"
        );
    }
}

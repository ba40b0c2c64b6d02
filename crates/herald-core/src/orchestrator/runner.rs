//! Sequential graph runner.
//!
//! Nodes run one at a time. Each node reads the current `RunState`, returns
//! a `StateUpdate`, and the runner merges it before choosing the next node.

use std::sync::Arc;
use std::time::Instant;

use herald_gateway::{ChangeSource, ModelGateway, PublishTarget};
use serde::{Deserialize, Serialize};
use tracing::{info, Instrument};
use uuid::Uuid;

use crate::config::HeraldConfig;
use crate::domain::StageError;
use crate::obs;
use crate::orchestrator::escalation::{Escalation, LogEscalation};
use crate::orchestrator::route::{next_node, route_evaluation, Node, Route, Termination};
use crate::orchestrator::state::{RunState, StageFailure, StateChange, StateUpdate};
use crate::stages::{Composer, Publisher, Reviewer, SourceMonitor, Summarizer};

/// How a run ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "outcome")]
pub enum RunOutcome {
    Published,
    /// At least one message failed to post
    PublishFailed,
    /// No usable verdict; `stage` is the earliest stage with empty output
    Aborted { stage: Node },
    /// Every compose attempt was rejected
    RetriesExhausted,
}

impl RunOutcome {
    /// Process exit code for this outcome.
    pub fn exit_code(self) -> u8 {
        match self {
            RunOutcome::Published => 0,
            RunOutcome::Aborted { stage: Node::Monitor } => 1,
            RunOutcome::Aborted { stage: Node::Summarizer } => 2,
            RunOutcome::Aborted { stage: Node::Reviewer } => 3,
            RunOutcome::Aborted { stage: Node::Composer } => 4,
            RunOutcome::RetriesExhausted => 5,
            RunOutcome::PublishFailed | RunOutcome::Aborted { stage: Node::Publisher } => 6,
        }
    }

    pub fn is_success(self) -> bool {
        self == RunOutcome::Published
    }
}

impl std::fmt::Display for RunOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RunOutcome::Published => write!(f, "published"),
            RunOutcome::PublishFailed => write!(f, "publish_failed"),
            RunOutcome::Aborted { stage } => write!(f, "aborted:{stage}"),
            RunOutcome::RetriesExhausted => write!(f, "retries_exhausted"),
        }
    }
}

/// Everything a finished run produced.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunReport {
    pub run_id: String,
    pub outcome: RunOutcome,
    /// Executed nodes, in order
    pub path: Vec<Node>,
    pub state: RunState,
}

/// Owns the stages and drives one run at a time.
pub struct Orchestrator {
    monitor: SourceMonitor,
    summarizer: Summarizer,
    composer: Composer,
    reviewer: Reviewer,
    publisher: Publisher,
    escalation: Arc<dyn Escalation>,
    max_attempts: u32,
}

impl Orchestrator {
    /// Wire every stage from `config` and the three collaborators.
    pub fn new(
        config: &HeraldConfig,
        source: Arc<dyn ChangeSource>,
        model: Arc<dyn ModelGateway>,
        target: Arc<dyn PublishTarget>,
    ) -> Self {
        Self {
            monitor: SourceMonitor::new(source, config.repository.clone()),
            summarizer: Summarizer::new(Arc::clone(&model), config.concurrency),
            composer: Composer::new(Arc::clone(&model), config.feedback),
            reviewer: Reviewer::new(model),
            publisher: Publisher::new(target),
            escalation: Arc::new(LogEscalation),
            max_attempts: config.max_attempts.max(1),
        }
    }

    /// Replace the default log-only escalation.
    pub fn with_escalation(mut self, escalation: Arc<dyn Escalation>) -> Self {
        self.escalation = escalation;
        self
    }

    /// Run the graph from Monitor to a terminal state.
    pub async fn run(&self, target_date: Option<String>) -> RunReport {
        let run_id = Uuid::new_v4().to_string();
        let span = obs::run_span(&run_id);
        self.run_with_id(run_id, target_date).instrument(span).await
    }

    async fn run_with_id(&self, run_id: String, target_date: Option<String>) -> RunReport {
        let started = Instant::now();
        obs::emit_run_started(&run_id, self.monitor.repository(), target_date.as_deref());

        let mut state = RunState::new(target_date);
        let mut path = Vec::new();
        let mut node = Node::Monitor;

        let outcome = loop {
            path.push(node);
            obs::emit_node_entered(&run_id, node, state.attempts);

            let update = self.execute(node, &state).await;
            for failure in &update.failures {
                obs::emit_stage_failed(&run_id, failure.stage, failure.kind, &failure.message);
            }
            state.merge(update);

            node = match node {
                Node::Reviewer => {
                    let route = route_evaluation(&state, self.max_attempts);
                    obs::emit_route_decided(&run_id, route, state.attempts);
                    match route.target() {
                        Some(next) => next,
                        None if route == Route::Abort(Termination::RetriesExhausted) => {
                            self.escalation.escalate(&run_id, &state).await;
                            break RunOutcome::RetriesExhausted;
                        }
                        None => {
                            break RunOutcome::Aborted {
                                stage: state.first_empty_stage(),
                            };
                        }
                    }
                }
                Node::Publisher => {
                    let published = state.publish.as_ref().is_some_and(|r| r.success());
                    break if published {
                        RunOutcome::Published
                    } else {
                        RunOutcome::PublishFailed
                    };
                }
                other => match next_node(other) {
                    Some(next) => next,
                    None => break RunOutcome::Aborted { stage: other },
                },
            };
        };

        let duration_ms = started.elapsed().as_millis() as u64;
        obs::emit_run_finished(
            &run_id,
            &outcome.to_string(),
            duration_ms,
            state.attempts,
            outcome.is_success(),
        );

        RunReport {
            run_id,
            outcome,
            path,
            state,
        }
    }

    /// Run one node against a read-only view of the state.
    async fn execute(&self, node: Node, state: &RunState) -> StateUpdate {
        match node {
            Node::Monitor => match self.monitor.fetch(state.target_date.as_deref()).await {
                Ok(changes) => StateUpdate::new(StateChange::Changes(changes)),
                Err(e) => StateUpdate::new(StateChange::Changes(Vec::new())).with_failure(node, &e),
            },
            Node::Summarizer => {
                if state.changes.is_empty() {
                    let err = StageError::EmptyInput("no change records to summarize".to_string());
                    return StateUpdate::new(StateChange::Summaries(Vec::new()))
                        .with_failure(node, &err);
                }
                let batch = self.summarizer.summarize_all(&state.changes).await;
                let mut update = StateUpdate::new(StateChange::Summaries(batch.summaries));
                for (number, err) in batch.dropped {
                    update.failures.push(StageFailure {
                        stage: node,
                        kind: err.kind(),
                        message: format!("#{number}: {err}"),
                    });
                }
                update
            }
            Node::Composer => {
                match self
                    .composer
                    .compose(&state.summaries, &state.rejections)
                    .await
                {
                    Ok(drafts) => StateUpdate::new(StateChange::Drafts(Some(drafts))),
                    Err(e) => StateUpdate::new(StateChange::Drafts(None)).with_failure(node, &e),
                }
            }
            Node::Reviewer => match self.reviewer.review(state.draft_messages()).await {
                Ok(verdict) => StateUpdate::new(StateChange::Verdict(Some(verdict))),
                Err(e) => StateUpdate::new(StateChange::Verdict(None)).with_failure(node, &e),
            },
            Node::Publisher => {
                let report = self.publisher.publish(state.draft_messages()).await;
                info!(posted = report.posted.len(), success = report.success(), "Publisher finished");
                let failure = report.failure.clone();
                let update = StateUpdate::new(StateChange::Published(report));
                match failure {
                    Some(e) => update.with_failure(node, &e),
                    None => update,
                }
            }
        }
    }
}

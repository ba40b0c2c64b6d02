//! Run state and the partial updates nodes hand back.

use herald_gateway::ChangeRecord;
use serde::{Deserialize, Serialize};

use crate::domain::{DraftSet, EvaluationVerdict, FailureKind, StageError, Summary, VerdictLabel};
use crate::orchestrator::route::Node;
use crate::stages::PublishReport;

/// A stage failure, kept for diagnostics and abort attribution.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StageFailure {
    pub stage: Node,
    pub kind: FailureKind,
    pub message: String,
}

impl StageFailure {
    pub fn new(stage: Node, err: &StageError) -> Self {
        Self {
            stage,
            kind: err.kind(),
            message: err.to_string(),
        }
    }
}

/// The record threaded through one run. Only the orchestrator writes it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunState {
    /// `YYYY-MM-DD` as given; `None` selects the trailing 24 hours
    pub target_date: Option<String>,
    pub changes: Vec<ChangeRecord>,
    pub summaries: Vec<Summary>,
    pub drafts: Option<DraftSet>,
    pub verdict: Option<EvaluationVerdict>,
    /// Composer invocations so far
    pub attempts: u32,
    /// Rationales of every NeedsReview verdict, oldest first
    pub rejections: Vec<String>,
    pub failures: Vec<StageFailure>,
    pub publish: Option<PublishReport>,
}

/// The single field a node produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StateChange {
    Changes(Vec<ChangeRecord>),
    Summaries(Vec<Summary>),
    Drafts(Option<DraftSet>),
    Verdict(Option<EvaluationVerdict>),
    Published(PublishReport),
}

/// Partial update returned by a node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StateUpdate {
    pub change: StateChange,
    pub failures: Vec<StageFailure>,
}

impl StateUpdate {
    pub fn new(change: StateChange) -> Self {
        Self {
            change,
            failures: Vec::new(),
        }
    }

    pub fn with_failure(mut self, stage: Node, err: &StageError) -> Self {
        self.failures.push(StageFailure::new(stage, err));
        self
    }
}

impl RunState {
    pub fn new(target_date: Option<String>) -> Self {
        Self {
            target_date,
            ..Self::default()
        }
    }

    /// Apply a node's update.
    ///
    /// New drafts count as one compose attempt and clear the previous
    /// verdict. A NeedsReview verdict appends its rationale to `rejections`.
    pub fn merge(&mut self, update: StateUpdate) {
        match update.change {
            StateChange::Changes(changes) => self.changes = changes,
            StateChange::Summaries(summaries) => self.summaries = summaries,
            StateChange::Drafts(drafts) => {
                self.attempts += 1;
                self.drafts = drafts;
                self.verdict = None;
            }
            StateChange::Verdict(verdict) => {
                if let Some(v) = &verdict {
                    if v.label == VerdictLabel::NeedsReview {
                        self.rejections.push(v.reason.clone());
                    }
                }
                self.verdict = verdict;
            }
            StateChange::Published(report) => self.publish = Some(report),
        }
        self.failures.extend(update.failures);
    }

    /// Current draft messages; empty when there are none.
    pub fn draft_messages(&self) -> &[String] {
        self.drafts.as_ref().map(DraftSet::messages).unwrap_or(&[])
    }

    /// Earliest stage whose output is empty, for attributing an abort.
    pub fn first_empty_stage(&self) -> Node {
        if self.changes.is_empty() {
            Node::Monitor
        } else if self.summaries.is_empty() {
            Node::Summarizer
        } else if self.drafts.is_none() {
            Node::Composer
        } else {
            Node::Reviewer
        }
    }

    /// Failures recorded for `stage`.
    pub fn failures_for(&self, stage: Node) -> impl Iterator<Item = &StageFailure> {
        self.failures.iter().filter(move |f| f.stage == stage)
    }
}

//! Graph edges and the conditional branch after review.

use serde::{Deserialize, Serialize};

use crate::domain::VerdictLabel;
use crate::orchestrator::state::RunState;

/// A node in the announcement graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Node {
    Monitor,
    Summarizer,
    Composer,
    Reviewer,
    Publisher,
}

impl std::fmt::Display for Node {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Node::Monitor => "monitor",
            Node::Summarizer => "summarizer",
            Node::Composer => "composer",
            Node::Reviewer => "reviewer",
            Node::Publisher => "publisher",
        };
        write!(f, "{s}")
    }
}

/// Why a run ended without publishing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Termination {
    /// The reviewer produced no usable verdict
    NoVerdict,
    /// Every allowed compose attempt was rejected
    RetriesExhausted,
}

/// Decision taken after the reviewer runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Route {
    Publish,
    Recompose,
    Abort(Termination),
}

impl Route {
    /// Node executed next, or `None` when the run ends.
    pub fn target(self) -> Option<Node> {
        match self {
            Route::Publish => Some(Node::Publisher),
            Route::Recompose => Some(Node::Composer),
            Route::Abort(_) => None,
        }
    }
}

impl std::fmt::Display for Route {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Route::Publish => write!(f, "publish"),
            Route::Recompose => write!(f, "recompose"),
            Route::Abort(Termination::NoVerdict) => write!(f, "abort:no_verdict"),
            Route::Abort(Termination::RetriesExhausted) => write!(f, "abort:retries_exhausted"),
        }
    }
}

/// Unconditional successor of `node`.
///
/// `Reviewer` has no fixed successor (see [`route_evaluation`]) and
/// `Publisher` is terminal.
pub fn next_node(node: Node) -> Option<Node> {
    match node {
        Node::Monitor => Some(Node::Summarizer),
        Node::Summarizer => Some(Node::Composer),
        Node::Composer => Some(Node::Reviewer),
        Node::Reviewer | Node::Publisher => None,
    }
}

/// Branch on the reviewer's verdict.
///
/// No verdict aborts without looping. `Approved` publishes. `NeedsReview`
/// recomposes while fewer than `max_attempts` compose attempts have run.
pub fn route_evaluation(state: &RunState, max_attempts: u32) -> Route {
    match state.verdict.as_ref().map(|v| v.label) {
        None => Route::Abort(Termination::NoVerdict),
        Some(VerdictLabel::Approved) => Route::Publish,
        Some(VerdictLabel::NeedsReview) if state.attempts >= max_attempts => {
            Route::Abort(Termination::RetriesExhausted)
        }
        Some(VerdictLabel::NeedsReview) => Route::Recompose,
    }
}

//! Announcement graph: Monitor → Summarizer → Composer → Reviewer, then
//! Publisher, back to Composer, or end.

pub mod escalation;
pub mod route;
pub mod runner;
pub mod state;

pub use escalation::{Escalation, LogEscalation};
pub use route::{next_node, route_evaluation, Node, Route, Termination};
pub use runner::{Orchestrator, RunOutcome, RunReport};
pub use state::{RunState, StageFailure, StateChange, StateUpdate};

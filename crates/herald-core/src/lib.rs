//! Herald Core Library
//!
//! Turns merged pull requests into a reviewed announcement thread:
//! the five stages, their prompts and reply parsing, the orchestrator
//! that sequences them, plus configuration and tracing setup.

pub mod config;
pub mod domain;
pub mod obs;
pub mod orchestrator;
pub mod prompts;
pub mod reply;
pub mod stages;
pub mod telemetry;

pub use config::{ConfigError, HeraldConfig};

pub use domain::{
    DraftLayout, DraftSet, EvaluationVerdict, FailureKind, StageError, StageResult, Summary,
    VerdictLabel,
};

pub use orchestrator::{
    Escalation, LogEscalation, Node, Orchestrator, Route, RunOutcome, RunReport, RunState,
    Termination,
};

pub use stages::{PublishReport, SimulatedTarget};

pub use herald_gateway::{ChangeRecord, ChangeSource, GatewayError, ModelGateway, PostId, PublishTarget};

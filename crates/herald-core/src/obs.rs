//! Structured lifecycle events for a Herald run.
//!
//! - `run_span` is the `herald.run` span, tagged with the run id
//! - `emit_*` functions log one event each, keyed by an `event` field

use tracing::{info, warn};

use crate::domain::FailureKind;
use crate::orchestrator::{Node, Route};

/// The span every event of one run is recorded under.
///
/// The run crosses `.await` points, so attach it with `tracing::Instrument`.
pub fn run_span(run_id: &str) -> tracing::Span {
    tracing::info_span!("herald.run", run_id = %run_id)
}

pub fn emit_run_started(run_id: &str, repository: &str, target_date: Option<&str>) {
    info!(
        event = "run.started",
        run_id = %run_id,
        repository = %repository,
        target_date = target_date.unwrap_or("trailing-24h"),
    );
}

pub fn emit_node_entered(run_id: &str, node: Node, attempt: u32) {
    info!(event = "node.entered", run_id = %run_id, node = %node, attempt = attempt);
}

pub fn emit_route_decided(run_id: &str, route: Route, attempts: u32) {
    info!(event = "route.decided", run_id = %run_id, route = %route, attempts = attempts);
}

/// Failures are logged at `warn` with their tag as a separate field.
pub fn emit_stage_failed(run_id: &str, stage: Node, kind: FailureKind, error: &dyn std::fmt::Display) {
    warn!(
        event = "stage.failed",
        run_id = %run_id,
        stage = %stage,
        kind = %kind,
        error = %error,
    );
}

pub fn emit_run_finished(run_id: &str, outcome: &str, duration_ms: u64, attempts: u32, success: bool) {
    info!(
        event = "run.finished",
        run_id = %run_id,
        outcome = %outcome,
        duration_ms = duration_ms,
        attempts = attempts,
        success = success,
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_run_span_create() {
        let _guard = run_span("test-run-id").entered();
        emit_node_entered("test-run-id", Node::Monitor, 0);
    }
}

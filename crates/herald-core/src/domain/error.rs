//! Stage-level error taxonomy for Herald.

use herald_gateway::GatewayError;
use serde::{Deserialize, Serialize};

/// Coarse failure tag the orchestrator branches and logs on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
    /// Missing credential, malformed date, rejected request
    Precondition,
    /// Network, timeout, or quota failure
    Transport,
    /// Reply could not be parsed or lacked required keys
    MalformedResponse,
    /// Nothing to work on; the stage did not call out
    EmptyInput,
}

impl std::fmt::Display for FailureKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            FailureKind::Precondition => "precondition",
            FailureKind::Transport => "transport",
            FailureKind::MalformedResponse => "malformed_response",
            FailureKind::EmptyInput => "empty_input",
        };
        write!(f, "{s}")
    }
}

/// Errors produced by a single pipeline stage.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error, Serialize, Deserialize)]
#[serde(tag = "kind", content = "message", rename_all = "snake_case")]
pub enum StageError {
    #[error("precondition failed: {0}")]
    Precondition(String),

    #[error("transport failure: {0}")]
    Transport(String),

    #[error("malformed response: {0}")]
    MalformedResponse(String),

    #[error("empty input: {0}")]
    EmptyInput(String),
}

impl StageError {
    pub fn kind(&self) -> FailureKind {
        match self {
            StageError::Precondition(_) => FailureKind::Precondition,
            StageError::Transport(_) => FailureKind::Transport,
            StageError::MalformedResponse(_) => FailureKind::MalformedResponse,
            StageError::EmptyInput(_) => FailureKind::EmptyInput,
        }
    }
}

impl From<GatewayError> for StageError {
    fn from(err: GatewayError) -> Self {
        match err {
            GatewayError::MissingCredential(_) | GatewayError::InvalidRequest(_) => {
                StageError::Precondition(err.to_string())
            }
            GatewayError::Transport(_) | GatewayError::Quota(_) => {
                StageError::Transport(err.to_string())
            }
            GatewayError::Response(_) => StageError::MalformedResponse(err.to_string()),
        }
    }
}

impl From<serde_json::Error> for StageError {
    fn from(err: serde_json::Error) -> Self {
        StageError::MalformedResponse(err.to_string())
    }
}

/// Result type for stage operations.
pub type StageResult<T> = std::result::Result<T, StageError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_credential_is_precondition() {
        let err = StageError::from(GatewayError::MissingCredential("GEMINI_API_KEY".into()));
        assert_eq!(err.kind(), FailureKind::Precondition);
        assert!(err.to_string().contains("GEMINI_API_KEY"));
    }

    #[test]
    fn test_quota_is_transport() {
        let err = StageError::from(GatewayError::Quota("429".into()));
        assert_eq!(err.kind(), FailureKind::Transport);
    }

    #[test]
    fn test_bad_response_is_malformed() {
        let err = StageError::from(GatewayError::Response("no candidates".into()));
        assert_eq!(err.kind(), FailureKind::MalformedResponse);
    }

    #[test]
    fn test_json_error_is_malformed() {
        let json_err = serde_json::from_str::<serde_json::Value>("{not json").unwrap_err();
        assert_eq!(
            StageError::from(json_err).kind(),
            FailureKind::MalformedResponse
        );
    }

    #[test]
    fn test_failure_kind_display() {
        assert_eq!(FailureKind::MalformedResponse.to_string(), "malformed_response");
        assert_eq!(FailureKind::EmptyInput.to_string(), "empty_input");
    }
}

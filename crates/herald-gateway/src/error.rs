//! Error types for herald-gateway

use thiserror::Error;

/// Errors reported by external collaborators.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GatewayError {
    /// A required credential is not configured
    #[error("Credential not configured: {0}")]
    MissingCredential(String),

    /// The request could not be built from the given input
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// Network or protocol failure talking to the service
    #[error("Transport failed: {0}")]
    Transport(String),

    /// Rate limit or quota exhausted
    #[error("Quota exhausted: {0}")]
    Quota(String),

    /// The service answered, but not with something usable
    #[error("Unexpected response: {0}")]
    Response(String),
}

impl GatewayError {
    /// Whether the failure was detected before any I/O happened.
    pub fn is_precondition(&self) -> bool {
        matches!(
            self,
            GatewayError::MissingCredential(_) | GatewayError::InvalidRequest(_)
        )
    }
}

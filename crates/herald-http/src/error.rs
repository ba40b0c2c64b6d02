//! Error types for herald-http

use herald_gateway::GatewayError;
use thiserror::Error;

/// Errors raised inside the HTTP clients
#[derive(Error, Debug)]
pub enum HttpError {
    /// The reqwest client could not be constructed
    #[error("HTTP client setup failed: {0}")]
    ClientBuild(String),

    /// Connection, TLS, or timeout failure
    #[error("HTTP request failed: {0}")]
    Request(String),

    /// The service reported a rate limit or quota problem
    #[error("Rate limited ({status}): {message}")]
    RateLimited { status: u16, message: String },

    /// The service rejected the request as malformed
    #[error("Request rejected ({status}): {message}")]
    Rejected { status: u16, message: String },

    /// Any other non-success status
    #[error("HTTP error ({status}): {message}")]
    Status { status: u16, message: String },

    /// The body could not be decoded or lacked the expected content
    #[error("Response decoding failed: {0}")]
    Decode(String),
}

impl From<reqwest::Error> for HttpError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            HttpError::Decode(err.to_string())
        } else {
            HttpError::Request(err.to_string())
        }
    }
}

impl From<HttpError> for GatewayError {
    fn from(err: HttpError) -> Self {
        match err {
            HttpError::ClientBuild(msg) | HttpError::Request(msg) => GatewayError::Transport(msg),
            HttpError::RateLimited { .. } => GatewayError::Quota(err.to_string()),
            HttpError::Rejected { .. } => GatewayError::InvalidRequest(err.to_string()),
            HttpError::Status { .. } | HttpError::Decode(_) => {
                GatewayError::Response(err.to_string())
            }
        }
    }
}

/// Classify a non-success status and its body text.
pub(crate) fn classify_status(status: reqwest::StatusCode, body: String) -> HttpError {
    let code = status.as_u16();
    let lowered = body.to_lowercase();
    if code == 429 || (code == 403 && lowered.contains("rate limit")) {
        HttpError::RateLimited {
            status: code,
            message: body,
        }
    } else if code == 400 || code == 422 {
        HttpError::Rejected {
            status: code,
            message: body,
        }
    } else {
        HttpError::Status {
            status: code,
            message: body,
        }
    }
}

//! Herald-HTTP: network clients for Herald
//!
//! Concrete `ChangeSource` and `ModelGateway` implementations backed by the
//! GitHub search API and the Gemini generateContent API.
//!
//! ## Layer 1 - Network
//!
//! Focus: request construction, pagination, and mapping transport failures
//! onto `GatewayError` so callers never see reqwest types.

pub mod error;
pub mod gemini;
pub mod github;

pub use error::HttpError;
pub use gemini::{GeminiClient, GeminiConfig};
pub use github::{GitHubConfig, GitHubSearchClient};

/// User-Agent sent with every request; GitHub rejects requests without one.
pub(crate) const USER_AGENT: &str = concat!("herald/", env!("CARGO_PKG_VERSION"));

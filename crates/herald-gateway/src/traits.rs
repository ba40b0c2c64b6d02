//! Collaborator trait definitions for Herald
//!
//! These traits define the three external capabilities the pipeline talks to:
//! - `ChangeSource`: merged change requests inside a time window
//! - `ModelGateway`: templated prompt in, free-form text out
//! - `PublishTarget`: one post per call, optionally replying to a parent post
//!
//! All traits are async and backend-agnostic. In-memory fakes are provided
//! for testing via the `fakes` module.

use async_trait::async_trait;
use chrono::{DateTime, Duration, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::error::GatewayError;

/// Result type for collaborator calls
pub type GatewayResult<T> = std::result::Result<T, GatewayError>;

/// Timestamp format used inside search qualifiers.
const QUALIFIER_FORMAT: &str = "%Y-%m-%dT%H:%M:%SZ";

// ---------------------------------------------------------------------------
// ChangeSource — merged change requests
// ---------------------------------------------------------------------------

/// One merged change request, as read from the change-tracking service.
///
/// Immutable once fetched.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChangeRecord {
    /// Pull request number
    pub number: u64,
    /// Title
    pub title: String,
    /// Free-text body; a null body is stored as ""
    #[serde(default)]
    pub body: String,
    /// Canonical (HTML) URL
    pub url: String,
    /// Merge timestamp (UTC)
    pub merged_at: DateTime<Utc>,
    /// Author handle
    pub author: String,
}

/// Half-open UTC interval `[since, until)` of merge timestamps.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MergeWindow {
    pub since: DateTime<Utc>,
    pub until: DateTime<Utc>,
}

impl MergeWindow {
    /// The whole UTC day `[day 00:00:00, day+1 00:00:00)`.
    pub fn for_day(day: NaiveDate) -> Self {
        let since = day.and_time(chrono::NaiveTime::MIN).and_utc();
        Self {
            since,
            until: since + Duration::days(1),
        }
    }

    /// The trailing 24 hours ending at `now`.
    pub fn trailing_day(now: DateTime<Utc>) -> Self {
        Self {
            since: now - Duration::hours(24),
            until: now,
        }
    }

    /// Search qualifier, e.g. `merged:2025-07-19T00:00:00Z..2025-07-20T00:00:00Z`.
    pub fn qualifier(&self) -> String {
        format!(
            "merged:{}..{}",
            self.since.format(QUALIFIER_FORMAT),
            self.until.format(QUALIFIER_FORMAT)
        )
    }

    /// Whether `ts` falls inside the window.
    pub fn contains(&self, ts: DateTime<Utc>) -> bool {
        ts >= self.since && ts < self.until
    }
}

/// A single server-side filtered query for merged pull requests.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChangeQuery {
    /// `owner/name`
    pub repository: String,
    pub window: MergeWindow,
}

impl ChangeQuery {
    pub fn new(repository: impl Into<String>, window: MergeWindow) -> Self {
        Self {
            repository: repository.into(),
            window,
        }
    }

    /// Full search string: `is:pr is:merged repo:<owner/name> merged:<since>..<until>`.
    pub fn search_string(&self) -> String {
        format!(
            "is:pr is:merged repo:{} {}",
            self.repository,
            self.window.qualifier()
        )
    }
}

/// Source of merged change requests.
///
/// Guarantees:
/// - Only merged pull requests are returned.
/// - Output order is whatever the backend returns (not necessarily chronological).
/// - A missing credential is reported as `GatewayError::MissingCredential`
///   without any network I/O.
#[async_trait]
pub trait ChangeSource: Send + Sync {
    /// Run the query and return every matching record.
    async fn merged_changes(&self, query: &ChangeQuery) -> GatewayResult<Vec<ChangeRecord>>;
}

// ---------------------------------------------------------------------------
// ModelGateway — language model invocation
// ---------------------------------------------------------------------------

/// Synchronous request/response access to a language model.
///
/// The reply is free-form text. Parsing and validating it is the caller's
/// responsibility, never the gateway's.
#[async_trait]
pub trait ModelGateway: Send + Sync {
    /// Send one fully rendered prompt and return the model's text reply.
    async fn generate(&self, prompt: &str) -> GatewayResult<String>;
}

// ---------------------------------------------------------------------------
// PublishTarget — announcement publishing
// ---------------------------------------------------------------------------

/// Identifier assigned to a published post.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PostId(pub String);

impl PostId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for PostId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Destination for announcements.
///
/// Each call publishes exactly one message. When `in_reply_to` is set the
/// message is attached to that earlier post, forming a reply chain.
#[async_trait]
pub trait PublishTarget: Send + Sync {
    async fn post(&self, text: &str, in_reply_to: Option<&PostId>) -> GatewayResult<PostId>;
}

//! Herald-Gateway: collaborator contracts for Herald
//!
//! This crate defines the narrow interfaces the announcement pipeline uses to
//! reach the outside world, plus in-memory fakes that honour the same
//! contracts for tests.
//!
//! ## Layer 0 - Collaborators
//!
//! Focus: record shapes, query construction, and error classification.
//!
//! ## Key Components
//!
//! - `ChangeSource`: merged pull requests inside a `MergeWindow`
//! - `ModelGateway`: prompt in, free-form text out
//! - `PublishTarget`: reply-chained posting keyed by `PostId`

mod error;
pub mod fakes;
pub mod traits;

pub use error::GatewayError;
pub use traits::{
    ChangeQuery, ChangeRecord, ChangeSource, GatewayResult, MergeWindow, ModelGateway, PostId,
    PublishTarget,
};

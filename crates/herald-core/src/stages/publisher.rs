//! Publisher: posts an approved draft set as a reply chain.
//!
//! Posting stops at the first failure. Messages already posted stay up and
//! are listed in the report so they can be cleaned up by hand.

use std::sync::Arc;

use async_trait::async_trait;
use herald_gateway::{GatewayResult, PostId, PublishTarget};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use tracing::{error, info};

use crate::domain::StageError;

/// What happened while publishing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PublishReport {
    /// Ids of every message that made it out, in posting order
    pub posted: Vec<PostId>,
    /// First failure, if any; later messages were not attempted
    pub failure: Option<StageError>,
}

impl PublishReport {
    pub fn success(&self) -> bool {
        self.failure.is_none()
    }
}

pub struct Publisher {
    target: Arc<dyn PublishTarget>,
}

impl Publisher {
    pub fn new(target: Arc<dyn PublishTarget>) -> Self {
        Self { target }
    }

    /// Post `messages` in order, each replying to the previous one.
    ///
    /// An empty list succeeds without touching the target.
    pub async fn publish(&self, messages: &[String]) -> PublishReport {
        let mut report = PublishReport::default();
        if messages.is_empty() {
            info!("Nothing to publish");
            return report;
        }

        for (i, message) in messages.iter().enumerate() {
            let parent = report.posted.last();
            match self.target.post(message, parent).await {
                Ok(id) => {
                    info!(position = i + 1, post_id = %id, "Posted");
                    report.posted.push(id);
                }
                Err(e) => {
                    let err = StageError::from(e);
                    error!(
                        position = i + 1,
                        posted = ?report.posted,
                        error = %err,
                        "Publish failed; earlier posts were left in place"
                    );
                    report.failure = Some(err);
                    break;
                }
            }
        }
        report
    }
}

/// Publish target that only prints the thread to stdout.
///
/// Ids are the first 16 hex digits of SHA-256 over the parent id and the
/// text, so a given thread always yields the same chain.
#[derive(Debug, Default, Clone, Copy)]
pub struct SimulatedTarget;

impl SimulatedTarget {
    pub fn new() -> Self {
        Self
    }

    pub fn post_id(text: &str, in_reply_to: Option<&PostId>) -> PostId {
        let mut hasher = Sha256::new();
        if let Some(parent) = in_reply_to {
            hasher.update(parent.as_str().as_bytes());
        }
        hasher.update(b"\n");
        hasher.update(text.as_bytes());
        let digest = hex::encode(hasher.finalize());
        PostId(digest[..16].to_string())
    }
}

#[async_trait]
impl PublishTarget for SimulatedTarget {
    async fn post(&self, text: &str, in_reply_to: Option<&PostId>) -> GatewayResult<PostId> {
        let id = Self::post_id(text, in_reply_to);
        match in_reply_to {
            Some(parent) => println!("[simulated post {id} replying to {parent}]"),
            None => println!("[simulated post {id}]"),
        }
        println!("{text}");
        println!("{}", "-".repeat(20));
        Ok(id)
    }
}

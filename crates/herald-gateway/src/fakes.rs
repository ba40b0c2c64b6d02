//! In-memory fakes for collaborator traits (testing only)
//!
//! Provides `StaticChangeSource`, `ScriptedModel`, and `RecordingTarget`
//! that satisfy the trait contracts without any network access and record
//! every call for later assertions.

use std::collections::VecDeque;
use std::sync::Mutex;

use async_trait::async_trait;

use crate::error::GatewayError;
use crate::traits::*;

// ---------------------------------------------------------------------------
// StaticChangeSource
// ---------------------------------------------------------------------------

/// Change source that returns a fixed result and captures every query.
#[derive(Debug)]
pub struct StaticChangeSource {
    result: GatewayResult<Vec<ChangeRecord>>,
    queries: Mutex<Vec<ChangeQuery>>,
}

impl StaticChangeSource {
    pub fn new(records: Vec<ChangeRecord>) -> Self {
        Self {
            result: Ok(records),
            queries: Mutex::new(Vec::new()),
        }
    }

    /// A source whose every query fails with `err`.
    pub fn failing(err: GatewayError) -> Self {
        Self {
            result: Err(err),
            queries: Mutex::new(Vec::new()),
        }
    }

    /// Queries received so far, in call order.
    pub fn queries(&self) -> Vec<ChangeQuery> {
        self.queries.lock().unwrap().clone()
    }
}

#[async_trait]
impl ChangeSource for StaticChangeSource {
    async fn merged_changes(&self, query: &ChangeQuery) -> GatewayResult<Vec<ChangeRecord>> {
        self.queries.lock().unwrap().push(query.clone());
        self.result.clone()
    }
}

// ---------------------------------------------------------------------------
// ScriptedModel
// ---------------------------------------------------------------------------

/// Model gateway that answers from a queue of scripted replies.
///
/// Replies are consumed in call order. Once the queue is empty every further
/// call fails with `GatewayError::Response`.
#[derive(Debug, Default)]
pub struct ScriptedModel {
    replies: Mutex<VecDeque<GatewayResult<String>>>,
    prompts: Mutex<Vec<String>>,
}

impl ScriptedModel {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style variant of [`ScriptedModel::push_reply`].
    pub fn with_reply(self, reply: impl Into<String>) -> Self {
        self.push_reply(reply);
        self
    }

    /// Builder-style variant of [`ScriptedModel::push_error`].
    pub fn with_error(self, err: GatewayError) -> Self {
        self.push_error(err);
        self
    }

    pub fn push_reply(&self, reply: impl Into<String>) {
        self.replies.lock().unwrap().push_back(Ok(reply.into()));
    }

    pub fn push_error(&self, err: GatewayError) {
        self.replies.lock().unwrap().push_back(Err(err));
    }

    /// Number of `generate` calls received.
    pub fn calls(&self) -> usize {
        self.prompts.lock().unwrap().len()
    }

    /// Every prompt received, in call order.
    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().unwrap().clone()
    }

    /// Scripted replies not yet consumed.
    pub fn remaining(&self) -> usize {
        self.replies.lock().unwrap().len()
    }
}

#[async_trait]
impl ModelGateway for ScriptedModel {
    async fn generate(&self, prompt: &str) -> GatewayResult<String> {
        self.prompts.lock().unwrap().push(prompt.to_string());
        self.replies
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(GatewayError::Response("no scripted reply left".to_string())))
    }
}

// ---------------------------------------------------------------------------
// RecordingTarget
// ---------------------------------------------------------------------------

/// A post accepted by [`RecordingTarget`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedPost {
    pub id: PostId,
    pub text: String,
    pub in_reply_to: Option<PostId>,
}

/// Publish target that keeps every post in memory.
///
/// Ids are assigned sequentially (`post-1`, `post-2`, ...). `fail_at(n)`
/// makes the n-th call (1-based) fail with a transport error.
#[derive(Debug, Default)]
pub struct RecordingTarget {
    posts: Mutex<Vec<RecordedPost>>,
    calls: Mutex<usize>,
    fail_at: Option<usize>,
}

impl RecordingTarget {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fail_at(mut self, call: usize) -> Self {
        self.fail_at = Some(call);
        self
    }

    pub fn posts(&self) -> Vec<RecordedPost> {
        self.posts.lock().unwrap().clone()
    }
}

#[async_trait]
impl PublishTarget for RecordingTarget {
    async fn post(&self, text: &str, in_reply_to: Option<&PostId>) -> GatewayResult<PostId> {
        let call = {
            let mut calls = self.calls.lock().unwrap();
            *calls += 1;
            *calls
        };
        if self.fail_at == Some(call) {
            return Err(GatewayError::Transport(format!(
                "scripted failure on post {call}"
            )));
        }
        let id = PostId(format!("post-{call}"));
        self.posts.lock().unwrap().push(RecordedPost {
            id: id.clone(),
            text: text.to_string(),
            in_reply_to: in_reply_to.cloned(),
        });
        Ok(id)
    }
}

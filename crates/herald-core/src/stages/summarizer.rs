//! Summarizer: one model call per change record, fanned out on a bounded pool.

use std::sync::Arc;

use herald_gateway::{ChangeRecord, ModelGateway};
use serde::Deserialize;
use tokio::sync::Semaphore;
use tracing::{info, instrument, warn};

use crate::domain::{StageError, StageResult, Summary};
use crate::prompts;
use crate::reply::parse_reply;

#[derive(Debug, Deserialize)]
struct SummaryReply {
    summary: String,
    tags: Vec<String>,
}

/// Outcome of summarizing a batch of records.
#[derive(Debug, Clone, Default)]
pub struct SummaryBatch {
    /// Valid summaries, in input order
    pub summaries: Vec<Summary>,
    /// Records whose summary was dropped, with the reason
    pub dropped: Vec<(u64, StageError)>,
}

pub struct Summarizer {
    model: Arc<dyn ModelGateway>,
    concurrency: usize,
}

impl Summarizer {
    /// `concurrency` is clamped to at least one worker.
    pub fn new(model: Arc<dyn ModelGateway>, concurrency: usize) -> Self {
        Self {
            model,
            concurrency: concurrency.max(1),
        }
    }

    /// Summarize a single record.
    pub async fn summarize(&self, record: &ChangeRecord) -> StageResult<Summary> {
        summarize_one(self.model.as_ref(), record).await
    }

    /// Summarize every record with at most `concurrency` calls in flight.
    ///
    /// Returns only after every call has finished. Invalid summaries are
    /// dropped; output order follows input order.
    #[instrument(skip(self, records), fields(records = records.len(), concurrency = self.concurrency))]
    pub async fn summarize_all(&self, records: &[ChangeRecord]) -> SummaryBatch {
        let sem = Arc::new(Semaphore::new(self.concurrency));
        let mut tasks = Vec::with_capacity(records.len());

        for record in records.iter().cloned() {
            let model = Arc::clone(&self.model);
            let sem = Arc::clone(&sem);
            let number = record.number;
            let task = tokio::spawn(async move {
                let _permit = sem.acquire_owned().await.ok();
                summarize_one(model.as_ref(), &record).await
            });
            tasks.push((number, task));
        }

        // Join barrier: every task is awaited before the batch is returned.
        let mut batch = SummaryBatch::default();
        for (number, task) in tasks {
            let result = match task.await {
                Ok(result) => result,
                Err(e) => Err(StageError::Transport(format!("summary task aborted: {e}"))),
            };
            match result {
                Ok(summary) => batch.summaries.push(summary),
                Err(e) => {
                    warn!(number, kind = %e.kind(), error = %e, "Dropping summary");
                    batch.dropped.push((number, e));
                }
            }
        }

        info!(
            valid = batch.summaries.len(),
            dropped = batch.dropped.len(),
            "Summarizer finished"
        );
        batch
    }
}

async fn summarize_one(model: &dyn ModelGateway, record: &ChangeRecord) -> StageResult<Summary> {
    let reply = model.generate(&prompts::summary_prompt(record)).await?;
    let parsed: SummaryReply = parse_reply(&reply)?;
    let summary = Summary::new(record.number, parsed.summary, parsed.tags);
    if summary.text.is_empty() {
        return Err(StageError::MalformedResponse(
            "summary text is empty".to_string(),
        ));
    }
    info!(number = record.number, summary = %summary.text, tags = ?summary.tags, "Summarized");
    Ok(summary)
}

//! Source Monitor: merged pull requests for a day or the trailing 24 hours.

use std::sync::Arc;

use chrono::{DateTime, NaiveDate, Utc};
use herald_gateway::{ChangeQuery, ChangeRecord, ChangeSource, GatewayError, MergeWindow};
use tracing::{info, warn};

use crate::domain::{StageError, StageResult};

/// Accepted target date format.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Parse a `YYYY-MM-DD` target date.
pub fn parse_target_date(raw: &str) -> StageResult<NaiveDate> {
    NaiveDate::parse_from_str(raw.trim(), DATE_FORMAT).map_err(|e| {
        StageError::Precondition(format!("malformed date {raw:?} (expected YYYY-MM-DD): {e}"))
    })
}

/// Window for an optional target date, relative to `now`.
pub fn window_for(target_date: Option<&str>, now: DateTime<Utc>) -> StageResult<MergeWindow> {
    match target_date {
        Some(raw) => Ok(MergeWindow::for_day(parse_target_date(raw)?)),
        None => Ok(MergeWindow::trailing_day(now)),
    }
}

/// Queries one repository for merged pull requests.
pub struct SourceMonitor {
    source: Arc<dyn ChangeSource>,
    repository: String,
}

impl SourceMonitor {
    pub fn new(source: Arc<dyn ChangeSource>, repository: impl Into<String>) -> Self {
        Self {
            source,
            repository: repository.into(),
        }
    }

    pub fn repository(&self) -> &str {
        &self.repository
    }

    /// Fetch using the current clock for the trailing window.
    pub async fn fetch(&self, target_date: Option<&str>) -> StageResult<Vec<ChangeRecord>> {
        self.fetch_at(target_date, Utc::now()).await
    }

    /// Fetch with an explicit clock reading.
    pub async fn fetch_at(
        &self,
        target_date: Option<&str>,
        now: DateTime<Utc>,
    ) -> StageResult<Vec<ChangeRecord>> {
        let window = window_for(target_date, now)?;
        let query = ChangeQuery::new(self.repository.clone(), window);

        info!(
            repository = %self.repository,
            since = %window.since,
            until = %window.until,
            "Fetching merged pull requests"
        );

        let records = self.source.merged_changes(&query).await.map_err(|e| {
            if let GatewayError::Quota(_) = e {
                warn!(error = %e, "Search quota exhausted; try again after the rate-limit window resets");
            }
            StageError::from(e)
        })?;

        for record in &records {
            info!(number = record.number, title = %record.title, merged_at = %record.merged_at, "Merged pull request");
        }
        info!(count = records.len(), "Monitor finished");
        Ok(records)
    }
}

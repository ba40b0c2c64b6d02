//! GitHub search client
//!
//! Finds merged pull requests through the issue search endpoint, which lets
//! a single server-side query filter by repository, state, and merge time.

use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use herald_gateway::{ChangeQuery, ChangeRecord, ChangeSource, GatewayError, GatewayResult};
use serde::Deserialize;
use tracing::{debug, info, warn};

use crate::error::{classify_status, HttpError};
use crate::USER_AGENT;

/// Results per page; the search API maximum.
const PER_PAGE: usize = 100;

/// The search API never returns more than 1000 results for one query.
const SEARCH_RESULT_CEILING: usize = 1000;

/// GitHub client configuration
#[derive(Debug, Clone)]
pub struct GitHubConfig {
    /// API base URL
    pub api_base: String,
    /// Personal access token (`GITHUB_API_TOKEN`)
    pub token: Option<String>,
    /// Per-request timeout
    pub timeout: Duration,
}

impl Default for GitHubConfig {
    fn default() -> Self {
        GitHubConfig {
            api_base: "https://api.github.com".to_string(),
            token: None,
            timeout: Duration::from_secs(30),
        }
    }
}

impl GitHubConfig {
    /// Create config for a specific API base (e.g. a mock server)
    pub fn new(api_base: &str) -> Self {
        GitHubConfig {
            api_base: api_base.trim_end_matches('/').to_string(),
            ..Self::default()
        }
    }

    /// Set authentication token
    pub fn with_token(mut self, token: &str) -> Self {
        self.token = Some(token.to_string());
        self
    }

    /// Set per-request timeout
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    total_count: usize,
    #[serde(default)]
    incomplete_results: bool,
    items: Vec<SearchItem>,
}

#[derive(Debug, Deserialize)]
struct SearchItem {
    number: u64,
    title: String,
    body: Option<String>,
    html_url: String,
    user: Option<SearchUser>,
    pull_request: Option<PullRequestLinks>,
}

#[derive(Debug, Deserialize)]
struct SearchUser {
    login: String,
}

#[derive(Debug, Deserialize)]
struct PullRequestLinks {
    merged_at: Option<DateTime<Utc>>,
}

impl SearchItem {
    /// Keep only pull requests that actually carry a merge timestamp.
    fn into_record(self) -> Option<ChangeRecord> {
        let merged_at = self.pull_request?.merged_at?;
        Some(ChangeRecord {
            number: self.number,
            title: self.title,
            body: self.body.unwrap_or_default(),
            url: self.html_url,
            merged_at,
            author: self.user.map(|u| u.login).unwrap_or_default(),
        })
    }
}

/// Search client for merged pull requests
pub struct GitHubSearchClient {
    config: GitHubConfig,
    http_client: reqwest::Client,
}

impl GitHubSearchClient {
    /// Create a new GitHub client
    pub fn new(config: GitHubConfig) -> Result<Self, HttpError> {
        let http_client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(config.timeout)
            .build()
            .map_err(|e| HttpError::ClientBuild(e.to_string()))?;

        Ok(GitHubSearchClient {
            config,
            http_client,
        })
    }

    async fn fetch_page(
        &self,
        token: &str,
        search: &str,
        page: usize,
    ) -> Result<SearchResponse, HttpError> {
        let url = format!("{}/search/issues", self.config.api_base);
        let per_page = PER_PAGE.to_string();
        let page = page.to_string();

        let response = self
            .http_client
            .get(&url)
            .bearer_auth(token)
            .header("Accept", "application/vnd.github+json")
            .header("X-GitHub-Api-Version", "2022-11-28")
            .query(&[
                ("q", search),
                ("per_page", per_page.as_str()),
                ("page", page.as_str()),
            ])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(classify_status(status, body));
        }

        Ok(response.json::<SearchResponse>().await?)
    }

    /// Walk every result page for `query`.
    async fn search_all(&self, token: &str, query: &ChangeQuery) -> Result<Vec<ChangeRecord>, HttpError> {
        let search = query.search_string();
        info!(query = %search, "Searching merged pull requests");

        let mut records = Vec::new();
        let mut seen = 0usize;
        let mut page = 1usize;

        loop {
            let response = self.fetch_page(token, &search, page).await?;
            if response.incomplete_results {
                warn!(page, "GitHub reported incomplete search results");
            }

            let page_len = response.items.len();
            seen += page_len;
            for item in response.items {
                let number = item.number;
                match item.into_record() {
                    // The qualifier range is inclusive; the window is not.
                    Some(record) if !query.window.contains(record.merged_at) => {
                        debug!(number, merged_at = %record.merged_at, "Skipping merge outside the window");
                    }
                    Some(record) => {
                        debug!(number, title = %record.title, merged_at = %record.merged_at, "Found merged pull request");
                        records.push(record);
                    }
                    None => debug!(number, "Skipping search hit without merge timestamp"),
                }
            }

            let limit = response.total_count.min(SEARCH_RESULT_CEILING);
            if page_len < PER_PAGE || seen >= limit {
                break;
            }
            page += 1;
        }

        info!(count = records.len(), "Merged pull request search complete");
        Ok(records)
    }
}

#[async_trait]
impl ChangeSource for GitHubSearchClient {
    async fn merged_changes(&self, query: &ChangeQuery) -> GatewayResult<Vec<ChangeRecord>> {
        let token = self
            .config
            .token
            .as_deref()
            .ok_or_else(|| GatewayError::MissingCredential("GITHUB_API_TOKEN".to_string()))?;

        self.search_all(token, query).await.map_err(GatewayError::from)
    }
}

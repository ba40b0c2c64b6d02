//! Gemini generateContent client

use std::time::Duration;

use async_trait::async_trait;
use herald_gateway::{GatewayError, GatewayResult, ModelGateway};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::{classify_status, HttpError};
use crate::USER_AGENT;

/// Gemini client configuration
#[derive(Debug, Clone)]
pub struct GeminiConfig {
    /// API base URL
    pub api_base: String,
    /// API key (`GEMINI_API_KEY`)
    pub api_key: Option<String>,
    /// Model identifier, e.g. `gemini-1.5-flash-latest`
    pub model: String,
    /// Sampling temperature; the service default when unset
    pub temperature: Option<f64>,
    /// Per-request timeout
    pub timeout: Duration,
}

impl Default for GeminiConfig {
    fn default() -> Self {
        GeminiConfig {
            api_base: "https://generativelanguage.googleapis.com".to_string(),
            api_key: None,
            model: "gemini-1.5-flash-latest".to_string(),
            temperature: None,
            timeout: Duration::from_secs(30),
        }
    }
}

impl GeminiConfig {
    pub fn new(api_base: &str) -> Self {
        GeminiConfig {
            api_base: api_base.trim_end_matches('/').to_string(),
            ..Self::default()
        }
    }

    pub fn with_api_key(mut self, key: &str) -> Self {
        self.api_key = Some(key.to_string());
        self
    }

    pub fn with_model(mut self, model: &str) -> Self {
        self.model = model.to_string();
        self
    }

    pub fn with_temperature(mut self, temperature: f64) -> Self {
        self.temperature = Some(temperature);
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/v1beta/models/{}:generateContent",
            self.api_base, self.model
        )
    }
}

// ---------------------------------------------------------------------------
// Wire types
// ---------------------------------------------------------------------------

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateRequest<'a> {
    contents: Vec<Content<'a>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    generation_config: Option<GenerationConfig>,
}

#[derive(Debug, Serialize)]
struct Content<'a> {
    role: &'static str,
    parts: Vec<RequestPart<'a>>,
}

#[derive(Debug, Serialize)]
struct RequestPart<'a> {
    text: &'a str,
}

#[derive(Debug, Serialize)]
struct GenerationConfig {
    temperature: f64,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
    #[serde(default)]
    prompt_feedback: Option<PromptFeedback>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Candidate {
    content: Option<CandidateContent>,
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Debug, Deserialize)]
struct ResponsePart {
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PromptFeedback {
    block_reason: Option<String>,
}

impl GenerateResponse {
    /// Text of the first candidate, parts joined by newlines.
    fn into_text(self) -> Result<String, HttpError> {
        if let Some(reason) = self.prompt_feedback.and_then(|f| f.block_reason) {
            return Err(HttpError::Decode(format!("prompt blocked: {reason}")));
        }

        let candidate = self
            .candidates
            .into_iter()
            .next()
            .ok_or_else(|| HttpError::Decode("response has no candidates".to_string()))?;

        let finish_reason = candidate.finish_reason.unwrap_or_default();
        let text = candidate
            .content
            .map(|c| {
                c.parts
                    .into_iter()
                    .filter_map(|p| p.text)
                    .collect::<Vec<_>>()
                    .join("\n")
            })
            .unwrap_or_default();

        if text.trim().is_empty() {
            return Err(HttpError::Decode(format!(
                "candidate carried no text (finish reason: {finish_reason})"
            )));
        }
        Ok(text)
    }
}

/// Language model client for the Gemini REST API
pub struct GeminiClient {
    config: GeminiConfig,
    http_client: reqwest::Client,
}

impl GeminiClient {
    /// Create a new Gemini client
    pub fn new(config: GeminiConfig) -> Result<Self, HttpError> {
        let http_client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(config.timeout)
            .build()
            .map_err(|e| HttpError::ClientBuild(e.to_string()))?;

        Ok(GeminiClient {
            config,
            http_client,
        })
    }

    async fn generate_content(&self, api_key: &str, prompt: &str) -> Result<String, HttpError> {
        let request = GenerateRequest {
            contents: vec![Content {
                role: "user",
                parts: vec![RequestPart { text: prompt }],
            }],
            generation_config: self
                .config
                .temperature
                .map(|temperature| GenerationConfig { temperature }),
        };

        debug!(model = %self.config.model, prompt_chars = prompt.chars().count(), "Calling Gemini");

        let response = self
            .http_client
            .post(self.config.endpoint())
            .header("x-goog-api-key", api_key)
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(classify_status(status, body));
        }

        let text = response.json::<GenerateResponse>().await?.into_text()?;
        info!(model = %self.config.model, reply_chars = text.chars().count(), "Gemini replied");
        Ok(text)
    }
}

#[async_trait]
impl ModelGateway for GeminiClient {
    async fn generate(&self, prompt: &str) -> GatewayResult<String> {
        let api_key = self
            .config
            .api_key
            .as_deref()
            .ok_or_else(|| GatewayError::MissingCredential("GEMINI_API_KEY".to_string()))?;

        self.generate_content(api_key, prompt)
            .await
            .map_err(GatewayError::from)
    }
}

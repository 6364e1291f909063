//! HTTP client for the OpenAI-compatible chat-completions endpoint.
//!
//! Wraps `reqwest` with status-code classification (429 → rate limited,
//! 402 → quota exhausted) and typed response deserialization.

use std::time::Duration;

use reqwest::{Client, Url};

use crate::error::GenAiError;
use crate::types::{ChatRequest, ChatResponse};

const DEFAULT_BASE_URL: &str = "https://openrouter.ai/api/v1";

/// Connection settings for [`GenAiClient`].
#[derive(Debug, Clone)]
pub struct GenAiConfig {
    pub base_url: String,
    pub api_key: String,
    pub text_model: String,
    pub image_model: String,
    pub timeout_secs: u64,
}

impl GenAiConfig {
    /// Derive client settings from the loaded application config.
    #[must_use]
    pub fn from_app_config(config: &pepgen_core::AppConfig) -> Self {
        Self {
            base_url: config.genai_base_url.clone(),
            api_key: config.genai_api_key.clone(),
            text_model: config.genai_text_model.clone(),
            image_model: config.genai_image_model.clone(),
            timeout_secs: config.genai_request_timeout_secs,
        }
    }
}

impl Default for GenAiConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_owned(),
            api_key: String::new(),
            text_model: "openai/gpt-4o".to_owned(),
            image_model: "google/gemini-2.5-flash-image-preview".to_owned(),
            timeout_secs: 120,
        }
    }
}

/// Client for the generation API.
///
/// Point `base_url` at a mock server in tests; the production default is the
/// OpenRouter v1 endpoint.
#[derive(Clone)]
pub struct GenAiClient {
    client: Client,
    base_url: Url,
    api_key: String,
    text_model: String,
    image_model: String,
}

impl GenAiClient {
    /// Create a new client.
    ///
    /// # Errors
    ///
    /// Returns [`GenAiError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed, or [`GenAiError::Api`] if `base_url` is not a
    /// valid URL.
    pub fn new(config: &GenAiConfig) -> Result<Self, GenAiError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent("pepgen/0.1 (content-generation)")
            .build()?;

        // Normalise: ensure the base URL ends with exactly one slash so that
        // join() appends the endpoint path rather than replacing the last
        // path segment.
        let normalised = format!("{}/", config.base_url.trim_end_matches('/'));
        let base_url = Url::parse(&normalised).map_err(|e| GenAiError::Api {
            status: 0,
            message: format!("invalid base URL '{}': {e}", config.base_url),
        })?;

        Ok(Self {
            client,
            base_url,
            api_key: config.api_key.clone(),
            text_model: config.text_model.clone(),
            image_model: config.image_model.clone(),
        })
    }

    pub(crate) fn text_model(&self) -> &str {
        &self.text_model
    }

    pub(crate) fn image_model(&self) -> &str {
        &self.image_model
    }

    /// Send one chat-completions request and return the parsed envelope.
    ///
    /// # Errors
    ///
    /// - [`GenAiError::RateLimited`] on 429, [`GenAiError::QuotaExhausted`]
    ///   on 402, [`GenAiError::Api`] on any other non-2xx status.
    /// - [`GenAiError::Http`] on network failure.
    /// - [`GenAiError::Deserialize`] if the body does not match the expected
    ///   shape.
    pub(crate) async fn chat(&self, request: &ChatRequest) -> Result<ChatResponse, GenAiError> {
        let url = self.base_url.join("chat/completions").map_err(|e| GenAiError::Api {
            status: 0,
            message: format!("invalid endpoint URL: {e}"),
        })?;

        let response = self
            .client
            .post(url)
            .bearer_auth(&self.api_key)
            .json(request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let message = truncate(&response.text().await.unwrap_or_default(), 500);
            return Err(match status.as_u16() {
                429 => GenAiError::RateLimited(message),
                402 => GenAiError::QuotaExhausted(message),
                code => GenAiError::Api {
                    status: code,
                    message,
                },
            });
        }

        let body: serde_json::Value = response.json().await?;
        serde_json::from_value(body).map_err(|e| GenAiError::Deserialize {
            context: format!("chat/completions(model={})", request.model),
            source: e,
        })
    }
}

fn truncate(s: &str, max: usize) -> String {
    if s.len() <= max {
        s.to_owned()
    } else {
        let mut end = max;
        while !s.is_char_boundary(end) {
            end -= 1;
        }
        format!("{}…", &s[..end])
    }
}

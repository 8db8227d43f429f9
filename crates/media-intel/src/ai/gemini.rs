//! Google Gemini provider implementation.
//!
//! This module provides the [`GeminiProvider`] which implements the
//! [`InsightProvider`] trait for Google's Gemini API (<https://ai.google.dev/>).
//!
//! Requests go to `{base_url}{model}:generateContent` with the API key in the
//! `x-goog-api-key` header, so the key never shows up in a URL or in the
//! text of a transport error.

use std::fmt;
use std::time::Duration;

use super::InsightProvider;
use crate::error::{DashboardError, Result};
use reqwest::blocking::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

/// Default Gemini API endpoint.
pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta/models/";

/// Default model for chart insights.
pub const DEFAULT_MODEL: &str = "gemini-2.0-flash";

/// Header carrying the API key.
const API_KEY_HEADER: &str = "x-goog-api-key";

// Gemini API request structures
#[derive(Serialize)]
struct GeminiRequest {
    contents: Vec<Content>,
    #[serde(rename = "generationConfig", skip_serializing_if = "Option::is_none")]
    generation_config: Option<GenerationConfig>,
}

#[derive(Serialize)]
struct Content {
    role: String,
    parts: Vec<Part>,
}

#[derive(Serialize)]
struct Part {
    text: String,
}

#[derive(Serialize)]
struct GenerationConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
    #[serde(rename = "maxOutputTokens", skip_serializing_if = "Option::is_none")]
    max_output_tokens: Option<u32>,
}

// Gemini API response structures
#[derive(Deserialize)]
struct GeminiResponse {
    candidates: Option<Vec<Candidate>>,
}

#[derive(Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
    #[serde(rename = "finishReason")]
    finish_reason: Option<String>,
}

#[derive(Deserialize)]
struct CandidateContent {
    parts: Option<Vec<CandidatePart>>,
}

#[derive(Deserialize)]
struct CandidatePart {
    text: Option<String>,
}

impl GeminiResponse {
    /// Text of the first candidate's first part.
    ///
    /// `None` when there is no candidate, no content, or the candidate was
    /// blocked by safety filters.
    fn first_text(&self) -> Option<&str> {
        let candidate = self.candidates.as_ref()?.first()?;
        if let Some(reason) = &candidate.finish_reason
            && (reason == "SAFETY" || reason == "BLOCKED")
        {
            return None;
        }
        candidate
            .content
            .as_ref()?
            .parts
            .as_ref()?
            .first()?
            .text
            .as_deref()
    }
}

/// Configuration for the Gemini provider.
#[derive(Debug, Clone, PartialEq)]
pub struct GeminiConfig {
    /// The model to use (e.g., "gemini-2.0-flash").
    pub model: String,
    /// Base URL for the API (useful for proxies or custom endpoints).
    pub base_url: String,
    /// Request timeout in seconds; `None` keeps the HTTP client default.
    pub timeout_secs: Option<u64>,
    /// Optional sampling temperature (0.0 - 2.0).
    pub temperature: Option<f32>,
    /// Optional cap on response tokens.
    pub max_tokens: Option<u32>,
}

impl Default for GeminiConfig {
    fn default() -> Self {
        Self {
            model: DEFAULT_MODEL.to_owned(),
            base_url: DEFAULT_BASE_URL.to_owned(),
            timeout_secs: None,
            temperature: None,
            max_tokens: None,
        }
    }
}

impl GeminiConfig {
    /// Create a new configuration builder.
    pub fn builder() -> GeminiConfigBuilder {
        GeminiConfigBuilder::default()
    }

    /// Full `generateContent` URL for the configured model.
    pub fn endpoint(&self) -> String {
        format!(
            "{}/{}:generateContent",
            self.base_url.trim_end_matches('/'),
            self.model
        )
    }

    fn generation_config(&self) -> Option<GenerationConfig> {
        if self.temperature.is_none() && self.max_tokens.is_none() {
            return None;
        }
        Some(GenerationConfig {
            temperature: self.temperature,
            max_output_tokens: self.max_tokens,
        })
    }
}

/// Builder for [`GeminiConfig`].
#[derive(Default)]
pub struct GeminiConfigBuilder {
    model: Option<String>,
    base_url: Option<String>,
    timeout_secs: Option<u64>,
    temperature: Option<f32>,
    max_tokens: Option<u32>,
}

impl GeminiConfigBuilder {
    /// Set the model to use.
    pub fn model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }

    /// Set a custom base URL.
    pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    /// Set the request timeout in seconds.
    pub fn timeout_secs(mut self, timeout_secs: u64) -> Self {
        self.timeout_secs = Some(timeout_secs);
        self
    }

    /// Set the temperature (0.0 - 2.0).
    pub fn temperature(mut self, temperature: f32) -> Self {
        self.temperature = Some(temperature);
        self
    }

    /// Set the maximum tokens.
    pub fn max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = Some(max_tokens);
        self
    }

    /// Build the configuration.
    pub fn build(self) -> GeminiConfig {
        GeminiConfig {
            model: self.model.unwrap_or_else(|| DEFAULT_MODEL.to_owned()),
            base_url: self.base_url.unwrap_or_else(|| DEFAULT_BASE_URL.to_owned()),
            timeout_secs: self.timeout_secs,
            temperature: self.temperature,
            max_tokens: self.max_tokens,
        }
    }
}

/// Map a non-success status to its error class.
pub(crate) fn classify_status(status: u16, body: String) -> DashboardError {
    match status {
        401 | 403 => DashboardError::Authorization { status },
        _ => DashboardError::Api { status, body },
    }
}

/// Google Gemini provider for chart insights.
///
/// # Example
///
/// ```rust,ignore
/// use media_intel::ai::{GeminiConfig, GeminiProvider};
///
/// // Key from the environment (or `.env`)
/// let provider = GeminiProvider::from_env("GEMINI_API_KEY", GeminiConfig::default())?;
///
/// // With custom configuration
/// let config = GeminiConfig::builder()
///     .model("gemini-2.0-flash")
///     .timeout_secs(20)
///     .build();
/// let provider = GeminiProvider::with_config(api_key, config)?;
/// ```
pub struct GeminiProvider {
    api_key: String,
    config: GeminiConfig,
    client: Client,
}

impl fmt::Debug for GeminiProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GeminiProvider")
            .field("api_key", &"<redacted>")
            .field("config", &self.config)
            .finish()
    }
}

impl GeminiProvider {
    /// Create a new Gemini provider with default configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be created.
    pub fn new(api_key: impl Into<String>) -> Result<Self> {
        Self::with_config(api_key, GeminiConfig::default())
    }

    /// Create a new Gemini provider with custom configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be created.
    pub fn with_config(api_key: impl Into<String>, config: GeminiConfig) -> Result<Self> {
        let mut builder = Client::builder();
        if let Some(secs) = config.timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }
        let client = builder.build().map_err(|e| {
            DashboardError::InvalidConfig(format!("Failed to build HTTP client: {}", e))
        })?;

        Ok(Self::with_client(api_key, config, client))
    }

    /// Create a provider around an already configured HTTP client
    /// (custom proxies, TLS roots). `config.timeout_secs` is not applied.
    pub fn with_client(api_key: impl Into<String>, config: GeminiConfig, client: Client) -> Self {
        Self {
            api_key: api_key.into(),
            config,
            client,
        }
    }

    /// Create a provider with the key read from environment variable `env`.
    ///
    /// An unset or blank variable is a `MissingCredential` error.
    pub fn from_env(env: &str, config: GeminiConfig) -> Result<Self> {
        match std::env::var(env) {
            Ok(key) if !key.trim().is_empty() => Self::with_config(key.trim(), config),
            _ => Err(DashboardError::MissingCredential(env.to_string())),
        }
    }

    pub fn config(&self) -> &GeminiConfig {
        &self.config
    }

    fn call_api(&self, prompt: &str) -> Result<String> {
        let request = GeminiRequest {
            contents: vec![Content {
                role: "user".to_owned(),
                parts: vec![Part {
                    text: prompt.to_owned(),
                }],
            }],
            generation_config: self.config.generation_config(),
        };

        let url = self.config.endpoint();
        debug!("POST {} ({} prompt chars)", url, prompt.len());

        let response = self
            .client
            .post(&url)
            .header(API_KEY_HEADER, &self.api_key)
            .json(&request)
            .send()
            .map_err(|e| DashboardError::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            warn!("Gemini API returned status {}", status.as_u16());
            return Err(classify_status(status.as_u16(), body));
        }

        let body = response
            .text()
            .map_err(|e| DashboardError::Transport(e.to_string()))?;
        let result: GeminiResponse = serde_json::from_str(&body)
            .map_err(|e| DashboardError::ResponseShape(e.to_string()))?;

        result.first_text().map(str::to_owned).ok_or_else(|| {
            DashboardError::ResponseShape("no candidate text in response".to_string())
        })
    }
}

impl InsightProvider for GeminiProvider {
    fn generate(&self, prompt: &str) -> Result<String> {
        self.call_api(prompt)
    }

    fn name(&self) -> &str {
        "Gemini"
    }

    fn model(&self) -> Option<&str> {
        Some(&self.config.model)
    }
}

//! Chart insight requests.
//!
//! [`InsightRequester::request_insights`] never fails: every outcome is an
//! [`InsightSet`] holding either up to three generated bullet points or the
//! explanatory text for the failure.

use std::sync::Arc;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use super::InsightProvider;
use crate::aggregate::AggregateTable;
use crate::config::{
    DEFAULT_API_KEY_ENV, DEFAULT_MAX_INSIGHTS, DashboardConfig, MAX_INSIGHTS,
};
use crate::error::{DashboardError, Result};

/// Leading bullet marker plus the whitespace after it. A `*` only counts
/// when whitespace follows, so `**bold**` openers are left alone.
static BULLET_MARKER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(?:[-•]\s*|\*\s+)").expect("Invalid regex: bullet marker"));

/// Insights for one chart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum InsightSet {
    /// Bullet points from the model, 1 to `max_insights` entries.
    Generated { insights: Vec<String> },
    /// Explanatory text for a failed request.
    Failed { code: String, messages: Vec<String> },
}

impl InsightSet {
    /// Strings to show, whichever the outcome.
    pub fn lines(&self) -> &[String] {
        match self {
            Self::Generated { insights } => insights,
            Self::Failed { messages, .. } => messages,
        }
    }

    pub fn is_failure(&self) -> bool {
        matches!(self, Self::Failed { .. })
    }

    /// User-facing text for a failed request.
    pub fn from_error(err: &DashboardError) -> Self {
        let messages = match err.root() {
            DashboardError::MissingCredential(env) => vec![format!(
                "Failed to generate insights: API key is missing. Set the '{}' environment variable.",
                env
            )],
            DashboardError::Authorization { status } => vec![
                format!(
                    "Failed to generate insights: Authorization error (Status {}).",
                    status
                ),
                "Please ensure your API key for the Gemini API is correctly configured."
                    .to_string(),
            ],
            DashboardError::Api { status, .. } => vec![format!(
                "Failed to generate insights: API returned an error ({}).",
                status
            )],
            DashboardError::Transport(_) => vec![
                "Error generating insights: Network or API request failed. Please check your internet connection or API endpoint."
                    .to_string(),
            ],
            DashboardError::ResponseShape(_) => vec![
                "Failed to generate insights: Unexpected API response structure.".to_string(),
            ],
            DashboardError::NoData(label) => vec![format!(
                "No data available for {}; nothing to analyze.",
                label
            )],
            _ => vec!["An unexpected error occurred while generating insights.".to_string()],
        };

        Self::Failed {
            code: err.error_code().to_string(),
            messages,
        }
    }
}

/// Pull bullet points out of generated text.
///
/// Lines starting with `-`, `• ` or `* ` are kept with the marker removed.
/// When no line has a marker, every non-empty line is kept instead. At most
/// `max` entries are returned.
pub fn extract_bullets(text: &str, max: usize) -> Vec<String> {
    let lines: Vec<&str> = text
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect();

    let bullets: Vec<String> = lines
        .iter()
        .filter(|line| BULLET_MARKER.is_match(line))
        .map(|line| BULLET_MARKER.replace(line, "").trim().to_string())
        .filter(|line| !line.is_empty())
        .collect();

    let mut picked = if bullets.is_empty() {
        lines.into_iter().map(str::to_string).collect()
    } else {
        bullets
    };
    picked.truncate(max);
    picked
}

/// The prompt sent for one chart.
pub fn build_prompt(label: &str, table: &AggregateTable, count: usize) -> Result<String> {
    Ok(format!(
        "Based on the following data for the {} chart, provide {} concise and insightful bullet points. \
         Focus on key trends, patterns, and implications.\nData: {}",
        label,
        count,
        table.records_json()?
    ))
}

/// Issues insight requests for chart tables.
///
/// Holds no provider when no credential is configured; every request then
/// answers with the missing-credential text without touching the network.
#[derive(Clone)]
pub struct InsightRequester {
    provider: Option<Arc<dyn InsightProvider>>,
    api_key_env: String,
    max_insights: usize,
}

impl std::fmt::Debug for InsightRequester {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InsightRequester")
            .field("provider", &self.provider.as_ref().map(|p| p.name().to_string()))
            .field("api_key_env", &self.api_key_env)
            .field("max_insights", &self.max_insights)
            .finish()
    }
}

impl InsightRequester {
    pub fn new(provider: Arc<dyn InsightProvider>, config: &DashboardConfig) -> Self {
        Self {
            provider: Some(provider),
            api_key_env: config.api_key_env.clone(),
            max_insights: config.max_insights.clamp(1, MAX_INSIGHTS),
        }
    }

    /// A requester with no credential configured.
    pub fn without_credential(config: &DashboardConfig) -> Self {
        Self {
            provider: None,
            api_key_env: config.api_key_env.clone(),
            max_insights: config.max_insights.clamp(1, MAX_INSIGHTS),
        }
    }

    /// Build a Gemini-backed requester with the key from the environment.
    ///
    /// A missing key is not an error here; it is reported per request.
    #[cfg(feature = "ai")]
    pub fn from_env(config: &DashboardConfig, gemini: super::GeminiConfig) -> Result<Self> {
        match super::GeminiProvider::from_env(&config.api_key_env, gemini) {
            Ok(provider) => Ok(Self::new(Arc::new(provider), config)),
            Err(DashboardError::MissingCredential(env)) => {
                warn!("No API key in '{}'; insight requests will be skipped", env);
                Ok(Self::without_credential(config))
            }
            Err(e) => Err(e),
        }
    }

    pub fn has_credential(&self) -> bool {
        self.provider.is_some()
    }

    pub fn provider_name(&self) -> Option<&str> {
        self.provider.as_ref().map(|p| p.name())
    }

    pub fn max_insights(&self) -> usize {
        self.max_insights
    }

    /// Request insights, surfacing failures as errors.
    pub fn try_request(&self, label: &str, table: &AggregateTable) -> Result<Vec<String>> {
        if table.is_empty() {
            return Err(DashboardError::NoData(label.to_string()));
        }

        let provider = self
            .provider
            .as_ref()
            .ok_or_else(|| DashboardError::MissingCredential(self.api_key_env.clone()))?;

        let prompt = build_prompt(label, table, self.max_insights)?;
        info!(
            "Requesting insights for '{}' from {} ({} rows)",
            label,
            provider.name(),
            table.len()
        );

        let text = provider.generate(&prompt)?;
        let insights = extract_bullets(&text, self.max_insights);
        if insights.is_empty() {
            return Err(DashboardError::ResponseShape(
                "response contained no text lines".to_string(),
            ));
        }
        Ok(insights)
    }

    /// Request insights for one chart table. Never fails.
    pub fn request_insights(&self, label: &str, table: &AggregateTable) -> InsightSet {
        match self.try_request(label, table) {
            Ok(insights) => InsightSet::Generated { insights },
            Err(e) => {
                warn!("Insights for '{}' failed [{}]: {}", label, e.error_code(), e);
                InsightSet::from_error(&e)
            }
        }
    }
}

impl Default for InsightRequester {
    fn default() -> Self {
        Self {
            provider: None,
            api_key_env: DEFAULT_API_KEY_ENV.to_string(),
            max_insights: DEFAULT_MAX_INSIGHTS,
        }
    }
}

static_assertions::assert_impl_all!(InsightRequester: Send, Sync);

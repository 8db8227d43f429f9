//! Configuration types for the dashboard core.
//!
//! This module provides configuration options using the builder pattern
//! for flexible and ergonomic setup.

use serde::{Deserialize, Serialize};

use crate::cleaner::ColumnAliases;

/// Environment variable holding the generative-language API key.
pub const DEFAULT_API_KEY_ENV: &str = "GEMINI_API_KEY";

/// Default number of rows kept in the top-locations chart.
pub const DEFAULT_TOP_LOCATIONS: usize = 5;

/// Default maximum number of insight bullets per chart.
pub const DEFAULT_MAX_INSIGHTS: usize = 3;

/// Upper bound on insight bullets per chart.
pub const MAX_INSIGHTS: usize = 3;

/// Configuration for cleaning, aggregation and insight requests.
///
/// Use [`DashboardConfig::builder()`] to create a new configuration
/// with fluent API.
///
/// # Example
///
/// ```rust,ignore
/// use media_intel::config::DashboardConfig;
///
/// let config = DashboardConfig::builder()
///     .top_locations(10)
///     .column_alias("reach", "engagements")
///     .build()?;
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DashboardConfig {
    /// Number of locations kept in the top-locations chart.
    /// Default: 5
    pub top_locations: usize,

    /// Maximum number of bullet points kept from a model response.
    /// Default: 3
    pub max_insights: usize,

    /// Renames applied after generic column-name normalization.
    /// Default: `plateform -> platform`, `media_type -> mediaType`
    pub column_aliases: ColumnAliases,

    /// Name of the environment variable holding the API key.
    /// Default: "GEMINI_API_KEY"
    pub api_key_env: String,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            top_locations: DEFAULT_TOP_LOCATIONS,
            max_insights: DEFAULT_MAX_INSIGHTS,
            column_aliases: ColumnAliases::default(),
            api_key_env: DEFAULT_API_KEY_ENV.to_string(),
        }
    }
}

impl DashboardConfig {
    /// Create a new configuration builder.
    pub fn builder() -> DashboardConfigBuilder {
        DashboardConfigBuilder::default()
    }

    /// Validate the configuration and return errors if invalid.
    pub fn validate(&self) -> Result<(), ConfigValidationError> {
        if self.top_locations == 0 {
            return Err(ConfigValidationError::InvalidLimit {
                field: "top_locations".to_string(),
                value: self.top_locations,
            });
        }

        if self.max_insights == 0 {
            return Err(ConfigValidationError::InvalidLimit {
                field: "max_insights".to_string(),
                value: self.max_insights,
            });
        }

        if self.max_insights > MAX_INSIGHTS {
            return Err(ConfigValidationError::LimitTooLarge {
                field: "max_insights".to_string(),
                value: self.max_insights,
                max: MAX_INSIGHTS,
            });
        }

        for (raw, canonical) in self.column_aliases.iter() {
            if raw.trim().is_empty() || canonical.trim().is_empty() {
                return Err(ConfigValidationError::EmptyAlias {
                    raw: raw.to_string(),
                    canonical: canonical.to_string(),
                });
            }
        }

        if self.api_key_env.trim().is_empty() {
            return Err(ConfigValidationError::EmptyApiKeyEnv);
        }

        Ok(())
    }
}

/// Errors that can occur during configuration validation.
#[derive(Debug, thiserror::Error)]
pub enum ConfigValidationError {
    #[error("Invalid limit for '{field}': {value} (must be at least 1)")]
    InvalidLimit { field: String, value: usize },

    #[error("Invalid limit for '{field}': {value} (must be at most {max})")]
    LimitTooLarge {
        field: String,
        value: usize,
        max: usize,
    },

    #[error("Invalid column alias '{raw}' -> '{canonical}' (names must not be empty)")]
    EmptyAlias { raw: String, canonical: String },

    #[error("API key environment variable name must not be empty")]
    EmptyApiKeyEnv,
}

/// Builder for [`DashboardConfig`] with fluent API.
#[derive(Debug, Default)]
pub struct DashboardConfigBuilder {
    top_locations: Option<usize>,
    max_insights: Option<usize>,
    column_aliases: Option<ColumnAliases>,
    extra_aliases: Vec<(String, String)>,
    api_key_env: Option<String>,
}

impl DashboardConfigBuilder {
    /// Set how many locations the top-locations chart keeps.
    pub fn top_locations(mut self, n: usize) -> Self {
        self.top_locations = Some(n);
        self
    }

    /// Set the maximum number of insight bullets per chart.
    pub fn max_insights(mut self, n: usize) -> Self {
        self.max_insights = Some(n);
        self
    }

    /// Replace the whole alias table.
    pub fn column_aliases(mut self, aliases: ColumnAliases) -> Self {
        self.column_aliases = Some(aliases);
        self
    }

    /// Add one alias on top of the table (defaults included).
    ///
    /// `raw` is matched against the already normalized column name
    /// (trimmed, lower-cased, spaces as underscores).
    pub fn column_alias(mut self, raw: impl Into<String>, canonical: impl Into<String>) -> Self {
        self.extra_aliases.push((raw.into(), canonical.into()));
        self
    }

    /// Set the environment variable the API key is read from.
    pub fn api_key_env(mut self, name: impl Into<String>) -> Self {
        self.api_key_env = Some(name.into());
        self
    }

    /// Build the configuration.
    ///
    /// Returns a validated `DashboardConfig` or an error if validation fails.
    pub fn build(self) -> Result<DashboardConfig, ConfigValidationError> {
        let mut column_aliases = self.column_aliases.unwrap_or_default();
        for (raw, canonical) in self.extra_aliases {
            column_aliases.insert(raw, canonical);
        }

        let config = DashboardConfig {
            top_locations: self.top_locations.unwrap_or(DEFAULT_TOP_LOCATIONS),
            max_insights: self.max_insights.unwrap_or(DEFAULT_MAX_INSIGHTS),
            column_aliases,
            api_key_env: self
                .api_key_env
                .unwrap_or_else(|| DEFAULT_API_KEY_ENV.to_string()),
        };

        config.validate()?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = DashboardConfig::default();
        assert_eq!(config.top_locations, 5);
        assert_eq!(config.max_insights, 3);
        assert_eq!(config.api_key_env, "GEMINI_API_KEY");
        assert_eq!(config.column_aliases.resolve("plateform"), "platform");
        assert_eq!(config.column_aliases.resolve("media_type"), "mediaType");
    }

    #[test]
    fn test_builder_custom_values() {
        let config = DashboardConfig::builder()
            .top_locations(10)
            .max_insights(5)
            .column_alias("reach", "engagements")
            .api_key_env("MY_KEY")
            .build()
            .unwrap();

        assert_eq!(config.top_locations, 10);
        assert_eq!(config.max_insights, 5);
        assert_eq!(config.api_key_env, "MY_KEY");
        assert_eq!(config.column_aliases.resolve("reach"), "engagements");
        // Defaults survive an added alias
        assert_eq!(config.column_aliases.resolve("plateform"), "platform");
    }

    #[test]
    fn test_validation_zero_top_locations() {
        let result = DashboardConfig::builder().top_locations(0).build();
        assert!(matches!(
            result.unwrap_err(),
            ConfigValidationError::InvalidLimit { .. }
        ));
    }

    #[test]
    fn test_validation_max_insights_bounds() {
        assert!(DashboardConfig::builder().max_insights(3).build().is_ok());

        let result = DashboardConfig::builder().max_insights(5).build();
        assert!(matches!(
            result,
            Err(ConfigValidationError::LimitTooLarge { value: 5, max: 3, .. })
        ));

        let result = DashboardConfig::builder().max_insights(0).build();
        assert!(matches!(
            result,
            Err(ConfigValidationError::InvalidLimit { value: 0, .. })
        ));
    }

    #[test]
    fn test_validation_empty_alias() {
        let result = DashboardConfig::builder().column_alias("", "platform").build();
        assert!(matches!(
            result.unwrap_err(),
            ConfigValidationError::EmptyAlias { .. }
        ));
    }

    #[test]
    fn test_validation_empty_env_name() {
        let result = DashboardConfig::builder().api_key_env("  ").build();
        assert!(matches!(
            result.unwrap_err(),
            ConfigValidationError::EmptyApiKeyEnv
        ));
    }

    #[test]
    fn test_config_from_json() {
        let json = r#"{
            "top_locations": 3,
            "max_insights": 2,
            "column_aliases": {"plateform": "platform", "channel": "platform"},
            "api_key_env": "GOOGLE_API_KEY"
        }"#;

        let config: DashboardConfig =
            serde_json::from_str(json).expect("Should deserialize from frontend JSON");

        assert_eq!(config.top_locations, 3);
        assert_eq!(config.max_insights, 2);
        assert_eq!(config.column_aliases.resolve("channel"), "platform");
        // A replaced table does not carry the media_type default
        assert_eq!(config.column_aliases.resolve("media_type"), "media_type");
        assert!(config.validate().is_ok());
    }
}

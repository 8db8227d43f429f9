//! AI module for chart insights.
//!
//! This module provides a trait-based abstraction for text-generation
//! backends plus the [`InsightRequester`] that turns a chart table into a
//! prompt and the reply into bullet points.
//!
//! # Feature Flag
//!
//! The concrete [`GeminiProvider`] requires the `ai` feature flag (enabled by
//! default). The [`InsightProvider`] trait and the requester are always
//! available for custom implementations.
//!
//! ```toml
//! # Enable AI support (default)
//! media-intel = { version = "0.1", features = ["ai"] }
//!
//! # Disable AI support for smaller binary
//! media-intel = { version = "0.1", default-features = false }
//! ```
//!
//! # Example
//!
//! ```rust,ignore
//! use media_intel::ai::{GeminiConfig, InsightRequester};
//! use media_intel::DashboardConfig;
//!
//! let config = DashboardConfig::default();
//! let requester = InsightRequester::from_env(&config, GeminiConfig::default())?;
//! let set = requester.request_insights(&table.label, &table);
//! ```

// Provider trait and requester are always available
mod insights;
mod provider;

pub use insights::{InsightRequester, InsightSet, build_prompt, extract_bullets};
pub use provider::InsightProvider;

// Concrete providers require the "ai" feature
#[cfg(feature = "ai")]
mod gemini;

#[cfg(feature = "ai")]
pub use gemini::{DEFAULT_BASE_URL, DEFAULT_MODEL, GeminiConfig, GeminiConfigBuilder, GeminiProvider};

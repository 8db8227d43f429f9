//! Media Intelligence Dashboard Core
//!
//! Cleaning, aggregation and AI insight requests for social-media engagement
//! uploads, built with Rust and Polars.
//!
//! # Overview
//!
//! - **Data Cleaning**: Column-name normalization, lenient date parsing,
//!   engagement coercion
//! - **Aggregation**: The five chart tables (sentiment, engagement trend,
//!   platform, media type, top locations)
//! - **AI Insights**: Optional bullet-point insights per chart from Google
//!   Gemini, with a readable message for every failure
//! - **Reporting**: JSON snapshots of a session
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use media_intel::ai::{GeminiConfig, InsightRequester};
//! use media_intel::{ChartKind, DashboardConfig, DashboardSession};
//!
//! let config = DashboardConfig::default();
//! let mut session = DashboardSession::new(config.clone())?;
//! session.load_file("posts.csv")?;
//!
//! for (kind, table) in session.aggregates().unwrap().iter() {
//!     if let Ok(table) = table {
//!         println!("{}: {:?}", kind, table.pairs());
//!     }
//! }
//!
//! // Key from GEMINI_API_KEY (or .env); missing keys are reported per request
//! let requester = InsightRequester::from_env(&config, GeminiConfig::default())?;
//! if let Some(set) = session.request_insights(ChartKind::Platform, &requester) {
//!     for line in set.lines() {
//!         println!("- {}", line);
//!     }
//! }
//! ```
//!
//! # Without a session
//!
//! The pipeline pieces are plain functions over owned data:
//!
//! ```rust,ignore
//! use media_intel::{DataCleaner, aggregate};
//!
//! let table = DataCleaner::default().clean_csv(&bytes)?;
//! let aggregates = aggregate(&table);
//! ```
//!
//! # AI Providers
//!
//! Insight requests go through the [`ai::InsightProvider`] trait.
//! [`ai::GeminiProvider`] is the built-in implementation (requires the `ai`
//! feature); see the [`ai`] module documentation to add another.

pub mod aggregate;
pub mod ai;
pub mod cleaner;
pub mod config;
pub mod error;
pub mod reporting;
pub mod session;
pub mod types;
pub mod utils;

// Re-exports for convenient access
pub use aggregate::{
    AggregateRow, AggregateTable, Aggregator, ChartKind, ChartShape, DashboardAggregates,
    aggregate,
};
pub use ai::{InsightProvider, InsightRequester, InsightSet};
pub use cleaner::{CleanedTable, ColumnAliases, DataCleaner, normalize_column_name};
pub use config::{ConfigValidationError, DashboardConfig, DashboardConfigBuilder};
pub use error::{DashboardError, Result as DashboardResult, ResultExt};
pub use reporting::{ChartReport, DashboardReport, ReportWriter};
pub use session::{DashboardSession, LoadedDataset};
pub use types::{CleanedRecord, CleaningSummary};

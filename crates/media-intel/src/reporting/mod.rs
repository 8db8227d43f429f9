//! Report generation module.
//!
//! Use [`DashboardReport`] for output suitable for:
//! - JSON output to stdout (`--json` CLI flag)
//! - JSON file output (`--emit-report` CLI flag)
//! - Programmatic access in library mode
//!
//! # Example
//!
//! ```rust,ignore
//! use media_intel::reporting::ReportWriter;
//!
//! if let Some(report) = ReportWriter::build_report(&session) {
//!     println!("{}", serde_json::to_string_pretty(&report)?);
//!
//!     let writer = ReportWriter::new("outputs");
//!     writer.write_report_to_file(&report, "posts")?;
//! }
//! ```

mod generator;

pub use generator::{ChartReport, DashboardReport, ReportError, ReportWriter};

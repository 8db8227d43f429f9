use crate::aggregate::{AggregateRow, ChartKind, ChartShape};
use crate::ai::InsightSet;
use crate::error::Result;
use crate::session::DashboardSession;
use crate::types::CleaningSummary;
use chrono::Local;
use serde::{Deserialize, Serialize};
use std::fs::{self, File};
use std::io::Write;
use std::path::PathBuf;
use tracing::info;

// ============================================================================
// Report Types
// ============================================================================

/// Snapshot of a dashboard session for CLI and library output.
///
/// Use this for both JSON output (`--json`) and file writing (`--emit-report`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DashboardReport {
    /// Timestamp when the report was generated
    pub generated_at: String,
    /// Path to the input file, when loaded from disk
    pub input_file: Option<String>,
    /// What cleaning did to the upload
    pub cleaning: CleaningSummary,
    /// One entry per chart, in dashboard order
    pub charts: Vec<ChartReport>,
}

/// One chart in a [`DashboardReport`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartReport {
    pub id: ChartKind,
    pub label: String,
    pub title: String,
    pub shape: ChartShape,
    /// Record field name of the key (e.g. `sentiment`)
    pub key_field: String,
    /// Record field name of the metric (`count` or `engagements`)
    pub metric_field: String,
    /// Aggregated rows; absent when the aggregate failed
    pub rows: Option<Vec<AggregateRow>>,
    /// Why the aggregate failed, if it did
    pub error: Option<ReportError>,
    /// Current insight slot, if requested
    pub insights: Option<InsightSet>,
}

/// Serialized form of an aggregate error.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportError {
    pub code: String,
    pub message: String,
}

/// Builds and writes [`DashboardReport`]s.
pub struct ReportWriter {
    output_dir: PathBuf,
}

impl ReportWriter {
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            output_dir: output_dir.into(),
        }
    }

    /// Snapshot the session. `None` when nothing is loaded.
    pub fn build_report(session: &DashboardSession) -> Option<DashboardReport> {
        let loaded = session.loaded()?;
        let top_locations = session.config().top_locations;

        let charts = loaded
            .aggregates
            .iter()
            .map(|(kind, entry)| {
                let (rows, error) = match entry {
                    Ok(table) => (Some(table.rows.clone()), None),
                    Err(e) => (
                        None,
                        Some(ReportError {
                            code: e.error_code().to_string(),
                            message: e.to_string(),
                        }),
                    ),
                };
                ChartReport {
                    id: kind,
                    label: kind.label(top_locations),
                    title: kind.title(top_locations),
                    shape: kind.shape(),
                    key_field: kind.key_field().to_string(),
                    metric_field: kind.metric_field().to_string(),
                    rows,
                    error,
                    insights: session.insights(kind).cloned(),
                }
            })
            .collect();

        Some(DashboardReport {
            generated_at: Local::now().format("%Y-%m-%d %H:%M:%S").to_string(),
            input_file: loaded.source.clone(),
            cleaning: loaded.table.summary().clone(),
            charts,
        })
    }

    /// Write a report to a JSON file.
    ///
    /// The report is written to the output directory with the specified base name.
    /// For example, if `report_base_name` is "posts", the file will be "posts_report.json".
    pub fn write_report_to_file(
        &self,
        report: &DashboardReport,
        report_base_name: &str,
    ) -> Result<PathBuf> {
        fs::create_dir_all(&self.output_dir)?;

        let report_path = self
            .output_dir
            .join(format!("{}_report.json", report_base_name));
        let mut file = File::create(&report_path)?;
        file.write_all(serde_json::to_string_pretty(report)?.as_bytes())?;

        info!("Report saved: {}", report_path.display());

        Ok(report_path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const CSV: &[u8] = b"Date,plateform,engagements\n2024-01-01,Twitter,10\n";

    fn session() -> DashboardSession {
        let mut session = DashboardSession::default();
        session.load_csv(CSV).unwrap();
        session
    }

    #[test]
    fn test_no_report_without_dataset() {
        assert!(ReportWriter::build_report(&DashboardSession::default()).is_none());
    }

    #[test]
    fn test_report_lists_every_chart() {
        let report = ReportWriter::build_report(&session()).unwrap();

        let ids: Vec<ChartKind> = report.charts.iter().map(|c| c.id).collect();
        assert_eq!(ids, ChartKind::ALL.to_vec());
        assert_eq!(report.cleaning.rows_kept, 1);

        let platform = &report.charts[ChartKind::Platform.index()];
        assert_eq!(
            platform.rows.as_deref(),
            Some(&[AggregateRow::new("Twitter", 10)][..])
        );
        assert!(platform.error.is_none());

        let sentiment = &report.charts[ChartKind::Sentiment.index()];
        assert!(sentiment.rows.is_none());
        assert_eq!(sentiment.error.as_ref().unwrap().code, "COLUMN_NOT_FOUND");
    }

    #[test]
    fn test_write_report_to_file() {
        let dir = std::env::temp_dir().join(format!("media-intel-report-{}", std::process::id()));
        let writer = ReportWriter::new(&dir);
        let report = ReportWriter::build_report(&session()).unwrap();

        let path = writer.write_report_to_file(&report, "posts").unwrap();
        assert_eq!(path, dir.join("posts_report.json"));

        let written: DashboardReport =
            serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(written, report);

        fs::remove_dir_all(&dir).ok();
    }
}

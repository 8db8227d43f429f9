//! CLI entry point for the media intelligence dashboard.

use anyhow::{Result, anyhow};
use clap::{Parser, ValueEnum};
use dotenv::dotenv;
use media_intel::{
    AggregateTable, ChartKind, DashboardConfig, DashboardReport, DashboardSession,
    InsightRequester, InsightSet, ReportWriter,
};
use std::path::Path;
use tracing::{error, info};

#[cfg(feature = "ai")]
use media_intel::ai::GeminiConfig;

/// CLI-compatible chart selector
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
#[value(rename_all = "snake_case")]
enum CliChart {
    /// Sentiment breakdown (pie)
    Sentiment,
    /// Engagements per day (line)
    EngagementTrend,
    /// Engagements per platform (bar)
    Platform,
    /// Media type mix (pie)
    MediaType,
    /// Top locations by engagements (bar)
    TopLocations,
}

impl From<CliChart> for ChartKind {
    fn from(cli: CliChart) -> Self {
        match cli {
            CliChart::Sentiment => ChartKind::Sentiment,
            CliChart::EngagementTrend => ChartKind::EngagementTrend,
            CliChart::Platform => ChartKind::Platform,
            CliChart::MediaType => ChartKind::MediaType,
            CliChart::TopLocations => ChartKind::TopLocations,
        }
    }
}

#[derive(Parser, Debug)]
#[command(
    author = "Media Intel Team",
    version,
    about = "Media Intelligence Dashboard",
    long_about = "Cleans a social-media engagement CSV, builds the five dashboard charts \
                  and optionally asks Gemini for insights on each.\n\n\
                  ENVIRONMENT VARIABLES:\n  \
                  GEMINI_API_KEY    API key for Google Gemini (required for insights)\n\n\
                  EXAMPLES:\n  \
                  # Clean and aggregate\n  \
                  media-intel -i posts.csv\n\n  \
                  # Insights for two charts\n  \
                  media-intel -i posts.csv --insights sentiment --insights platform\n\n  \
                  # Everything as JSON\n  \
                  media-intel -i posts.csv --all-insights --json"
)]
struct Args {
    /// Path to the CSV file to analyze
    #[arg(short, long)]
    input: String,

    /// Output directory for reports
    #[arg(short, long, default_value = "./outputs")]
    output: String,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, default_value = "info")]
    log_level: String,

    /// Suppress progress output (only show errors and final result)
    #[arg(short, long)]
    quiet: bool,

    /// Output JSON to stdout instead of human-readable summary
    ///
    /// Disables all progress logs; only outputs the final JSON report.
    #[arg(long)]
    json: bool,

    /// Write a detailed JSON report to the output directory
    ///
    /// The report will be saved as <input_name>_report.json
    #[arg(short = 'r', long)]
    emit_report: bool,

    /// Request AI insights for a chart (repeatable)
    #[arg(long, value_enum)]
    insights: Vec<CliChart>,

    /// Request AI insights for every chart
    #[arg(long)]
    all_insights: bool,

    /// Gemini model name
    #[arg(long)]
    model: Option<String>,

    /// Gemini API base URL
    #[arg(long)]
    base_url: Option<String>,

    /// Request timeout in seconds (default: HTTP client default)
    #[arg(long)]
    timeout_secs: Option<u64>,

    /// Number of locations in the top-locations chart
    #[arg(long, default_value = "5")]
    top_locations: usize,
}

impl Args {
    /// Charts to request insights for, in dashboard order.
    fn insight_charts(&self) -> Vec<ChartKind> {
        ChartKind::ALL
            .into_iter()
            .filter(|kind| {
                self.all_insights || self.insights.iter().any(|c| ChartKind::from(*c) == *kind)
            })
            .collect()
    }
}

/// Initialize the tracing subscriber for logging.
///
/// When `json_output` is true, logging is completely disabled to ensure
/// only JSON is written to stdout.
fn init_logging(level: &str, quiet: bool, json_output: bool) {
    if json_output {
        return;
    }

    use tracing_subscriber::EnvFilter;

    let effective_level = if quiet { "warn" } else { level };

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(effective_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
}

fn main() -> Result<()> {
    let args = Args::parse();

    init_logging(&args.log_level, args.quiet, args.json);

    // Load environment variables from .env file
    dotenv().ok();

    let config = DashboardConfig::builder()
        .top_locations(args.top_locations)
        .build()?;

    let mut session = DashboardSession::new(config.clone())?;

    info!("Loading dataset from: {}", args.input);
    if let Err(e) = session.load_file(&args.input) {
        error!("Could not load {}: {}", args.input, e);
        return Err(anyhow!("Could not load {}: {}", args.input, e));
    }

    let charts = args.insight_charts();
    if !charts.is_empty() {
        let requester = build_requester(&args, &config)?;
        for kind in charts {
            if session.request_insights(kind, &requester).is_none() {
                info!("Skipping insights for '{}': no data", kind);
            }
        }
    }

    let report = ReportWriter::build_report(&session)
        .ok_or_else(|| anyhow!("No dataset loaded"))?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    if args.emit_report {
        let input_stem = extract_file_stem(&args.input);
        let writer = ReportWriter::new(&args.output);
        let report_path = writer.write_report_to_file(&report, &input_stem)?;
        info!("Report written to: {}", report_path.display());
    }

    print_human_readable_summary(&session, &report);

    Ok(())
}

/// Build the insight requester with optional AI support
#[cfg(feature = "ai")]
fn build_requester(args: &Args, config: &DashboardConfig) -> Result<InsightRequester> {
    let mut builder = GeminiConfig::builder();
    if let Some(ref model) = args.model {
        builder = builder.model(model);
    }
    if let Some(ref base_url) = args.base_url {
        builder = builder.base_url(base_url);
    }
    if let Some(secs) = args.timeout_secs {
        builder = builder.timeout_secs(secs);
    }

    let requester = InsightRequester::from_env(config, builder.build())?;
    if let Some(name) = requester.provider_name() {
        info!("Insights via {}", name);
    }
    Ok(requester)
}

/// Build the insight requester (AI feature disabled)
#[cfg(not(feature = "ai"))]
fn build_requester(_args: &Args, config: &DashboardConfig) -> Result<InsightRequester> {
    info!("Built without the `ai` feature; insight requests will report a missing key");
    Ok(InsightRequester::without_credential(config))
}

/// Extract the file stem (name without extension) from a path.
fn extract_file_stem(path: &str) -> String {
    Path::new(path)
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("output")
        .to_string()
}

fn truncate_str(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}

/// Print a human-readable summary of the dashboard.
///
/// This is the default output when `--json` is not specified.
fn print_human_readable_summary(session: &DashboardSession, report: &DashboardReport) {
    let cleaning = &report.cleaning;

    println!();
    println!("{}", "=".repeat(80));
    println!("MEDIA INTELLIGENCE DASHBOARD");
    println!("{}", "=".repeat(80));
    println!();

    if let Some(ref input) = report.input_file {
        println!("Input: {}", input);
    }
    println!();

    println!("Data Cleaning Summary:");
    println!(
        "  Rows: {} -> {} ({} dropped for an unparseable date)",
        cleaning.rows_read, cleaning.rows_kept, cleaning.rows_dropped_invalid_date
    );
    if cleaning.engagements_synthesized {
        println!("  Engagements: column missing, filled with 0");
    } else {
        println!(
            "  Engagements: {} value(s) defaulted to 0",
            cleaning.engagements_defaulted
        );
    }
    println!("  Columns: {}", cleaning.columns.join(", "));
    println!();

    let Some(aggregates) = session.aggregates() else {
        return;
    };
    let top_locations = session.config().top_locations;

    for (kind, entry) in aggregates.iter() {
        println!("{}", kind.title(top_locations).to_uppercase());
        println!("{}", "-".repeat(40));
        match entry {
            Ok(table) if table.is_empty() => println!("  (no data)"),
            Ok(table) => print_table(table),
            Err(e) => println!("  unavailable: {}", e),
        }

        if let Some(set) = session.insights(kind) {
            print_insights(set);
        }
        println!();
    }
}

fn print_table(table: &AggregateTable) {
    println!(
        "  {:<28} {:>12}",
        table.kind.key_field(),
        table.kind.metric_field()
    );
    for row in &table.rows {
        println!("  {:<28} {:>12}", truncate_str(&row.key, 28), row.value);
    }
}

fn print_insights(set: &InsightSet) {
    println!("  Insights:");
    for line in set.lines() {
        println!("    - {}", line);
    }
}

//! CSV upload loading with fallback strategies.

use crate::error::{DashboardError, Result};
use polars::io::csv::read::CsvReadOptions;
use polars::prelude::*;
use std::io::Cursor;
use std::path::Path;
use tracing::debug;

/// Read an uploaded CSV into a DataFrame whose columns are all text.
///
/// Three strategies are tried in order: a standard quoted read, a read with
/// quoting disabled, and a read of pre-cleaned content. The upload is
/// malformed only when all three fail.
pub fn read_csv_bytes(bytes: &[u8]) -> Result<DataFrame> {
    if bytes.iter().all(|b| b.is_ascii_whitespace()) {
        return Err(DashboardError::MalformedInput(
            "upload is empty".to_string(),
        ));
    }

    // Strategy 1: Standard loading with quote handling
    match read_text_frame(bytes.to_vec(), Some(b'"')) {
        Ok(df) => return Ok(df),
        Err(e) => debug!("Standard loading failed: {}", e),
    }

    // Strategy 2: Without quote handling
    match read_text_frame(bytes.to_vec(), None) {
        Ok(df) => return Ok(df),
        Err(e) => debug!("Loading without quotes failed: {}", e),
    }

    // Strategy 3: Pre-clean content
    let content = String::from_utf8_lossy(bytes);
    let cleaned = clean_csv_content(&content);
    read_text_frame(cleaned.into_bytes(), Some(b'"')).map_err(|e| {
        DashboardError::MalformedInput(format!("could not parse upload as CSV: {}", e))
    })
}

/// Read a CSV file from disk, see [`read_csv_bytes`].
pub fn read_csv_file(path: impl AsRef<Path>) -> Result<DataFrame> {
    let bytes = std::fs::read(path.as_ref())?;
    read_csv_bytes(&bytes)
}

fn read_text_frame(bytes: Vec<u8>, quote_char: Option<u8>) -> PolarsResult<DataFrame> {
    // A zero-row inference window keeps every column as String
    CsvReadOptions::default()
        .with_has_header(true)
        .with_infer_schema_length(Some(0))
        .with_parse_options(CsvParseOptions::default().with_quote_char(quote_char))
        .into_reader_with_file_handle(Cursor::new(bytes))
        .finish()
}

/// Collapse doubled/tripled quotes and drop blank lines.
fn clean_csv_content(content: &str) -> String {
    content
        .replace("\"\"\"", "\"")
        .replace("\"\"", "\"")
        .lines()
        .filter(|line| !line.trim().is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_read_all_columns_as_text() {
        let csv = "Date,engagements\n2024-01-01,10\n2024-01-02,20\n";
        let df = read_csv_bytes(csv.as_bytes()).unwrap();

        assert_eq!(df.shape(), (2, 2));
        for col in df.get_columns() {
            assert_eq!(col.dtype(), &DataType::String);
        }
    }

    #[test]
    fn test_read_header_only() {
        let df = read_csv_bytes(b"Date,plateform\n").unwrap();
        assert_eq!(df.height(), 0);
        assert_eq!(df.width(), 2);
    }

    #[test]
    fn test_empty_upload_is_malformed() {
        let err = read_csv_bytes(b"").unwrap_err();
        assert!(matches!(err, DashboardError::MalformedInput(_)));

        let err = read_csv_bytes(b"  \n\n ").unwrap_err();
        assert!(matches!(err, DashboardError::MalformedInput(_)));
    }

    #[test]
    fn test_clean_csv_content() {
        let content = "a,b\n\n\"\"x\"\",1\n   \n";
        assert_eq!(clean_csv_content(content), "a,b\n\"x\",1");
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let err = read_csv_file("/definitely/not/here.csv").unwrap_err();
        assert_eq!(err.error_code(), "IO_ERROR");
    }
}

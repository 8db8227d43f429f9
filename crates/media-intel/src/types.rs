use serde::{Deserialize, Serialize};

/// One row of the cleaned table, with the fields the charts use.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CleanedRecord {
    /// Calendar date as `YYYY-MM-DD`.
    pub date: String,
    pub platform: Option<String>,
    pub sentiment: Option<String>,
    pub location: Option<String>,
    /// Never negative; defaulted to 0 when missing or unparseable.
    pub engagements: i64,
    #[serde(rename = "mediaType")]
    pub media_type: Option<String>,
}

/// What the cleaning step did to an upload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CleaningSummary {
    /// Rows in the upload before cleaning.
    pub rows_read: usize,
    /// Rows that survived the date filter.
    pub rows_kept: usize,
    /// Rows dropped because their date could not be parsed.
    pub rows_dropped_invalid_date: usize,
    /// Kept rows whose engagements value was defaulted to 0.
    pub engagements_defaulted: usize,
    /// Whether the engagements column was absent and synthesized.
    pub engagements_synthesized: bool,
    /// Header row as uploaded.
    pub original_columns: Vec<String>,
    /// Header row after normalization.
    pub columns: Vec<String>,
    /// Human-readable list of cleaning actions.
    pub actions: Vec<String>,
}

impl CleaningSummary {
    pub fn rows_dropped(&self) -> usize {
        self.rows_read - self.rows_kept
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cleaned_record_serializes_media_type_camel_case() {
        let record = CleanedRecord {
            date: "2024-01-01".to_string(),
            platform: Some("Twitter".to_string()),
            sentiment: Some("Positive".to_string()),
            location: Some("NY".to_string()),
            engagements: 10,
            media_type: Some("Video".to_string()),
        };

        let json = serde_json::to_string(&record).unwrap();
        assert!(json.contains("\"mediaType\":\"Video\""));
        assert!(!json.contains("media_type"));
    }
}

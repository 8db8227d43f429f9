//! Chart aggregation over the cleaned table.
//!
//! Each chart is backed by one [`AggregateTable`], a sequence of
//! `(key, metric)` pairs derived from the cleaned table:
//!
//! | Chart | Key | Metric | Order |
//! |---|---|---|---|
//! | Sentiment | `sentiment` | row count | count desc, first-seen on ties |
//! | Engagement trend | `date` | engagements sum | date asc |
//! | Platform | `platform` | engagements sum | sum asc, key order on ties |
//! | Media type | `mediaType` | row count | count desc, first-seen on ties |
//! | Top locations | `location` | engagements sum | sum desc, top N, key order on ties |
//!
//! Every function here is pure: the same cleaned table always yields the
//! same tables. Rows with a missing key are left out of that chart.

mod chart;

pub use chart::{ChartKind, ChartShape};

use crate::cleaner::CleanedTable;
use crate::config::{DEFAULT_TOP_LOCATIONS, DashboardConfig};
use crate::error::{DashboardError, Result};
use crate::utils::{columns as col, engagement_values, is_missing_text, text_values};
use serde::ser::{SerializeMap, SerializeSeq};
use serde::{Deserialize, Serialize, Serializer};
use std::collections::{BTreeMap, HashMap};
use tracing::debug;

/// One `(key, metric)` pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AggregateRow {
    pub key: String,
    pub value: i64,
}

impl AggregateRow {
    pub fn new(key: impl Into<String>, value: i64) -> Self {
        Self {
            key: key.into(),
            value,
        }
    }
}

/// A chart-ready summary table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AggregateTable {
    pub kind: ChartKind,
    /// Label used when asking for insights.
    pub label: String,
    pub rows: Vec<AggregateRow>,
}

impl AggregateTable {
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Pairs as `(key, metric)` tuples.
    pub fn pairs(&self) -> Vec<(&str, i64)> {
        self.rows.iter().map(|r| (r.key.as_str(), r.value)).collect()
    }

    /// A serializable view as records named by the chart's fields, e.g.
    /// `[{"sentiment": "Positive", "count": 3}]`.
    pub fn records(&self) -> TableRecords<'_> {
        TableRecords(self)
    }

    /// [`Self::records`] as a compact JSON string.
    pub fn records_json(&self) -> Result<String> {
        Ok(serde_json::to_string(&self.records())?)
    }
}

/// Row-order and field-order preserving record view of an [`AggregateTable`].
pub struct TableRecords<'a>(&'a AggregateTable);

impl Serialize for TableRecords<'_> {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let table = self.0;
        let mut seq = serializer.serialize_seq(Some(table.rows.len()))?;
        for row in &table.rows {
            seq.serialize_element(&RecordRef { kind: table.kind, row })?;
        }
        seq.end()
    }
}

struct RecordRef<'a> {
    kind: ChartKind,
    row: &'a AggregateRow,
}

impl Serialize for RecordRef<'_> {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut map = serializer.serialize_map(Some(2))?;
        map.serialize_entry(self.kind.key_field(), &self.row.key)?;
        map.serialize_entry(self.kind.metric_field(), &self.row.value)?;
        map.end()
    }
}

/// The five aggregates for one cleaned table.
///
/// A chart whose key column is absent carries its error instead of a table;
/// the other charts are unaffected.
#[derive(Debug)]
pub struct DashboardAggregates {
    entries: [Result<AggregateTable>; 5],
}

impl DashboardAggregates {
    pub fn get(&self, kind: ChartKind) -> std::result::Result<&AggregateTable, &DashboardError> {
        self.entries[kind.index()].as_ref()
    }

    pub fn table(&self, kind: ChartKind) -> Option<&AggregateTable> {
        self.get(kind).ok()
    }

    pub fn error(&self, kind: ChartKind) -> Option<&DashboardError> {
        self.get(kind).err()
    }

    /// Charts in dashboard order.
    pub fn iter(
        &self,
    ) -> impl Iterator<Item = (ChartKind, std::result::Result<&AggregateTable, &DashboardError>)>
    {
        ChartKind::ALL
            .into_iter()
            .zip(&self.entries)
            .map(|(kind, entry)| (kind, entry.as_ref()))
    }
}

/// Derives chart tables from a cleaned table.
#[derive(Debug, Clone, Copy)]
pub struct Aggregator {
    top_locations: usize,
}

impl Default for Aggregator {
    fn default() -> Self {
        Self::new(DEFAULT_TOP_LOCATIONS)
    }
}

/// Aggregate with the default settings.
pub fn aggregate(table: &CleanedTable) -> DashboardAggregates {
    Aggregator::default().aggregate(table)
}

impl Aggregator {
    pub fn new(top_locations: usize) -> Self {
        Self { top_locations }
    }

    pub fn from_config(config: &DashboardConfig) -> Self {
        Self::new(config.top_locations)
    }

    /// Compute all five charts.
    pub fn aggregate(&self, table: &CleanedTable) -> DashboardAggregates {
        DashboardAggregates {
            entries: ChartKind::ALL.map(|kind| self.table(kind, table)),
        }
    }

    /// Compute one chart.
    pub fn table(&self, kind: ChartKind, table: &CleanedTable) -> Result<AggregateTable> {
        match kind {
            ChartKind::Sentiment => self.sentiment_counts(table),
            ChartKind::EngagementTrend => self.engagement_by_date(table),
            ChartKind::Platform => self.engagement_by_platform(table),
            ChartKind::MediaType => self.media_type_counts(table),
            ChartKind::TopLocations => self.top_locations(table),
        }
    }

    pub fn sentiment_counts(&self, table: &CleanedTable) -> Result<AggregateTable> {
        let rows = value_counts(table, col::SENTIMENT)?;
        Ok(self.build(ChartKind::Sentiment, rows))
    }

    /// Sparse series: only dates present in the data appear.
    pub fn engagement_by_date(&self, table: &CleanedTable) -> Result<AggregateTable> {
        // ISO dates sort chronologically as text
        let rows = summed_by_key(table, col::DATE)?;
        Ok(self.build(ChartKind::EngagementTrend, rows))
    }

    pub fn engagement_by_platform(&self, table: &CleanedTable) -> Result<AggregateTable> {
        let mut rows = summed_by_key(table, col::PLATFORM)?;
        rows.sort_by_key(|r| r.value);
        Ok(self.build(ChartKind::Platform, rows))
    }

    pub fn media_type_counts(&self, table: &CleanedTable) -> Result<AggregateTable> {
        let rows = value_counts(table, col::MEDIA_TYPE)?;
        Ok(self.build(ChartKind::MediaType, rows))
    }

    pub fn top_locations(&self, table: &CleanedTable) -> Result<AggregateTable> {
        let mut rows = summed_by_key(table, col::LOCATION)?;
        rows.sort_by(|a, b| b.value.cmp(&a.value));
        rows.truncate(self.top_locations);
        Ok(self.build(ChartKind::TopLocations, rows))
    }

    fn build(&self, kind: ChartKind, rows: Vec<AggregateRow>) -> AggregateTable {
        debug!("Aggregated '{}': {} row(s)", kind, rows.len());
        AggregateTable {
            kind,
            label: kind.label(self.top_locations),
            rows,
        }
    }
}

/// Row count per distinct value, descending; ties keep first-seen order.
fn value_counts(table: &CleanedTable, column: &str) -> Result<Vec<AggregateRow>> {
    let values = text_values(table.dataframe(), column)?;

    let mut rows: Vec<AggregateRow> = Vec::new();
    let mut index: HashMap<&str, usize> = HashMap::new();
    for value in values {
        if is_missing_text(value) {
            continue;
        }
        let key = value.unwrap_or_default();
        match index.get(key) {
            Some(&i) => rows[i].value += 1,
            None => {
                index.insert(key, rows.len());
                rows.push(AggregateRow::new(key, 1));
            }
        }
    }

    // Stable sort keeps first-seen order among equal counts
    rows.sort_by(|a, b| b.value.cmp(&a.value));
    Ok(rows)
}

/// Engagement sum per distinct value, in ascending key order.
fn summed_by_key(table: &CleanedTable, column: &str) -> Result<Vec<AggregateRow>> {
    let df = table.dataframe();
    let keys = text_values(df, column)?;
    let engagements = engagement_values(df)?;

    let mut sums: BTreeMap<&str, i64> = BTreeMap::new();
    for (key, engagements) in keys.into_iter().zip(engagements) {
        if is_missing_text(key) {
            continue;
        }
        let total = sums.entry(key.unwrap_or_default()).or_insert(0);
        *total = total.saturating_add(engagements);
    }

    Ok(sums
        .into_iter()
        .map(|(key, value)| AggregateRow::new(key, value))
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cleaner::DataCleaner;
    use pretty_assertions::assert_eq;

    const HEADER: &str = "Date,plateform,Sentiment,location,engagements,Media Type";

    fn clean(rows: &[&str]) -> CleanedTable {
        let csv = format!("{}\n{}\n", HEADER, rows.join("\n"));
        DataCleaner::default().clean_csv(csv.as_bytes()).unwrap()
    }

    fn sample() -> CleanedTable {
        clean(&[
            "2024-01-02,Twitter,Positive,NY,10,Video",
            "2024-01-01,FB,Negative,LA,5,Image",
            "2024-01-02,FB,Positive,SF,20,Video",
            "2024-01-03,Instagram,Neutral,NY,1,Text",
            "2024-01-01,Twitter,Negative,LA,4,Image",
        ])
    }

    #[test]
    fn test_sentiment_counts() {
        let table = Aggregator::default().sentiment_counts(&sample()).unwrap();
        assert_eq!(
            table.pairs(),
            vec![("Positive", 2), ("Negative", 2), ("Neutral", 1)]
        );
        assert_eq!(table.label, "Sentiment Breakdown");
    }

    #[test]
    fn test_engagement_by_date_is_ascending_and_sparse() {
        let table = Aggregator::default().engagement_by_date(&sample()).unwrap();
        assert_eq!(
            table.pairs(),
            vec![("2024-01-01", 9), ("2024-01-02", 30), ("2024-01-03", 1)]
        );
    }

    #[test]
    fn test_engagement_by_platform_is_ascending() {
        let table = Aggregator::default().engagement_by_platform(&sample()).unwrap();
        assert_eq!(
            table.pairs(),
            vec![("Instagram", 1), ("Twitter", 14), ("FB", 25)]
        );
    }

    #[test]
    fn test_platform_ties_keep_key_order() {
        let table = clean(&[
            "2024-01-01,Zeta,Positive,NY,5,Video",
            "2024-01-01,Alpha,Positive,NY,5,Video",
        ]);
        let platforms = Aggregator::default().engagement_by_platform(&table).unwrap();
        assert_eq!(platforms.pairs(), vec![("Alpha", 5), ("Zeta", 5)]);
    }

    #[test]
    fn test_media_type_counts() {
        let table = Aggregator::default().media_type_counts(&sample()).unwrap();
        assert_eq!(
            table.pairs(),
            vec![("Video", 2), ("Image", 2), ("Text", 1)]
        );
    }

    #[test]
    fn test_top_locations_keeps_largest_five() {
        let table = clean(&[
            "2024-01-01,A,Positive,L1,1,Video",
            "2024-01-01,A,Positive,L2,2,Video",
            "2024-01-01,A,Positive,L3,3,Video",
            "2024-01-01,A,Positive,L4,4,Video",
            "2024-01-01,A,Positive,L5,5,Video",
            "2024-01-01,A,Positive,L6,6,Video",
            "2024-01-01,A,Positive,L7,7,Video",
        ]);

        let top = Aggregator::default().top_locations(&table).unwrap();
        assert_eq!(
            top.pairs(),
            vec![("L7", 7), ("L6", 6), ("L5", 5), ("L4", 4), ("L3", 3)]
        );
    }

    #[test]
    fn test_top_locations_ties_are_stable() {
        let table = clean(&[
            "2024-01-01,A,Positive,B,5,Video",
            "2024-01-01,A,Positive,A,5,Video",
            "2024-01-01,A,Positive,C,5,Video",
        ]);

        let top = Aggregator::new(2).top_locations(&table).unwrap();
        assert_eq!(top.pairs(), vec![("A", 5), ("B", 5)]);
        assert_eq!(top.label, "Top 2 Locations");
    }

    #[test]
    fn test_top_locations_fewer_than_limit() {
        let top = Aggregator::default().top_locations(&sample()).unwrap();
        assert_eq!(top.pairs(), vec![("SF", 20), ("NY", 11), ("LA", 9)]);
    }

    #[test]
    fn test_missing_keys_are_skipped() {
        let table = clean(&[
            "2024-01-01,,Positive,,3,Video",
            "2024-01-01,FB,,LA,2,",
        ]);
        let agg = aggregate(&table);

        assert_eq!(agg.table(ChartKind::Platform).unwrap().pairs(), vec![("FB", 2)]);
        assert_eq!(agg.table(ChartKind::Sentiment).unwrap().pairs(), vec![("Positive", 1)]);
        assert_eq!(agg.table(ChartKind::MediaType).unwrap().pairs(), vec![("Video", 1)]);
        assert_eq!(agg.table(ChartKind::TopLocations).unwrap().pairs(), vec![("LA", 2)]);
    }

    #[test]
    fn test_empty_table_gives_empty_aggregates() {
        let table = clean(&["never,Twitter,Positive,NY,10,Video"]);
        let agg = aggregate(&table);

        for (kind, entry) in agg.iter() {
            let table = entry.unwrap_or_else(|e| panic!("{kind} failed: {e}"));
            assert!(table.is_empty(), "{kind} should be empty");
        }
    }

    #[test]
    fn test_missing_column_only_fails_its_chart() {
        let table = DataCleaner::default()
            .clean_csv(b"Date,plateform,engagements\n2024-01-01,FB,3\n")
            .unwrap();
        let agg = aggregate(&table);

        assert!(matches!(
            agg.error(ChartKind::Sentiment),
            Some(DashboardError::ColumnNotFound(c)) if c == "sentiment"
        ));
        assert!(agg.error(ChartKind::MediaType).is_some());
        assert!(agg.error(ChartKind::TopLocations).is_some());
        assert_eq!(agg.table(ChartKind::Platform).unwrap().pairs(), vec![("FB", 3)]);
        assert_eq!(
            agg.table(ChartKind::EngagementTrend).unwrap().pairs(),
            vec![("2024-01-01", 3)]
        );
    }

    #[test]
    fn test_aggregation_is_deterministic() {
        let table = sample();
        let first = aggregate(&table);
        let second = aggregate(&table);

        for kind in ChartKind::ALL {
            assert_eq!(first.table(kind), second.table(kind));
        }
    }

    #[test]
    fn test_records_json_preserves_field_and_row_order() {
        let table = Aggregator::default().sentiment_counts(&sample()).unwrap();
        assert_eq!(
            table.records_json().unwrap(),
            r#"[{"sentiment":"Positive","count":2},{"sentiment":"Negative","count":2},{"sentiment":"Neutral","count":1}]"#
        );

        let media = Aggregator::default().media_type_counts(&sample()).unwrap();
        assert!(media.records_json().unwrap().starts_with(r#"[{"mediaType":"Video","count":2}"#));
    }
}

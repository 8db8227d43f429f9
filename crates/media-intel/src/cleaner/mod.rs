//! Data cleaning for engagement uploads.
//!
//! This module turns a raw upload into the cleaned table:
//! - Normalizing column names (plus the alias table)
//! - Parsing dates leniently and dropping rows that do not parse
//! - Coercing engagements to non-negative integers, defaulting to 0
//! - Synthesizing the engagements column when it is absent

mod columns;
mod converters;
mod reader;

pub use columns::{ColumnAliases, normalize_column_name, normalize_headers};
pub use reader::{read_csv_bytes, read_csv_file};

use crate::config::DashboardConfig;
use crate::error::{DashboardError, Result};
use crate::types::{CleanedRecord, CleaningSummary};
use crate::utils::{columns as col, engagement_values, optional_text_values, text_values};
use converters::{coerce_engagements, format_iso_date, parse_lenient_date};
use polars::prelude::*;
use std::collections::HashSet;
use tracing::{debug, info};

/// An upload after normalization, date filtering and engagement coercion.
///
/// Every row has a `date` in `YYYY-MM-DD` form and a non-negative
/// `engagements` integer. Columns beyond the six expected ones are kept.
#[derive(Debug, Clone)]
pub struct CleanedTable {
    df: DataFrame,
    summary: CleaningSummary,
}

impl CleanedTable {
    pub fn dataframe(&self) -> &DataFrame {
        &self.df
    }

    pub fn summary(&self) -> &CleaningSummary {
        &self.summary
    }

    pub fn height(&self) -> usize {
        self.df.height()
    }

    pub fn is_empty(&self) -> bool {
        self.df.height() == 0
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.df.get_column_index(name).is_some()
    }

    /// Materialize the chart-relevant fields row by row.
    pub fn records(&self) -> Result<Vec<CleanedRecord>> {
        let dates = text_values(&self.df, col::DATE)?;
        let engagements = engagement_values(&self.df)?;
        let platforms = optional_text_values(&self.df, col::PLATFORM)?;
        let sentiments = optional_text_values(&self.df, col::SENTIMENT)?;
        let locations = optional_text_values(&self.df, col::LOCATION)?;
        let media_types = optional_text_values(&self.df, col::MEDIA_TYPE)?;

        let cell = |values: &Option<Vec<Option<&str>>>, idx: usize| {
            values
                .as_ref()
                .and_then(|v| v[idx])
                .map(str::to_string)
        };

        Ok(dates
            .into_iter()
            .zip(engagements)
            .enumerate()
            .map(|(idx, (date, engagements))| CleanedRecord {
                date: date.unwrap_or_default().to_string(),
                platform: cell(&platforms, idx),
                sentiment: cell(&sentiments, idx),
                location: cell(&locations, idx),
                engagements,
                media_type: cell(&media_types, idx),
            })
            .collect())
    }
}

/// Cleans raw uploads into [`CleanedTable`]s.
#[derive(Debug, Clone, Default)]
pub struct DataCleaner {
    aliases: ColumnAliases,
}

impl DataCleaner {
    pub fn new(aliases: ColumnAliases) -> Self {
        Self { aliases }
    }

    pub fn from_config(config: &DashboardConfig) -> Self {
        Self::new(config.column_aliases.clone())
    }

    /// Parse and clean an uploaded CSV.
    pub fn clean_csv(&self, bytes: &[u8]) -> Result<CleanedTable> {
        let raw = read_csv_bytes(bytes)?;
        self.clean(raw)
    }

    /// Clean an already parsed upload.
    ///
    /// Fails with `MalformedInput` when normalization produces duplicate
    /// column names or no `date` column exists.
    pub fn clean(&self, raw: DataFrame) -> Result<CleanedTable> {
        info!("Cleaning upload: {:?}", raw.shape());

        let original_columns: Vec<String> = raw
            .get_column_names()
            .into_iter()
            .map(|s| s.to_string())
            .collect();
        let normalized = normalize_headers(&original_columns, &self.aliases);

        let mut seen = HashSet::new();
        if let Some(dup) = normalized.iter().find(|name| !seen.insert(name.as_str())) {
            return Err(DashboardError::MalformedInput(format!(
                "column '{}' appears more than once after normalization",
                dup
            )));
        }

        let date_idx = normalized
            .iter()
            .position(|name| name == col::DATE)
            .ok_or_else(|| {
                DashboardError::MalformedInput(format!(
                    "required column '{}' not found (columns: {:?})",
                    col::DATE,
                    original_columns
                ))
            })?;

        let mut actions = Vec::new();
        if normalized != original_columns {
            actions.push(format!(
                "Normalized column names: {:?} -> {:?}",
                original_columns, normalized
            ));
        }

        // Date filter decides which rows survive
        let date_text = raw.get_columns()[date_idx]
            .as_materialized_series()
            .cast(&DataType::String)?;
        let parsed_dates: Vec<Option<String>> = date_text
            .str()?
            .into_iter()
            .map(|v| v.and_then(parse_lenient_date).map(format_iso_date))
            .collect();
        let keep: Vec<bool> = parsed_dates.iter().map(Option::is_some).collect();

        let rows_read = raw.height();
        let rows_kept = keep.iter().filter(|k| **k).count();
        let rows_dropped = rows_read - rows_kept;
        debug!("Date filter kept {} of {} rows", rows_kept, rows_read);

        actions.push(format!(
            "Converted '{}' to YYYY-MM-DD; dropped {} row(s) with an unparseable date",
            col::DATE,
            rows_dropped
        ));

        let mut columns: Vec<Column> = Vec::with_capacity(normalized.len() + 1);
        let mut engagements_defaulted = 0;
        let mut engagements_synthesized = true;

        for (raw_column, name) in raw.get_columns().iter().zip(&normalized) {
            let text = raw_column.as_materialized_series().cast(&DataType::String)?;
            let values = text.str()?;

            let series = if name == col::DATE {
                let dates: Vec<&str> = parsed_dates.iter().flatten().map(String::as_str).collect();
                Series::new(name.as_str().into(), dates)
            } else if name == col::ENGAGEMENTS {
                engagements_synthesized = false;
                let mut coerced = Vec::with_capacity(rows_kept);
                for (value, _) in values.into_iter().zip(&keep).filter(|(_, k)| **k) {
                    match coerce_engagements(value) {
                        Some(n) => coerced.push(n),
                        None => {
                            engagements_defaulted += 1;
                            coerced.push(0i64);
                        }
                    }
                }
                Series::new(name.as_str().into(), coerced)
            } else {
                let kept: Vec<Option<&str>> = values
                    .into_iter()
                    .zip(&keep)
                    .filter_map(|(value, k)| k.then_some(value))
                    .collect();
                Series::new(name.as_str().into(), kept)
            };

            columns.push(Column::from(series));
        }

        if engagements_synthesized {
            columns.push(Column::from(Series::new(
                col::ENGAGEMENTS.into(),
                vec![0i64; rows_kept],
            )));
            actions.push(format!(
                "Column '{}' not present; added it with 0 for every row",
                col::ENGAGEMENTS
            ));
        } else {
            actions.push(format!(
                "Filled {} missing or non-numeric '{}' value(s) with 0",
                engagements_defaulted,
                col::ENGAGEMENTS
            ));
        }

        let df = DataFrame::new(columns)?;
        let columns_after = df
            .get_column_names()
            .into_iter()
            .map(|s| s.to_string())
            .collect();

        info!(
            "Cleaning complete: {} rows kept, {} dropped",
            rows_kept, rows_dropped
        );

        Ok(CleanedTable {
            df,
            summary: CleaningSummary {
                rows_read,
                rows_kept,
                rows_dropped_invalid_date: rows_dropped,
                engagements_defaulted,
                engagements_synthesized,
                original_columns,
                columns: columns_after,
                actions,
            },
        })
    }
}

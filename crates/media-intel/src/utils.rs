//! Shared helpers for reading the cleaned table.
//!
//! The cleaned table stores every column as text except `engagements`
//! (Int64), so these accessors only need those two shapes.

use crate::error::{DashboardError, Result};
use polars::prelude::*;

/// Canonical column names the charts read.
pub mod columns {
    pub const DATE: &str = "date";
    pub const PLATFORM: &str = "platform";
    pub const SENTIMENT: &str = "sentiment";
    pub const LOCATION: &str = "location";
    pub const ENGAGEMENTS: &str = "engagements";
    pub const MEDIA_TYPE: &str = "mediaType";
}

/// Whether a text cell counts as missing.
#[inline]
pub fn is_missing_text(value: Option<&str>) -> bool {
    value.is_none_or(str::is_empty)
}

/// Borrow a text column's values, or fail with `ColumnNotFound`.
pub fn text_values<'a>(df: &'a DataFrame, name: &str) -> Result<Vec<Option<&'a str>>> {
    let column = df
        .column(name)
        .map_err(|_| DashboardError::ColumnNotFound(name.to_string()))?;
    let values = column.as_materialized_series().str()?;
    Ok(values.into_iter().collect())
}

/// Like [`text_values`] but `None` when the column is absent.
pub fn optional_text_values<'a>(
    df: &'a DataFrame,
    name: &str,
) -> Result<Option<Vec<Option<&'a str>>>> {
    if df.get_column_index(name).is_none() {
        return Ok(None);
    }
    text_values(df, name).map(Some)
}

/// The engagements column as plain integers (nulls read as 0).
pub fn engagement_values(df: &DataFrame) -> Result<Vec<i64>> {
    let column = df
        .column(columns::ENGAGEMENTS)
        .map_err(|_| DashboardError::ColumnNotFound(columns::ENGAGEMENTS.to_string()))?;
    let values = column.as_materialized_series().i64()?;
    Ok(values.into_iter().map(|v| v.unwrap_or(0)).collect())
}

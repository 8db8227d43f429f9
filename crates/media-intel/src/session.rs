//! Dashboard session state.
//!
//! A [`DashboardSession`] owns the currently loaded dataset, its five
//! aggregates and one insight slot per chart. Loading a new upload replaces
//! everything; insight requests only ever touch their own chart's slot.
//!
//! ```text
//! ┌──────────────────────────────────────────────┐
//! │               DashboardSession               │
//! ├──────────────────────────────────────────────┤
//! │ dataset: Option<LoadedDataset>               │
//! │   - table: CleanedTable (+ CleaningSummary)  │
//! │   - aggregates: DashboardAggregates          │
//! │   - source: Option<String>                   │
//! ├──────────────────────────────────────────────┤
//! │ insights: ChartKind -> InsightSet            │
//! └──────────────────────────────────────────────┘
//! ```

use std::collections::BTreeMap;
use std::path::Path;

use tracing::{info, warn};

use crate::aggregate::{Aggregator, ChartKind, DashboardAggregates};
use crate::ai::{InsightRequester, InsightSet};
use crate::cleaner::{CleanedTable, DataCleaner};
use crate::config::DashboardConfig;
use crate::error::{DashboardError, Result};
use crate::types::CleaningSummary;

/// A cleaned upload plus its aggregates.
#[derive(Debug)]
pub struct LoadedDataset {
    pub table: CleanedTable,
    pub aggregates: DashboardAggregates,
    /// Where the upload came from, when known.
    pub source: Option<String>,
}

/// Caller-owned dashboard state.
#[derive(Debug)]
pub struct DashboardSession {
    config: DashboardConfig,
    cleaner: DataCleaner,
    aggregator: Aggregator,
    dataset: Option<LoadedDataset>,
    insights: BTreeMap<ChartKind, InsightSet>,
}

impl Default for DashboardSession {
    fn default() -> Self {
        let config = DashboardConfig::default();
        Self {
            cleaner: DataCleaner::from_config(&config),
            aggregator: Aggregator::from_config(&config),
            config,
            dataset: None,
            insights: BTreeMap::new(),
        }
    }
}

impl DashboardSession {
    /// Create an empty session, validating `config` first.
    pub fn new(config: DashboardConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            cleaner: DataCleaner::from_config(&config),
            aggregator: Aggregator::from_config(&config),
            config,
            dataset: None,
            insights: BTreeMap::new(),
        })
    }

    pub fn config(&self) -> &DashboardConfig {
        &self.config
    }

    /// Clean and aggregate an uploaded CSV, replacing the current dataset.
    ///
    /// All insight slots are cleared. On failure the previous dataset is
    /// cleared too, so stale charts are never shown next to an error.
    pub fn load_csv(&mut self, bytes: &[u8]) -> Result<&LoadedDataset> {
        self.load(bytes, None)
    }

    /// Read and load a CSV file.
    pub fn load_file(&mut self, path: impl AsRef<Path>) -> Result<&LoadedDataset> {
        let path = path.as_ref();
        match std::fs::read(path) {
            Ok(bytes) => self.load(&bytes, Some(path.display().to_string())),
            Err(e) => {
                self.clear();
                Err(DashboardError::from(e).with_context(format!("reading {}", path.display())))
            }
        }
    }

    fn load(&mut self, bytes: &[u8], source: Option<String>) -> Result<&LoadedDataset> {
        self.clear();

        let table = match self.cleaner.clean_csv(bytes) {
            Ok(table) => table,
            Err(e) => {
                warn!("Upload rejected: {}", e);
                return Err(e);
            }
        };
        let aggregates = self.aggregator.aggregate(&table);

        info!(
            "Loaded dataset: {} rows kept of {}",
            table.summary().rows_kept,
            table.summary().rows_read
        );

        Ok(self.dataset.insert(LoadedDataset {
            table,
            aggregates,
            source,
        }))
    }

    /// Drop the dataset and every insight slot.
    pub fn clear(&mut self) {
        self.dataset = None;
        self.insights.clear();
    }

    pub fn loaded(&self) -> Option<&LoadedDataset> {
        self.dataset.as_ref()
    }

    pub fn dataset(&self) -> Option<&CleanedTable> {
        self.dataset.as_ref().map(|d| &d.table)
    }

    pub fn aggregates(&self) -> Option<&DashboardAggregates> {
        self.dataset.as_ref().map(|d| &d.aggregates)
    }

    pub fn cleaning_summary(&self) -> Option<&CleaningSummary> {
        self.dataset().map(CleanedTable::summary)
    }

    /// Ask for insights on one chart and store them in its slot.
    ///
    /// Makes no request and returns `None` when no dataset is loaded or the
    /// chart's aggregate is missing or empty; the slot is left untouched.
    pub fn request_insights(
        &mut self,
        chart: ChartKind,
        requester: &InsightRequester,
    ) -> Option<&InsightSet> {
        let table = self.aggregates()?.table(chart)?;
        if table.is_empty() {
            return None;
        }

        let set = requester.request_insights(&table.label, table);
        self.insights.insert(chart, set);
        self.insights.get(&chart)
    }

    /// The current insight slot for `chart`.
    pub fn insights(&self, chart: ChartKind) -> Option<&InsightSet> {
        self.insights.get(&chart)
    }
}

//! Dashboard Pipeline
//! Pure stages from an uploaded file and filter selections to everything the
//! dashboard displays. Nothing here holds session state; the GUI keeps the
//! [`Dataset`] and calls [`Dataset::refresh_view`] on every change.

use polars::prelude::*;

use crate::config::DashboardConfig;
use crate::data::{
    apply_filters, available_filter_options, discover_filter_columns, init_filter_state,
    reset_stale_selections, DataLoader, DataProcessor, FilterColumn, FilterState, LoaderError,
    Upload,
};
use crate::stats::{GroupMean, Histogram, StatsCalculator, Summary};

/// A cleaned upload. Immutable for the rest of the session.
#[derive(Debug, Clone)]
pub struct Dataset {
    pub file_name: String,
    pub table: DataFrame,
    /// Filters that exist in the table, with options from every row
    pub filter_columns: Vec<FilterColumn>,
    /// Set when the configured price column exists (and has been cleaned)
    pub price_column: Option<String>,
    /// Set when the configured group column exists
    pub group_column: Option<String>,
}

/// Text rendering of a table for the data grid.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TablePreview {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl TablePreview {
    pub fn from_dataframe(df: &DataFrame) -> PolarsResult<Self> {
        let headers = df
            .get_column_names()
            .iter()
            .map(|s| s.to_string())
            .collect();

        let rows = (0..df.height())
            .map(|i| {
                df.get_columns()
                    .iter()
                    .map(|col| col.get(i).map(cell_text))
                    .collect::<PolarsResult<Vec<String>>>()
            })
            .collect::<PolarsResult<Vec<_>>>()?;

        Ok(Self { headers, rows })
    }

    /// Grid lines including the header line.
    pub fn line_count(&self) -> usize {
        self.rows.len() + 1
    }

    /// Grid line `index`: 0 is the header, then one line per row.
    pub fn line(&self, index: usize) -> Option<&[String]> {
        match index.checked_sub(1) {
            None => Some(&self.headers),
            Some(row) => self.rows.get(row).map(Vec::as_slice),
        }
    }
}

fn cell_text(value: AnyValue) -> String {
    match value {
        AnyValue::Null => String::new(),
        AnyValue::String(s) => s.to_string(),
        AnyValue::StringOwned(s) => s.to_string(),
        other => other.to_string(),
    }
}

/// Everything derived from one filter selection.
#[derive(Debug, Clone)]
pub struct DashboardView {
    pub filtered: DataFrame,
    /// Filter options under the current selections
    pub filter_columns: Vec<FilterColumn>,
    pub summary: Summary,
    /// Present only when the price column exists
    pub histogram: Option<Histogram>,
    /// Present only when both the group and price columns exist
    pub group_means: Option<Vec<GroupMean>>,
    pub table: TablePreview,
}

impl Dataset {
    /// Parse and clean an upload, and discover which filters apply.
    pub fn ingest(upload: &Upload, config: &DashboardConfig) -> Result<Self, LoaderError> {
        let raw = DataLoader::load(upload)?;
        let table = DataProcessor::clean_price_column(&raw, &config.price_column)?;
        let filter_columns = discover_filter_columns(&table, &config.filters)?;

        let has = |name: &str| table.column(name).is_ok();
        let price_column = has(&config.price_column).then(|| config.price_column.clone());
        let group_column = has(&config.group_column).then(|| config.group_column.clone());

        log::info!(
            "Loaded {}: {} rows, {} columns",
            upload.file_name,
            table.height(),
            table.width()
        );

        Ok(Self {
            file_name: upload.file_name.clone(),
            table,
            filter_columns,
            price_column,
            group_column,
        })
    }

    /// Filter state with every observed value selected.
    pub fn default_filters(&self) -> FilterState {
        init_filter_state(&self.filter_columns)
    }

    /// Recompute the whole view from scratch for `filters`.
    pub fn compute_view(
        &self,
        filters: &FilterState,
        config: &DashboardConfig,
    ) -> PolarsResult<DashboardView> {
        let filtered = apply_filters(&self.table, filters)?;
        let filter_columns = available_filter_options(&self.table, &self.filter_columns, filters)?;

        let summary = match &self.price_column {
            Some(price) => StatsCalculator::summarize(&filtered, price)?,
            None => Summary {
                count: filtered.height(),
                price: None,
            },
        };

        let histogram = match &self.price_column {
            Some(price) => {
                let values = StatsCalculator::numeric_values(&filtered, price)?;
                Some(StatsCalculator::histogram(&values, config.histogram_bins))
            }
            None => None,
        };

        let group_means = match (&self.group_column, &self.price_column) {
            (Some(group), Some(price)) => {
                Some(StatsCalculator::group_means(&filtered, group, price)?)
            }
            _ => None,
        };

        let table = TablePreview::from_dataframe(&filtered)?;

        log::debug!(
            "Recomputed view: {} of {} rows ({} filter columns)",
            filtered.height(),
            self.table.height(),
            filters.len()
        );

        Ok(DashboardView {
            filtered,
            filter_columns,
            summary,
            histogram,
            group_means,
            table,
        })
    }

    /// Recompute the view after the user edited `filters`.
    ///
    /// `shown` are the options the selection was made against. A filter whose
    /// options changed because of an earlier filter is reset to all of its
    /// new options first.
    pub fn refresh_view(
        &self,
        filters: &mut FilterState,
        shown: &[FilterColumn],
        config: &DashboardConfig,
    ) -> PolarsResult<DashboardView> {
        reset_stale_selections(&self.table, shown, filters)?;
        self.compute_view(filters, config)
    }
}

/// One-shot pipeline: upload + selections → view. `None` selects everything.
pub fn run_pipeline(
    upload: &Upload,
    filters: Option<&FilterState>,
    config: &DashboardConfig,
) -> Result<DashboardView, LoaderError> {
    let dataset = Dataset::ingest(upload, config)?;
    let view = match filters {
        Some(filters) => dataset.compute_view(filters, config)?,
        None => dataset.compute_view(&dataset.default_filters(), config)?,
    };
    Ok(view)
}

//! Data module - upload loading, cleaning, filtering and export

mod export;
mod filter;
mod loader;
mod processor;

pub use export::{CsvExport, ExportError};
pub use filter::{
    apply_filters, available_filter_options, category_label, discover_filter_columns,
    init_filter_state, reset_stale_selections, CategoryValue, FilterColumn, FilterState,
};
pub use loader::{DataLoader, LoaderError, Upload, ACCEPTED_EXTENSIONS};
pub use processor::DataProcessor;

//! CSV Export Module
//! Encodes the filtered table as a downloadable CSV file.

use polars::prelude::*;
use std::path::Path;
use thiserror::Error;

use crate::config::DashboardConfig;

#[derive(Error, Debug)]
pub enum ExportError {
    #[error("Failed to encode CSV: {0}")]
    Csv(#[from] PolarsError),
    #[error("Failed to write file: {0}")]
    Io(#[from] std::io::Error),
}

/// A ready-to-save download: UTF-8 CSV with a header row and no index column.
#[derive(Debug, Clone)]
pub struct CsvExport {
    pub file_name: String,
    pub mime: String,
    pub bytes: Vec<u8>,
}

impl CsvExport {
    /// Encode `df` freshly. Missing values become empty fields.
    pub fn from_dataframe(df: &DataFrame, config: &DashboardConfig) -> Result<Self, ExportError> {
        let mut bytes = Vec::new();
        let mut df = df.clone();
        CsvWriter::new(&mut bytes)
            .include_header(true)
            .finish(&mut df)?;

        Ok(Self {
            file_name: config.export_file_name.clone(),
            mime: config.export_mime.clone(),
            bytes,
        })
    }

    pub fn write_to(&self, path: &Path) -> Result<(), ExportError> {
        std::fs::write(path, &self.bytes)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::DataLoader;

    #[test]
    fn test_export_metadata_and_header() {
        let df = df!(
            "Make" => ["Toyota", "Ford"],
            "Price" => [Some(12000.0), None],
        )
        .unwrap();

        let export = CsvExport::from_dataframe(&df, &DashboardConfig::default()).unwrap();

        assert_eq!(export.file_name, "filtered_car_sales.csv");
        assert_eq!(export.mime, "text/csv");
        let text = String::from_utf8(export.bytes).unwrap();
        let mut lines = text.lines();
        assert_eq!(lines.next(), Some("Make,Price"));
        assert!(lines.next().unwrap().starts_with("Toyota,12000"));
        assert_eq!(lines.next(), Some("Ford,"));
        assert_eq!(lines.next(), None);
    }

    #[test]
    fn test_export_reparses_to_same_table() {
        let df = df!(
            "Make" => ["Toyota", "Ford", "BMW"],
            "Colour" => ["Red", "Blue, dark", "Black"],
            "Year" => [2015i64, 2018, 2020],
            "Price" => [Some(12000.5), None, Some(30500.0)],
        )
        .unwrap();

        let export = CsvExport::from_dataframe(&df, &DashboardConfig::default()).unwrap();
        let reparsed = DataLoader::load_csv(&export.bytes).unwrap();

        assert!(reparsed.equals_missing(&df));
    }

    #[test]
    fn test_write_to_disk() {
        let df = df!("Make" => ["Toyota"]).unwrap();
        let export = CsvExport::from_dataframe(&df, &DashboardConfig::default()).unwrap();

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(&export.file_name);
        export.write_to(&path).unwrap();

        assert_eq!(std::fs::read(&path).unwrap(), export.bytes);
    }
}

//! Upload Loader Module
//! Parses uploaded CSV or XLSX files into a Polars DataFrame.

use calamine::{Data, Reader, Xlsx};
use polars::prelude::*;
use std::collections::HashMap;
use std::io::Cursor;
use std::path::Path;
use thiserror::Error;

/// Extensions offered by the upload dialog.
pub const ACCEPTED_EXTENSIONS: [&str; 2] = ["csv", "xlsx"];

#[derive(Error, Debug)]
pub enum LoaderError {
    #[error("Failed to parse table: {0}")]
    Parse(#[from] PolarsError),
    #[error("Failed to read spreadsheet: {0}")]
    Spreadsheet(#[from] calamine::XlsxError),
    #[error("Failed to read file: {0}")]
    Io(#[from] std::io::Error),
}

/// How an upload is parsed, decided by its file name only.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileKind {
    Csv,
    Spreadsheet,
}

impl FileKind {
    /// `.csv` (any case) is comma-separated text, anything else is a workbook.
    pub fn from_file_name(file_name: &str) -> Self {
        if file_name.to_ascii_lowercase().ends_with(".csv") {
            FileKind::Csv
        } else {
            FileKind::Spreadsheet
        }
    }
}

/// Raw contents of a user-selected file.
#[derive(Debug, Clone)]
pub struct Upload {
    pub file_name: String,
    pub bytes: Vec<u8>,
}

impl Upload {
    pub fn new(file_name: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            file_name: file_name.into(),
            bytes,
        }
    }

    /// Read a picked file from disk.
    pub fn read(path: &Path) -> Result<Self, LoaderError> {
        let bytes = std::fs::read(path)?;
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_default();
        Ok(Self { file_name, bytes })
    }

    pub fn kind(&self) -> FileKind {
        FileKind::from_file_name(&self.file_name)
    }
}

/// Parses uploads into DataFrames.
pub struct DataLoader;

impl DataLoader {
    /// Parse an upload, dispatching on its extension.
    pub fn load(upload: &Upload) -> Result<DataFrame, LoaderError> {
        match upload.kind() {
            FileKind::Csv => Self::load_csv(&upload.bytes),
            FileKind::Spreadsheet => Self::load_xlsx(&upload.bytes),
        }
    }

    /// Load comma-separated text with a header row.
    pub fn load_csv(bytes: &[u8]) -> Result<DataFrame, LoaderError> {
        let df = CsvReadOptions::default()
            .with_has_header(true)
            .with_infer_schema_length(Some(10000))
            .into_reader_with_file_handle(Cursor::new(bytes.to_vec()))
            .finish()?;
        Ok(df)
    }

    /// Load the first worksheet of an `.xlsx` workbook, first row as header.
    pub fn load_xlsx(bytes: &[u8]) -> Result<DataFrame, LoaderError> {
        let mut workbook: Xlsx<_> = Xlsx::new(Cursor::new(bytes.to_vec()))?;

        let range = match workbook.worksheet_range_at(0) {
            Some(range) => range?,
            None => return Ok(DataFrame::empty()),
        };

        let mut rows = range.rows();
        let Some(header) = rows.next() else {
            return Ok(DataFrame::empty());
        };
        let body: Vec<&[Data]> = rows.collect();

        let columns: Vec<Column> = Self::header_names(header)
            .iter()
            .enumerate()
            .map(|(j, name)| {
                let cells: Vec<Option<&Data>> = body
                    .iter()
                    .map(|row| row.get(j).filter(|c| !matches!(c, Data::Empty)))
                    .collect();
                Self::sheet_column(name, &cells)
            })
            .collect();

        Ok(DataFrame::new(columns)?)
    }

    /// Header cells as column names. Blank headers become `Unnamed: {index}`
    /// and repeats get `.1`, `.2`, ... suffixes.
    pub fn header_names(header: &[Data]) -> Vec<String> {
        let mut seen: HashMap<String, usize> = HashMap::new();

        header
            .iter()
            .enumerate()
            .map(|(j, cell)| {
                let base = match cell {
                    Data::Empty => format!("Unnamed: {}", j),
                    other => other.to_string(),
                };

                match seen.get_mut(&base) {
                    Some(n) => {
                        *n += 1;
                        format!("{}.{}", base, n)
                    }
                    None => {
                        seen.insert(base.clone(), 0);
                        base
                    }
                }
            })
            .collect()
    }

    /// Build a typed column from worksheet cells (`None` = blank cell).
    fn sheet_column(name: &str, cells: &[Option<&Data>]) -> Column {
        let present: Vec<&Data> = cells.iter().flatten().copied().collect();

        let all_numeric = present
            .iter()
            .all(|c| matches!(c, Data::Int(_) | Data::Float(_)));
        let all_bool = !present.is_empty() && present.iter().all(|c| matches!(c, Data::Bool(_)));

        if all_bool {
            let values: Vec<Option<bool>> = cells
                .iter()
                .map(|c| match c {
                    Some(Data::Bool(b)) => Some(*b),
                    _ => None,
                })
                .collect();
            return Column::new(name.into(), values);
        }

        if all_numeric {
            let values: Vec<Option<f64>> = cells
                .iter()
                .map(|c| match c {
                    Some(Data::Int(i)) => Some(*i as f64),
                    Some(Data::Float(f)) => Some(*f),
                    _ => None,
                })
                .collect();

            let integral = !present.is_empty()
                && values
                    .iter()
                    .flatten()
                    .all(|v| v.fract() == 0.0 && v.abs() < i64::MAX as f64);
            if integral {
                let ints: Vec<Option<i64>> =
                    values.iter().map(|v| v.map(|f| f as i64)).collect();
                return Column::new(name.into(), ints);
            }
            return Column::new(name.into(), values);
        }

        let values: Vec<Option<String>> = cells
            .iter()
            .map(|c| c.map(|cell| cell.to_string()))
            .collect();
        Column::new(name.into(), values)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_xlsxwriter::{Workbook, Worksheet};

    fn sample_workbook() -> Vec<u8> {
        let mut workbook = Workbook::new();
        let mut worksheet = Worksheet::new();

        worksheet.write_string(0, 0, "Make").unwrap();
        worksheet.write_string(0, 1, "Price").unwrap();
        worksheet.write_string(0, 2, "Year").unwrap();
        worksheet.write_string(0, 3, "Used").unwrap();

        worksheet.write_string(1, 0, "Toyota").unwrap();
        worksheet.write_number(1, 1, 12000.0).unwrap();
        worksheet.write_number(1, 2, 2015.0).unwrap();
        worksheet.write_boolean(1, 3, true).unwrap();

        worksheet.write_string(2, 0, "Ford").unwrap();
        worksheet.write_string(2, 1, "$9,500").unwrap();
        worksheet.write_number(2, 2, 2018.0).unwrap();
        worksheet.write_boolean(2, 3, false).unwrap();

        workbook.push_worksheet(worksheet);
        workbook.save_to_buffer().unwrap()
    }

    #[test]
    fn test_file_kind_from_name() {
        assert_eq!(FileKind::from_file_name("sales.csv"), FileKind::Csv);
        assert_eq!(FileKind::from_file_name("SALES.CSV"), FileKind::Csv);
        assert_eq!(FileKind::from_file_name("sales.xlsx"), FileKind::Spreadsheet);
        assert_eq!(FileKind::from_file_name("sales"), FileKind::Spreadsheet);
    }

    #[test]
    fn test_load_csv_with_header() {
        let csv = "Make,Colour,Price\nToyota,Red,\"$12,000\"\nFord,Blue,15000\n";
        let upload = Upload::new("cars.csv", csv.as_bytes().to_vec());

        let df = DataLoader::load(&upload).unwrap();

        assert_eq!(df.height(), 2);
        let names: Vec<String> = df
            .get_column_names()
            .iter()
            .map(|s| s.to_string())
            .collect();
        assert_eq!(names, vec!["Make", "Colour", "Price"]);
        assert_eq!(df.column("Price").unwrap().dtype(), &DataType::String);
    }

    #[test]
    fn test_load_xlsx_first_sheet() {
        let upload = Upload::new("cars.xlsx", sample_workbook());

        let df = DataLoader::load(&upload).unwrap();

        assert_eq!(df.height(), 2);
        assert_eq!(df.column("Make").unwrap().dtype(), &DataType::String);
        // Mixed numbers and text stay textual until the price is cleaned
        assert_eq!(df.column("Price").unwrap().dtype(), &DataType::String);
        assert_eq!(df.column("Year").unwrap().dtype(), &DataType::Int64);
        assert_eq!(df.column("Used").unwrap().dtype(), &DataType::Boolean);

        let years: Vec<Option<i64>> = df
            .column("Year")
            .unwrap()
            .i64()
            .unwrap()
            .into_iter()
            .collect();
        assert_eq!(years, vec![Some(2015), Some(2018)]);
    }

    #[test]
    fn test_malformed_xlsx_is_error() {
        let upload = Upload::new("broken.xlsx", b"definitely not a zip archive".to_vec());
        let err = DataLoader::load(&upload).unwrap_err();
        assert!(matches!(err, LoaderError::Spreadsheet(_)));
    }

    #[test]
    fn test_ragged_csv_is_error() {
        let csv = "Make,Price\nToyota,12000\nFord,15000,Blue,2018\n";
        let upload = Upload::new("ragged.csv", csv.as_bytes().to_vec());

        let err = DataLoader::load(&upload).unwrap_err();
        assert!(matches!(err, LoaderError::Parse(_)));
    }

    #[test]
    fn test_header_names_blank_and_duplicates() {
        let header = vec![
            Data::String("Make".to_string()),
            Data::Empty,
            Data::String("Make".to_string()),
            Data::String("Make".to_string()),
        ];
        assert_eq!(
            DataLoader::header_names(&header),
            vec!["Make", "Unnamed: 1", "Make.1", "Make.2"]
        );
    }

    #[test]
    fn test_read_upload_from_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cars.csv");
        std::fs::write(&path, "Make\nToyota\n").unwrap();

        let upload = Upload::read(&path).unwrap();
        assert_eq!(upload.file_name, "cars.csv");
        assert_eq!(upload.kind(), FileKind::Csv);
    }
}

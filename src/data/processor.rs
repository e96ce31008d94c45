//! Data Processor Module
//! Cleans currency-formatted columns into numeric ones.

use polars::prelude::*;

/// Characters stripped from a price cell before parsing.
const CURRENCY_SYMBOLS: [char; 2] = ['$', ','];

/// Handles data cleaning operations. Every method returns a new DataFrame.
pub struct DataProcessor;

impl DataProcessor {
    /// Parse one price cell: drop `$` and `,`, then read a finite float.
    pub fn parse_price(raw: &str) -> Option<f64> {
        let cleaned: String = raw
            .chars()
            .filter(|c| !CURRENCY_SYMBOLS.contains(c))
            .collect();
        cleaned
            .trim()
            .parse::<f64>()
            .ok()
            .filter(|v| v.is_finite())
    }

    /// Replace `column` with its cleaned `Float64` version.
    ///
    /// Cells that do not parse become null. A missing column leaves the
    /// frame unchanged.
    pub fn clean_price_column(df: &DataFrame, column: &str) -> PolarsResult<DataFrame> {
        let Ok(raw) = df.column(column) else {
            return Ok(df.clone());
        };

        let as_text = raw.cast(&DataType::String)?;
        let values: Vec<Option<f64>> = as_text
            .str()?
            .into_iter()
            .map(|cell| cell.and_then(Self::parse_price))
            .collect();

        let missing = values.iter().filter(|v| v.is_none()).count();
        if missing > raw.null_count() {
            log::debug!(
                "{}: {} value(s) could not be parsed as numbers",
                column,
                missing - raw.null_count()
            );
        }

        let mut cleaned = df.clone();
        cleaned.with_column(Column::new(column.into(), values))?;
        Ok(cleaned)
    }
}

//! Statistics Calculator Module
//! Handles the dashboard's aggregate computations: price metrics, per-group
//! means and histogram binning.

use polars::prelude::*;
use statrs::statistics::Statistics;
use std::collections::BTreeMap;

/// Mean/max/min of the non-missing prices. NaN when there are none.
#[derive(Debug, Clone, Copy)]
pub struct PriceStats {
    pub mean: f64,
    pub max: f64,
    pub min: f64,
}

impl Default for PriceStats {
    fn default() -> Self {
        Self {
            mean: f64::NAN,
            max: f64::NAN,
            min: f64::NAN,
        }
    }
}

/// Key metrics of the filtered table.
#[derive(Debug, Clone)]
pub struct Summary {
    pub count: usize,
    /// Present only when the table has a price column.
    pub price: Option<PriceStats>,
}

/// Mean value for one group.
#[derive(Debug, Clone, PartialEq)]
pub struct GroupMean {
    pub group: String,
    pub mean: f64,
    /// Number of non-missing values behind `mean`
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub struct HistogramBin {
    pub start: f64,
    pub end: f64,
    pub count: usize,
}

impl HistogramBin {
    pub fn center(&self) -> f64 {
        (self.start + self.end) / 2.0
    }

    pub fn width(&self) -> f64 {
        self.end - self.start
    }
}

/// Equal-width bins over the observed range; the last bin includes its upper edge.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Histogram {
    pub bins: Vec<HistogramBin>,
}

impl Histogram {
    pub fn max_count(&self) -> usize {
        self.bins.iter().map(|b| b.count).max().unwrap_or(0)
    }

    pub fn total(&self) -> usize {
        self.bins.iter().map(|b| b.count).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.bins.is_empty()
    }
}

/// Handles statistical calculations.
pub struct StatsCalculator;

impl StatsCalculator {
    /// Finite values of a numeric column, missing cells dropped.
    pub fn numeric_values(df: &DataFrame, column: &str) -> PolarsResult<Vec<f64>> {
        let as_f64 = df.column(column)?.cast(&DataType::Float64)?;
        Ok(as_f64
            .f64()?
            .into_iter()
            .flatten()
            .filter(|v| v.is_finite())
            .collect())
    }

    /// Compute mean/max/min. An empty slice gives NaN for all three.
    pub fn price_stats(values: &[f64]) -> PriceStats {
        PriceStats {
            mean: Statistics::mean(values.iter()),
            max: Statistics::max(values.iter()),
            min: Statistics::min(values.iter()),
        }
    }

    /// Row count plus price metrics when `price_column` exists.
    pub fn summarize(df: &DataFrame, price_column: &str) -> PolarsResult<Summary> {
        let price = if df.column(price_column).is_ok() {
            let values = Self::numeric_values(df, price_column)?;
            Some(Self::price_stats(&values))
        } else {
            None
        };

        Ok(Summary {
            count: df.height(),
            price,
        })
    }

    /// Mean of `value_column` per distinct `group_column` value, sorted by group.
    ///
    /// Rows with a missing group are left out. A group whose values are all
    /// missing still appears, with a NaN mean.
    pub fn group_means(
        df: &DataFrame,
        group_column: &str,
        value_column: &str,
    ) -> PolarsResult<Vec<GroupMean>> {
        let groups = df.column(group_column)?.cast(&DataType::String)?;
        let values = df.column(value_column)?.cast(&DataType::Float64)?;

        let mut by_group: BTreeMap<String, Vec<f64>> = BTreeMap::new();
        for (group, value) in groups.str()?.into_iter().zip(values.f64()?.into_iter()) {
            let Some(group) = group else {
                continue;
            };
            let entry = by_group.entry(group.to_string()).or_default();
            if let Some(v) = value.filter(|v| v.is_finite()) {
                entry.push(v);
            }
        }

        Ok(by_group
            .into_iter()
            .map(|(group, vals)| GroupMean {
                group,
                mean: Statistics::mean(vals.iter()),
                count: vals.len(),
            })
            .collect())
    }

    /// Bin `values` into `bins` equal-width buckets spanning their range.
    pub fn histogram(values: &[f64], bins: usize) -> Histogram {
        if values.is_empty() || bins == 0 {
            return Histogram::default();
        }

        let min = Statistics::min(values.iter());
        let max = Statistics::max(values.iter());
        let (lo, hi) = if min == max {
            (min - 0.5, max + 0.5)
        } else {
            (min, max)
        };
        let width = (hi - lo) / bins as f64;

        let mut counts = vec![0usize; bins];
        for v in values {
            let idx = (((v - lo) / width).floor() as usize).min(bins - 1);
            counts[idx] += 1;
        }

        let bins = counts
            .into_iter()
            .enumerate()
            .map(|(i, count)| HistogramBin {
                start: lo + i as f64 * width,
                end: if i == bins - 1 {
                    hi
                } else {
                    lo + (i + 1) as f64 * width
                },
                count,
            })
            .collect();

        Histogram { bins }
    }
}

/// Format as `$` + whole units with thousands separators, e.g. `$12,346`.
/// Non-finite values render as `$nan`, `$inf` or `$-inf`.
pub fn format_currency(value: f64) -> String {
    if value.is_nan() {
        return "$nan".to_string();
    }
    if value.is_infinite() {
        return if value > 0.0 { "$inf" } else { "$-inf" }.to_string();
    }

    let rounded = format!("{:.0}", value);
    let (sign, digits) = match rounded.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", rounded.as_str()),
    };

    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    format!("${}{}", sign, grouped)
}

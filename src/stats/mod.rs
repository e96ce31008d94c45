//! Stats module - aggregate metrics and binning

mod calculator;

pub use calculator::{
    format_currency, GroupMean, Histogram, HistogramBin, PriceStats, StatsCalculator, Summary,
};

//! Dashboard Configuration Module
//! Column names, labels and export settings, optionally read from a JSON file.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// File looked up in the working directory at startup.
pub const CONFIG_FILE_NAME: &str = "car_sales_dashboard.json";

/// A categorical column offered as a sidebar filter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterSpec {
    pub column: String,
    pub label: String,
}

impl FilterSpec {
    pub fn new(column: &str, label: &str) -> Self {
        Self {
            column: column.to_string(),
            label: label.to_string(),
        }
    }
}

/// Settings for the whole dashboard. Every field falls back to its default.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DashboardConfig {
    pub title: String,
    pub subtitle: String,
    /// Currency-formatted numeric column that gets cleaned on load
    pub price_column: String,
    /// Categorical column used for the per-group mean chart
    pub group_column: String,
    /// Filters in the order they are applied and shown
    pub filters: Vec<FilterSpec>,
    pub histogram_bins: usize,
    pub export_file_name: String,
    pub export_mime: String,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            title: "Car Sales Analytics Dashboard".to_string(),
            subtitle: "Interactive Business Intelligence Dashboard".to_string(),
            price_column: "Price".to_string(),
            group_column: "Make".to_string(),
            filters: vec![
                FilterSpec::new("Colour", "Select Colour"),
                FilterSpec::new("Make", "Select Brand"),
            ],
            histogram_bins: 20,
            export_file_name: "filtered_car_sales.csv".to_string(),
            export_mime: "text/csv".to_string(),
        }
    }
}

impl DashboardConfig {
    /// Parse a configuration from JSON text.
    pub fn from_json(text: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(text).context("parsing dashboard config")?;
        Ok(config.sanitized())
    }

    /// Read a configuration file. A missing file yields the defaults.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading {}", path.display()))?;
        Self::from_json(&text)
    }

    /// Like [`DashboardConfig::load`], but logs failures and keeps the defaults.
    pub fn load_or_default(path: &Path) -> Self {
        match Self::load(path) {
            Ok(config) => config,
            Err(e) => {
                log::warn!("Ignoring config {}: {:#}", path.display(), e);
                Self::default()
            }
        }
    }

    fn sanitized(mut self) -> Self {
        // A histogram always needs at least one bin
        self.histogram_bins = self.histogram_bins.max(1);
        self
    }
}

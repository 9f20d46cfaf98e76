//! Configuration structures for loading, cleaning and reporting.

use serde::{Deserialize, Serialize};

use crate::error::{FakturError, Result};

/// Main configuration for the faktur pipeline.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FakturConfig {
    /// CSV input configuration.
    pub input: InputConfig,

    /// Field parsing configuration.
    pub parsing: ParsingConfig,

    /// Report thresholds.
    pub report: ReportConfig,
}

/// CSV input configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InputConfig {
    /// Field delimiter of the export.
    pub delimiter: char,

    /// Strip surrounding whitespace from header names.
    pub trim_headers: bool,
}

impl Default for InputConfig {
    fn default() -> Self {
        Self {
            delimiter: ',',
            trim_headers: true,
        }
    }
}

impl InputConfig {
    /// Delimiter as a single byte, as the CSV reader expects it.
    pub fn delimiter_byte(&self) -> Result<u8> {
        if self.delimiter.is_ascii() {
            Ok(self.delimiter as u8)
        } else {
            Err(FakturError::Config(format!(
                "delimiter must be a single ASCII character, got {:?}",
                self.delimiter
            )))
        }
    }
}

/// Field parsing configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParsingConfig {
    /// Two-digit years up to this value are read as 20xx, above it as 19xx.
    pub two_digit_year_pivot: i32,
}

impl Default for ParsingConfig {
    fn default() -> Self {
        Self {
            two_digit_year_pivot: crate::rules::dates::DEFAULT_YEAR_PIVOT,
        }
    }
}

/// Thresholds used by the analytic reports.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReportConfig {
    /// Unit price z-score above which a line is flagged.
    pub zscore_threshold: f64,

    /// Discount percent above which a line is flagged.
    pub max_discount_percent: f64,

    /// Tax percent above which a line is flagged.
    pub max_tax_percent: f64,

    /// Flag lines whose recomputed total exceeds price x quantity by this ratio.
    pub total_overrun_ratio: f64,

    /// Number of equal-width bins in the liability age histogram.
    pub liability_age_bins: usize,

    /// Rows shown in reconciliation previews.
    pub preview_rows: usize,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            zscore_threshold: 3.0,
            max_discount_percent: 30.0,
            max_tax_percent: 20.0,
            total_overrun_ratio: 1.5,
            liability_age_bins: 20,
            preview_rows: 5,
        }
    }
}

impl FakturConfig {
    /// Load configuration from a JSON file.
    pub fn from_file(path: &std::path::Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        serde_json::from_str(&content)
            .map_err(|e| FakturError::Config(format!("{}: {}", path.display(), e)))
    }

    /// Save configuration to a JSON file.
    pub fn save(&self, path: &std::path::Path) -> Result<()> {
        let content = serde_json::to_string_pretty(self)
            .map_err(|e| FakturError::Config(e.to_string()))?;
        std::fs::write(path, content)?;
        Ok(())
    }
}

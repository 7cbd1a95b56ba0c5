//! Configuration types for the cleaning pipeline.
//!
//! The only knob that reaches the core stages is `price_fill`; the remaining
//! fields control where (and whether) the cleaned dataset and report land.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Default location of the cleaned CSV.
pub const DEFAULT_OUTPUT_PATH: &str = "data/processed/sales_data_clean.csv";

/// Configuration for the cleaning pipeline.
///
/// Use [`CleaningConfig::builder()`] to create a new configuration
/// with fluent API.
///
/// # Example
///
/// ```rust,ignore
/// use sales_cleaning::config::CleaningConfig;
///
/// let config = CleaningConfig::builder()
///     .price_fill(9.99)
///     .output_path("out/clean.csv")
///     .build()?;
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CleaningConfig {
    /// Explicit value for missing prices.
    /// When None, the median of the observed prices is used.
    /// Default: None
    pub price_fill: Option<f64>,

    /// Path of the cleaned CSV.
    /// Default: "data/processed/sales_data_clean.csv"
    pub output_path: PathBuf,

    /// Whether `Pipeline::run` writes the cleaned CSV to `output_path`.
    /// Default: true
    pub save_to_disk: bool,

    /// Whether a JSON cleaning report is written next to the cleaned CSV.
    /// Default: false
    pub generate_reports: bool,
}

impl Default for CleaningConfig {
    fn default() -> Self {
        Self {
            price_fill: None,
            output_path: PathBuf::from(DEFAULT_OUTPUT_PATH),
            save_to_disk: true,
            generate_reports: false,
        }
    }
}

impl CleaningConfig {
    /// Create a new configuration builder.
    pub fn builder() -> CleaningConfigBuilder {
        CleaningConfigBuilder::default()
    }

    /// Validate the configuration and return errors if invalid.
    pub fn validate(&self) -> Result<(), ConfigValidationError> {
        if let Some(fill) = self.price_fill
            && !fill.is_finite()
        {
            return Err(ConfigValidationError::InvalidPriceFill(fill));
        }

        if self.output_path.as_os_str().is_empty() {
            return Err(ConfigValidationError::EmptyOutputPath);
        }

        Ok(())
    }
}

/// Errors that can occur during configuration validation.
#[derive(Debug, thiserror::Error)]
pub enum ConfigValidationError {
    #[error("Invalid price fill: {0} (must be a finite number)")]
    InvalidPriceFill(f64),

    #[error("Output path must not be empty")]
    EmptyOutputPath,
}

/// Builder for [`CleaningConfig`] with fluent API.
#[derive(Debug, Default)]
pub struct CleaningConfigBuilder {
    price_fill: Option<f64>,
    output_path: Option<PathBuf>,
    save_to_disk: Option<bool>,
    generate_reports: Option<bool>,
}

impl CleaningConfigBuilder {
    /// Use an explicit fill value for missing prices instead of the median.
    pub fn price_fill(mut self, value: f64) -> Self {
        self.price_fill = Some(value);
        self
    }

    /// Set the path of the cleaned CSV.
    pub fn output_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.output_path = Some(path.into());
        self
    }

    /// Enable or disable writing the cleaned CSV.
    ///
    /// When false, results are kept in memory only.
    pub fn save_to_disk(mut self, save: bool) -> Self {
        self.save_to_disk = Some(save);
        self
    }

    /// Enable or disable the JSON cleaning report.
    pub fn generate_reports(mut self, generate: bool) -> Self {
        self.generate_reports = Some(generate);
        self
    }

    /// Build the configuration.
    ///
    /// Returns a validated `CleaningConfig` or an error if validation fails.
    pub fn build(self) -> Result<CleaningConfig, ConfigValidationError> {
        let config = CleaningConfig {
            price_fill: self.price_fill,
            output_path: self
                .output_path
                .unwrap_or_else(|| PathBuf::from(DEFAULT_OUTPUT_PATH)),
            save_to_disk: self.save_to_disk.unwrap_or(true),
            generate_reports: self.generate_reports.unwrap_or(false),
        };

        config.validate()?;
        Ok(config)
    }
}

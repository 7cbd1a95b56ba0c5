//! Sales Data Cleaning Library
//!
//! A small, single-pass cleaning pipeline for raw sales exports, built on Polars.
//!
//! # Overview
//!
//! The pipeline runs four stages in order, each taking a frame and returning
//! a new one:
//!
//! - **Loading**: reads the CSV as text, trims headers, strips stray quotes
//!   and coerces the `PRICE` and `Quantity` columns to numbers
//! - **Normalizing**: lowercases column names, collapses whitespace to `_`
//!   and trims product names and categories
//! - **Imputing**: fills missing prices with the median (or an explicit value)
//!   and missing quantities with `1`
//! - **Filtering**: drops rows with missing or non-positive quantity or price
//!   and rows without a product name
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use sales_cleaning::{CleaningConfig, Pipeline};
//!
//! let config = CleaningConfig::builder()
//!     .output_path("data/processed/sales_data_clean.csv")
//!     .generate_reports(true)
//!     .build()?;
//!
//! let result = Pipeline::builder()
//!     .config(config)
//!     .on_progress(|update| {
//!         println!("[{:.0}%] {}", update.progress * 100.0, update.message);
//!     })
//!     .build()?
//!     .run("data/raw/sales_data_raw.csv")?;
//!
//! println!("{}", result.data.head(Some(5)));
//! ```
//!
//! The stages can also be used on their own:
//!
//! ```rust,ignore
//! use sales_cleaning::{DataLoader, InvalidRowFilter, MissingValueResolver, SchemaNormalizer};
//!
//! let raw = DataLoader::load("data/raw/sales_data_raw.csv")?;
//! let normalized = SchemaNormalizer::normalize(&raw)?;
//! let resolved = MissingValueResolver::new(None).resolve(&normalized)?;
//! let cleaned = InvalidRowFilter::apply(&resolved)?;
//! ```

pub mod cleaner;
pub mod config;
pub mod error;
pub mod imputers;
pub mod loader;
pub mod pipeline;
pub mod reporting;
pub mod schema;
pub mod types;
pub mod utils;

// Re-export main types for convenience
pub use cleaner::{InvalidRowFilter, SchemaNormalizer, normalize_column_name, parse_price, parse_quantity};
pub use config::{CleaningConfig, CleaningConfigBuilder, ConfigValidationError};
pub use error::{CleaningError, Result, ResultExt};
pub use imputers::{MissingValueResolver, StatisticalImputer};
pub use loader::DataLoader;
pub use pipeline::{
    CleaningStage, ClosureProgressReporter, Pipeline, PipelineBuilder, ProgressReporter,
    ProgressUpdate,
};
pub use reporting::{CleaningReport, ReportGenerator};
pub use schema::{ColumnMatcher, ColumnRole, ResolvedSchema, RoleRule, SchemaDescriptor};
pub use types::{
    ActionType, CleaningAction, CleaningSummary, ColumnRename, DropCounts, FillMethod,
    FillOutcome, PipelineResult,
};

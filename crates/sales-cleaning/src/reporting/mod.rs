//! Output writing: the cleaned CSV and an optional JSON report.
//!
//! # Example
//!
//! ```rust,ignore
//! use sales_cleaning::reporting::ReportGenerator;
//!
//! let generator = ReportGenerator::new("data/processed/sales_data_clean.csv");
//! let output = generator.write_dataset(&mut result.data)?;
//! let report = ReportGenerator::build_report("data/raw/sales_data_raw.csv", Some(&output), &result.summary);
//! generator.write_report_to_file(&report, "sales_data_clean")?;
//! ```

mod generator;

pub use generator::{CleaningReport, ReportGenerator};

use crate::error::Result;
use crate::types::CleaningSummary;
use chrono::Local;
use polars::prelude::*;
use serde::{Deserialize, Serialize};
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::info;

/// Report written next to the cleaned dataset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CleaningReport {
    /// Timestamp when the report was generated
    pub generated_at: String,
    /// Path to the input file
    pub input_file: String,
    /// Path to the output file (if written)
    pub output_file: Option<String>,
    pub summary: CleaningSummary,
}

/// Writes the cleaned dataset and its report.
#[derive(Debug, Clone)]
pub struct ReportGenerator {
    output_path: PathBuf,
}

impl ReportGenerator {
    pub fn new(output_path: impl Into<PathBuf>) -> Self {
        Self {
            output_path: output_path.into(),
        }
    }

    pub fn output_path(&self) -> &Path {
        &self.output_path
    }

    /// Directory holding the cleaned CSV and the report.
    pub fn output_dir(&self) -> &Path {
        self.output_path.parent().unwrap_or_else(|| Path::new(""))
    }

    /// Write `df` as CSV with a header row and no index column, creating the
    /// output directory if needed.
    pub fn write_dataset(&self, df: &mut DataFrame) -> Result<PathBuf> {
        fs::create_dir_all(self.output_dir())?;
        let mut file = File::create(&self.output_path)?;

        CsvWriter::new(&mut file)
            .include_header(true)
            .with_separator(b',')
            .finish(df)?;

        info!("Dataset saved: {}", self.output_path.display());
        Ok(self.output_path.clone())
    }

    /// Build a report from a finished run.
    pub fn build_report(
        input_file: &str,
        output_file: Option<&Path>,
        summary: &CleaningSummary,
    ) -> CleaningReport {
        CleaningReport {
            generated_at: Local::now().format("%Y-%m-%d %H:%M:%S").to_string(),
            input_file: input_file.to_string(),
            output_file: output_file.map(|p| p.display().to_string()),
            summary: summary.clone(),
        }
    }

    /// Write `report` as pretty JSON to `<output dir>/<report_base_name>_report.json`.
    pub fn write_report_to_file(
        &self,
        report: &CleaningReport,
        report_base_name: &str,
    ) -> Result<PathBuf> {
        fs::create_dir_all(self.output_dir())?;

        let report_path = self
            .output_dir()
            .join(format!("{}_report.json", report_base_name));
        let mut file = File::create(&report_path)?;
        file.write_all(serde_json::to_string_pretty(report)?.as_bytes())?;

        info!("Report saved: {}", report_path.display());
        Ok(report_path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_write_dataset_creates_directory() {
        let dir = tempdir().unwrap();
        let output = dir.path().join("nested/out/clean.csv");
        let generator = ReportGenerator::new(&output);

        let mut df = df![
            "product_name" => ["Pen", "Cup"],
            "price" => [1.5, 2.0],
        ]
        .unwrap();
        let written = generator.write_dataset(&mut df).unwrap();

        assert_eq!(written, output);
        let content = fs::read_to_string(&output).unwrap();
        let mut lines = content.lines();
        assert_eq!(lines.next(), Some("product_name,price"));
        assert_eq!(lines.next(), Some("Pen,1.5"));
        assert!(lines.next().unwrap().starts_with("Cup,2"));
        assert_eq!(lines.next(), None);
    }

    #[test]
    fn test_write_report_to_file() {
        let dir = tempdir().unwrap();
        let generator = ReportGenerator::new(dir.path().join("clean.csv"));

        let mut summary = CleaningSummary::new();
        summary.rows_before = 5;
        summary.rows_after = 2;
        summary.rows_removed = 3;
        let report = ReportGenerator::build_report("raw.csv", Some(generator.output_path()), &summary);

        let path = generator.write_report_to_file(&report, "clean").unwrap();
        assert_eq!(path, dir.path().join("clean_report.json"));

        let json = fs::read_to_string(&path).unwrap();
        let parsed: CleaningReport = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, report);
        assert_eq!(parsed.summary.rows_removed, 3);
    }

    #[test]
    fn test_build_report_without_output() {
        let report = ReportGenerator::build_report("raw.csv", None, &CleaningSummary::new());
        assert_eq!(report.input_file, "raw.csv");
        assert!(report.output_file.is_none());
        assert!(!report.generated_at.is_empty());
    }

    #[test]
    fn test_output_dir_of_bare_file_name() {
        let generator = ReportGenerator::new("clean.csv");
        assert_eq!(generator.output_dir(), Path::new(""));
    }
}

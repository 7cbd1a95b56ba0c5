//! First stage: reads a CSV resource and coerces the raw monetary and
//! quantity fields.
//!
//! Every cell is read as text, so a malformed value deep in the file can never
//! fail the load. Cells that do not parse become missing.

use crate::cleaner::{
    coerce_column, disambiguate_names, parse_price, parse_quantity, sanitize_text_columns,
};
use crate::error::{CleaningError, Result, ResultExt};
use crate::schema::{ColumnRole, SchemaDescriptor};
use crate::utils::column_names;
use polars::io::csv::read::CsvReadOptions;
use polars::prelude::*;
use std::io::Cursor;
use std::path::Path;
use tracing::{debug, info};

/// Reads raw sales data into a [`DataFrame`].
pub struct DataLoader;

impl DataLoader {
    /// Load a CSV file from disk.
    pub fn load(path: impl AsRef<Path>) -> Result<DataFrame> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(CleaningError::InputNotFound(path.to_path_buf()));
        }

        info!("Loading dataset from {}", path.display());
        let df = Self::read_options()
            .try_into_reader_with_file_path(Some(path.to_path_buf()))
            .context(format!("Failed to open {}", path.display()))?
            .finish()
            .context(format!("Failed to parse {}", path.display()))?;

        Self::prepare(df)
    }

    /// Parse CSV text held in memory. Same semantics as [`load`](Self::load).
    pub fn load_from_str(csv: &str) -> Result<DataFrame> {
        let df = Self::read_options()
            .into_reader_with_file_handle(Cursor::new(csv.to_owned()))
            .finish()
            .context("Failed to parse CSV text")?;

        Self::prepare(df)
    }

    fn read_options() -> CsvReadOptions {
        // Zero inference rows: every column is read as String
        CsvReadOptions::default()
            .with_has_header(true)
            .with_infer_schema_length(Some(0))
    }

    fn prepare(mut df: DataFrame) -> Result<DataFrame> {
        let trimmed: Vec<String> = column_names(&df)
            .iter()
            .map(|name| name.trim().to_string())
            .collect();
        let trimmed = disambiguate_names(trimmed);
        df.set_column_names(trimmed.iter().map(String::as_str))?;

        let mut df = sanitize_text_columns(&df)?;

        let raw = SchemaDescriptor::raw_input().resolve(&trimmed);
        for (role, col_name) in raw.iter() {
            let parse: fn(&str) -> Option<f64> = match role {
                ColumnRole::Price => parse_price,
                ColumnRole::Quantity => parse_quantity,
                _ => continue,
            };
            let series = df.column(col_name)?.as_materialized_series();
            let coerced = coerce_column(series, parse)?;
            df.replace(col_name, coerced)?;
            debug!("Coerced {} column '{}' to numbers", role.display_name(), col_name);
        }

        info!("Loaded {} rows x {} columns", df.height(), df.width());
        Ok(df)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::io::Write;

    fn floats(df: &DataFrame, name: &str) -> Vec<Option<f64>> {
        df.column(name)
            .unwrap()
            .as_materialized_series()
            .f64()
            .unwrap()
            .into_iter()
            .collect()
    }

    #[test]
    fn test_load_coerces_price_and_quantity() {
        let csv = "Product Name, PRICE ,Quantity\nPen,\"$1,234.56\",3\nCup,N/A,x\nMug,,2\n";
        let df = DataLoader::load_from_str(csv).unwrap();

        assert_eq!(column_names(&df), vec!["Product Name", "PRICE", "Quantity"]);
        assert_eq!(floats(&df, "PRICE"), vec![Some(1234.56), None, None]);
        assert_eq!(floats(&df, "Quantity"), vec![Some(3.0), None, Some(2.0)]);
    }

    #[test]
    fn test_load_sanitizes_text_cells() {
        let csv = "Product Name,Category\n  Pen  ,\"\"\"Office\"\"\"\n";
        let df = DataLoader::load_from_str(csv).unwrap();

        let names = df.column("Product Name").unwrap().as_materialized_series().clone();
        assert_eq!(names.str().unwrap().get(0), Some("Pen"));
        let cats = df.column("Category").unwrap().as_materialized_series().clone();
        assert_eq!(cats.str().unwrap().get(0), Some("Office"));
    }

    #[test]
    fn test_lowercase_price_header_is_not_coerced() {
        let csv = "price,qty\n$5,2\n";
        let df = DataLoader::load_from_str(csv).unwrap();
        assert_eq!(df.column("price").unwrap().dtype(), &DataType::String);
        assert_eq!(df.column("qty").unwrap().dtype(), &DataType::String);
    }

    #[test]
    fn test_late_malformed_value_does_not_fail() {
        let mut csv = String::from("PRICE,Quantity\n");
        for _ in 0..500 {
            csv.push_str("10,1\n");
        }
        csv.push_str("ten dollars,one\n");

        let df = DataLoader::load_from_str(&csv).unwrap();
        assert_eq!(df.height(), 501);
        assert_eq!(floats(&df, "PRICE")[500], None);
        assert_eq!(floats(&df, "Quantity")[500], None);
    }

    #[test]
    fn test_header_only() {
        let df = DataLoader::load_from_str("PRICE,Quantity\n").unwrap();
        assert_eq!(df.height(), 0);
        assert_eq!(df.width(), 2);
    }

    #[test]
    fn test_load_missing_file() {
        let err = DataLoader::load("does/not/exist.csv").unwrap_err();
        assert!(matches!(err, CleaningError::InputNotFound(_)));
        assert_eq!(err.error_code(), "INPUT_NOT_FOUND");
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "PRICE,Quantity").unwrap();
        writeln!(file, "$3.50,4").unwrap();
        file.flush().unwrap();

        let df = DataLoader::load(file.path()).unwrap();
        assert_eq!(floats(&df, "PRICE"), vec![Some(3.5)]);
        assert_eq!(floats(&df, "Quantity"), vec![Some(4.0)]);
    }
}

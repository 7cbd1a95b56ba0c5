//! Statistical fill methods for numeric columns.
//!
//! Columns are read through a numeric view and written back as `Float64`.

use crate::error::Result;
use crate::types::{FillMethod, FillOutcome};
use crate::utils::{fill_numeric_nulls, median, missing_count, numeric_values};
use polars::prelude::*;
use tracing::{debug, warn};

/// Statistical imputation methods for filling missing values.
pub struct StatisticalImputer;

impl StatisticalImputer {
    /// Fill missing entries with the median of the present values.
    ///
    /// When every entry is missing the median is undefined; the column is left
    /// untouched and the outcome carries no fill value.
    pub fn apply_numeric_median(df: &mut DataFrame, col_name: &str) -> Result<FillOutcome> {
        let values = numeric_values(df.column(col_name)?.as_materialized_series())?;
        match median(&values) {
            Some(median_val) => {
                Self::fill_with_value(df, col_name, &values, median_val, FillMethod::Median)
            }
            None => {
                warn!(
                    "Column '{}' has no values to take a median from; leaving {} entries missing",
                    col_name,
                    values.len()
                );
                Ok(FillOutcome {
                    column: col_name.to_string(),
                    method: FillMethod::Median,
                    fill_value: None,
                    filled: 0,
                })
            }
        }
    }

    /// Fill missing entries with a caller-supplied value.
    pub fn apply_explicit_value(
        df: &mut DataFrame,
        col_name: &str,
        value: f64,
    ) -> Result<FillOutcome> {
        let values = numeric_values(df.column(col_name)?.as_materialized_series())?;
        Self::fill_with_value(df, col_name, &values, value, FillMethod::Explicit)
    }

    /// Fill missing entries with a fixed constant.
    pub fn apply_constant_imputation(
        df: &mut DataFrame,
        col_name: &str,
        value: f64,
    ) -> Result<FillOutcome> {
        let values = numeric_values(df.column(col_name)?.as_materialized_series())?;
        Self::fill_with_value(df, col_name, &values, value, FillMethod::Constant)
    }

    fn fill_with_value(
        df: &mut DataFrame,
        col_name: &str,
        values: &[Option<f64>],
        fill_value: f64,
        method: FillMethod,
    ) -> Result<FillOutcome> {
        let filled = missing_count(values);
        df.replace(col_name, fill_numeric_nulls(col_name, values, fill_value))?;

        debug!(
            "Filled {} entries in '{}' with {:?}: {:.2}",
            filled, col_name, method, fill_value
        );

        Ok(FillOutcome {
            column: col_name.to_string(),
            method,
            fill_value: Some(fill_value),
            filled,
        })
    }
}

//! Shared utilities for the cleaning pipeline.
//!
//! Helpers here read columns through a uniform lens: a numeric view where
//! unparseable text and NaN count as missing, and a text view where every
//! present cell is rendered as a string.

use crate::cleaner::parse_price;
use polars::prelude::*;

// =============================================================================
// Frame Utilities
// =============================================================================

/// Column names of a frame, in column order.
pub fn column_names(df: &DataFrame) -> Vec<String> {
    df.get_column_names()
        .into_iter()
        .map(|s| s.to_string())
        .collect()
}

// =============================================================================
// Column Views
// =============================================================================

/// Read a series as numbers. Text that does not parse and NaN become `None`.
pub fn numeric_values(series: &Series) -> PolarsResult<Vec<Option<f64>>> {
    let as_float = series.cast(&DataType::Float64)?;
    let values = as_float
        .f64()?
        .into_iter()
        .map(|v| v.filter(|x| !x.is_nan()))
        .collect();
    Ok(values)
}

/// Read a price series as numbers. Text cells go through [`parse_price`], so
/// money text like `$1,234.56` keeps its value; other dtypes use the numeric view.
pub fn price_values(series: &Series) -> PolarsResult<Vec<Option<f64>>> {
    if series.dtype() != &DataType::String {
        return numeric_values(series);
    }
    Ok(series.str()?.into_iter().map(|v| v.and_then(parse_price)).collect())
}

/// Read a series as text. Missing cells stay `None`.
pub fn text_values(series: &Series) -> PolarsResult<Vec<Option<String>>> {
    let as_text = series.cast(&DataType::String)?;
    let values = as_text
        .str()?
        .into_iter()
        .map(|v| v.map(str::to_string))
        .collect();
    Ok(values)
}

/// Count of missing entries in a numeric view.
pub fn missing_count(values: &[Option<f64>]) -> usize {
    values.iter().filter(|v| v.is_none()).count()
}

/// Median of the present values, `None` when every value is missing.
pub fn median(values: &[Option<f64>]) -> Option<f64> {
    Series::new(PlSmallStr::EMPTY, values).median()
}

// =============================================================================
// Series Transformation Utilities
// =============================================================================

/// Build a Float64 series from a numeric view, replacing missing entries.
pub fn fill_numeric_nulls(name: &str, values: &[Option<f64>], fill_value: f64) -> Series {
    let filled: Vec<f64> = values.iter().map(|v| v.unwrap_or(fill_value)).collect();
    Series::new(name.into(), filled)
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_column_names_preserve_order() {
        let df = df![
            "b" => [1.0],
            "a" => [2.0],
        ]
        .unwrap();
        assert_eq!(column_names(&df), vec!["b".to_string(), "a".to_string()]);
    }

    #[test]
    fn test_numeric_values_from_text() {
        let series = Series::new("price".into(), &[Some("12.5"), Some("abc"), None]);
        let values = numeric_values(&series).unwrap();
        assert_eq!(values, vec![Some(12.5), None, None]);
    }

    #[test]
    fn test_numeric_values_treats_nan_as_missing() {
        let series = Series::new("price".into(), &[Some(1.0), Some(f64::NAN)]);
        let values = numeric_values(&series).unwrap();
        assert_eq!(values, vec![Some(1.0), None]);
    }

    #[test]
    fn test_price_values_parses_money_text() {
        let series = Series::new(
            "unit_price".into(),
            &[Some("$70"), Some("1,234.50"), Some("n/a"), None],
        );
        let values = price_values(&series).unwrap();
        assert_eq!(values, vec![Some(70.0), Some(1234.5), None, None]);
    }

    #[test]
    fn test_price_values_from_floats() {
        let series = Series::new("price".into(), &[Some(2.5), None]);
        assert_eq!(price_values(&series).unwrap(), vec![Some(2.5), None]);
    }

    #[test]
    fn test_text_values_from_numbers() {
        let series = Series::new("id".into(), &[Some(7i64), None]);
        let values = text_values(&series).unwrap();
        assert_eq!(values, vec![Some("7".to_string()), None]);
    }

    #[test]
    fn test_median_even_and_odd() {
        assert_eq!(median(&[Some(10.0), None, Some(30.0)]), Some(20.0));
        assert_eq!(median(&[Some(3.0), Some(1.0), Some(2.0)]), Some(2.0));
    }

    #[test]
    fn test_median_all_missing() {
        assert_eq!(median(&[None, None]), None);
        assert_eq!(median(&[]), None);
    }

    #[test]
    fn test_fill_numeric_nulls() {
        let filled = fill_numeric_nulls("test", &[Some(1.0), None, Some(3.0)], 0.0);

        assert_eq!(filled.null_count(), 0);
        assert_eq!(filled.get(0).unwrap().try_extract::<f64>().unwrap(), 1.0);
        assert_eq!(filled.get(1).unwrap().try_extract::<f64>().unwrap(), 0.0);
        assert_eq!(filled.get(2).unwrap().try_extract::<f64>().unwrap(), 3.0);
    }

    #[test]
    fn test_missing_count() {
        assert_eq!(missing_count(&[Some(1.0), None, None]), 2);
    }
}

//! Per-cell numeric coercion for raw price and quantity columns.

use crate::error::Result;
use polars::prelude::*;
use tracing::debug;

/// Keep only digits, `.` and `-`. Currency symbols, thousands separators and
/// stray letters are dropped.
pub(crate) fn clean_price_string(s: &str) -> String {
    s.chars()
        .filter(|c| c.is_ascii_digit() || *c == '.' || *c == '-')
        .collect()
}

/// Parse a monetary cell. Empty text and anything that does not survive
/// [`clean_price_string`] as a decimal number is missing.
pub fn parse_price(raw: &str) -> Option<f64> {
    if raw.is_empty() {
        return None;
    }
    let cleaned = clean_price_string(raw);
    if cleaned.is_empty() {
        return None;
    }
    cleaned.parse::<f64>().ok().filter(|v| !v.is_nan())
}

/// Parse a quantity cell as a plain number.
pub fn parse_quantity(raw: &str) -> Option<f64> {
    raw.trim().parse::<f64>().ok().filter(|v| !v.is_nan())
}

/// Apply `parse` to every present cell of a `String` column, producing a
/// `Float64` series. Non-string columns are cast to `Float64` instead.
pub(crate) fn coerce_column(series: &Series, parse: fn(&str) -> Option<f64>) -> Result<Series> {
    if series.dtype() != &DataType::String {
        return Ok(series.cast(&DataType::Float64)?);
    }

    let str_series = series.str()?;
    let mut coerced_to_missing = 0usize;
    let values: Vec<Option<f64>> = str_series
        .into_iter()
        .map(|opt_val| {
            let val = opt_val?;
            let parsed = parse(val);
            if parsed.is_none() {
                coerced_to_missing += 1;
            }
            parsed
        })
        .collect();

    if coerced_to_missing > 0 {
        debug!(
            "{} cells in '{}' could not be parsed and are now missing",
            coerced_to_missing,
            series.name()
        );
    }

    Ok(Series::new(series.name().clone(), values))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clean_price_string() {
        assert_eq!(clean_price_string("$1,234.56"), "1234.56");
        assert_eq!(clean_price_string("USD -12"), "-12");
        assert_eq!(clean_price_string("abc"), "");
    }

    #[test]
    fn test_parse_price_currency() {
        assert_eq!(parse_price("$1,234.56"), Some(1234.56));
        assert_eq!(parse_price("19.99"), Some(19.99));
        assert_eq!(parse_price("-5"), Some(-5.0));
    }

    #[test]
    fn test_parse_price_missing() {
        assert_eq!(parse_price(""), None);
        assert_eq!(parse_price("N/A"), None);
        assert_eq!(parse_price("-"), None);
        assert_eq!(parse_price("1.2.3"), None);
    }

    #[test]
    fn test_parse_quantity() {
        assert_eq!(parse_quantity("3"), Some(3.0));
        assert_eq!(parse_quantity(" 2.5 "), Some(2.5));
        assert_eq!(parse_quantity("0"), Some(0.0));
        assert_eq!(parse_quantity("three"), None);
        assert_eq!(parse_quantity(""), None);
        assert_eq!(parse_quantity("NaN"), None);
    }

    #[test]
    fn test_coerce_column_text() {
        let series = Series::new("PRICE".into(), &[Some("$10"), Some("bad"), None]);
        let coerced = coerce_column(&series, parse_price).unwrap();

        assert_eq!(coerced.dtype(), &DataType::Float64);
        assert_eq!(coerced.name().as_str(), "PRICE");
        let values: Vec<Option<f64>> = coerced.f64().unwrap().into_iter().collect();
        assert_eq!(values, vec![Some(10.0), None, None]);
    }

    #[test]
    fn test_coerce_column_numeric_passthrough() {
        let series = Series::new("Quantity".into(), &[1i64, 2, 3]);
        let coerced = coerce_column(&series, parse_quantity).unwrap();
        assert_eq!(coerced.dtype(), &DataType::Float64);
        assert_eq!(coerced.null_count(), 0);
    }
}

//! Cell sanitization for textual columns.

use crate::error::Result;
use crate::utils::column_names;
use polars::prelude::*;
use tracing::debug;

/// Trim surrounding whitespace, then drop one double quote from each end.
///
/// Only a single layer is removed: `"\"\"Widget\"\""` becomes `"\"Widget\""`.
/// Whitespace exposed by removing the quotes is kept.
pub(crate) fn sanitize_text_cell(value: &str) -> &str {
    let trimmed = value.trim();
    let trimmed = trimmed.strip_prefix('"').unwrap_or(trimmed);
    trimmed.strip_suffix('"').unwrap_or(trimmed)
}

/// Sanitize every cell of every `String` column. Missing cells stay missing.
pub(crate) fn sanitize_text_columns(df: &DataFrame) -> Result<DataFrame> {
    let mut df = df.clone();

    for col_name in &column_names(&df) {
        let series = df.column(col_name)?.as_materialized_series();
        if series.dtype() != &DataType::String {
            continue;
        }

        let mut changed = 0usize;
        let cleaned: Vec<Option<String>> = series
            .str()?
            .into_iter()
            .map(|opt_val| {
                opt_val.map(|val| {
                    let cleaned = sanitize_text_cell(val);
                    if cleaned.len() != val.len() {
                        changed += 1;
                    }
                    cleaned.to_string()
                })
            })
            .collect();

        if changed > 0 {
            debug!("Sanitized {} cells in '{}'", changed, col_name);
        }
        df.replace(col_name, Series::new(col_name.as_str().into(), cleaned))?;
    }

    Ok(df)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sanitize_trims_whitespace() {
        assert_eq!(sanitize_text_cell("  Widget \t"), "Widget");
    }

    #[test]
    fn test_sanitize_strips_one_quote_layer() {
        assert_eq!(sanitize_text_cell("\"Widget\""), "Widget");
        assert_eq!(sanitize_text_cell("\"\"Widget\"\""), "\"Widget\"");
        assert_eq!(sanitize_text_cell("  \"Widget\"  "), "Widget");
    }

    #[test]
    fn test_sanitize_unbalanced_quote() {
        assert_eq!(sanitize_text_cell("\"Widget"), "Widget");
        assert_eq!(sanitize_text_cell("Widget\""), "Widget");
        assert_eq!(sanitize_text_cell("\""), "");
    }

    #[test]
    fn test_sanitize_keeps_inner_whitespace() {
        assert_eq!(sanitize_text_cell("\" Blue Mug \""), " Blue Mug ");
    }

    #[test]
    fn test_sanitize_text_columns_skips_numeric_and_nulls() {
        let df = df![
            "name" => [Some(" \"Pen\" "), None, Some("Cup")],
            "amount" => [1.0, 2.0, 3.0],
        ]
        .unwrap();

        let cleaned = sanitize_text_columns(&df).unwrap();
        let names = cleaned.column("name").unwrap().as_materialized_series().clone();
        let names = names.str().unwrap();
        assert_eq!(names.get(0), Some("Pen"));
        assert_eq!(names.get(1), None);
        assert_eq!(names.get(2), Some("Cup"));
        assert_eq!(cleaned.column("amount").unwrap().dtype(), &DataType::Float64);

        // Input frame is untouched
        let original = df.column("name").unwrap().as_materialized_series().clone();
        assert_eq!(original.str().unwrap().get(0), Some(" \"Pen\" "));
    }
}

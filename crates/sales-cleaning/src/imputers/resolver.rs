//! Third stage: fills missing price and quantity values.

use super::StatisticalImputer;
use crate::cleaner::{coerce_column, parse_price};
use crate::error::Result;
use crate::schema::{ColumnRole, SchemaDescriptor};
use crate::types::FillOutcome;
use crate::utils::column_names;
use polars::prelude::*;
use tracing::info;

/// Quantity assumed for a sale with no recorded quantity.
pub const DEFAULT_QUANTITY: f64 = 1.0;

/// Fills the price field (median or explicit value) and the quantity field
/// (constant `1`). Absent fields are skipped.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct MissingValueResolver {
    price_fill: Option<f64>,
}

impl MissingValueResolver {
    pub fn new(price_fill: Option<f64>) -> Self {
        Self { price_fill }
    }

    pub fn price_fill(&self) -> Option<f64> {
        self.price_fill
    }

    pub fn resolve(&self, df: &DataFrame) -> Result<DataFrame> {
        self.resolve_with_outcomes(df).map(|(df, _)| df)
    }

    /// Like [`resolve`](Self::resolve), also reporting what was filled per column.
    pub fn resolve_with_outcomes(&self, df: &DataFrame) -> Result<(DataFrame, Vec<FillOutcome>)> {
        let schema = SchemaDescriptor::imputation().resolve(column_names(df));
        let mut df = df.clone();
        let mut outcomes = Vec::new();

        if let Some(price_col) = schema.column(ColumnRole::Price) {
            // Money text must keep its value, not count as missing
            let series = df.column(price_col)?.as_materialized_series();
            let coerced = coerce_column(series, parse_price)?;
            df.replace(price_col, coerced)?;

            let outcome = match self.price_fill {
                Some(value) => StatisticalImputer::apply_explicit_value(&mut df, price_col, value)?,
                None => StatisticalImputer::apply_numeric_median(&mut df, price_col)?,
            };
            outcomes.push(outcome);
        }

        if let Some(qty_col) = schema.column(ColumnRole::Quantity) {
            outcomes.push(StatisticalImputer::apply_constant_imputation(
                &mut df,
                qty_col,
                DEFAULT_QUANTITY,
            )?);
        }

        let filled: usize = outcomes.iter().map(|o| o.filled).sum();
        info!("Filled {} missing values across {} columns", filled, outcomes.len());

        Ok((df, outcomes))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::FillMethod;
    use pretty_assertions::assert_eq;

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
    fn test_price_median_fill() {
        let df = df!["price" => [Some(10.0), None, Some(30.0)]].unwrap();
        let resolved = MissingValueResolver::new(None).resolve(&df).unwrap();
        assert_eq!(floats(&resolved, "price"), vec![Some(10.0), Some(20.0), Some(30.0)]);
    }

    #[test]
    fn test_price_explicit_fill() {
        let df = df!["price" => [Some(10.0), None, Some(30.0)]].unwrap();
        let (resolved, outcomes) = MissingValueResolver::new(Some(0.0))
            .resolve_with_outcomes(&df)
            .unwrap();
        assert_eq!(floats(&resolved, "price"), vec![Some(10.0), Some(0.0), Some(30.0)]);
        assert_eq!(outcomes[0].method, FillMethod::Explicit);
    }

    #[test]
    fn test_price_field_is_first_substring_match() {
        let df = df![
            "unit_price" => [None, Some(4.0)],
            "price_total" => [None, Some(8.0)],
        ]
        .unwrap();

        let resolved = MissingValueResolver::new(None).resolve(&df).unwrap();
        assert_eq!(floats(&resolved, "unit_price"), vec![Some(4.0), Some(4.0)]);
        assert_eq!(floats(&resolved, "price_total"), vec![None, Some(8.0)]);
    }

    #[test]
    fn test_money_text_price_keeps_present_values() {
        let df = df!["unit_price" => [Some("5"), Some("$70"), None, Some("9")]].unwrap();
        let (resolved, outcomes) = MissingValueResolver::new(None)
            .resolve_with_outcomes(&df)
            .unwrap();
        assert_eq!(
            floats(&resolved, "unit_price"),
            vec![Some(5.0), Some(70.0), Some(9.0), Some(9.0)]
        );
        assert_eq!(outcomes[0].fill_value, Some(9.0));
        assert_eq!(outcomes[0].filled, 1);
    }

    #[test]
    fn test_all_money_text_price_has_a_median() {
        let df = df!["price" => ["$5.00", "$7.00", "$9.00"]].unwrap();
        let (resolved, outcomes) = MissingValueResolver::new(None)
            .resolve_with_outcomes(&df)
            .unwrap();
        assert_eq!(floats(&resolved, "price"), vec![Some(5.0), Some(7.0), Some(9.0)]);
        assert_eq!(outcomes[0].fill_value, Some(7.0));
        assert_eq!(outcomes[0].filled, 0);
    }

    #[test]
    fn test_quantity_default_fill() {
        let df = df!["quantity" => [None, Some(5.0)]].unwrap();
        let (resolved, outcomes) = MissingValueResolver::new(None)
            .resolve_with_outcomes(&df)
            .unwrap();
        assert_eq!(floats(&resolved, "quantity"), vec![Some(1.0), Some(5.0)]);
        assert_eq!(
            outcomes,
            vec![FillOutcome {
                column: "quantity".to_string(),
                method: FillMethod::Constant,
                fill_value: Some(1.0),
                filled: 1,
            }]
        );
    }

    #[test]
    fn test_qty_column_is_filled() {
        let df = df!["qty" => [None, Some(2.0)]].unwrap();
        let resolved = MissingValueResolver::new(None).resolve(&df).unwrap();
        assert_eq!(floats(&resolved, "qty"), vec![Some(1.0), Some(2.0)]);
    }

    #[test]
    fn test_substring_quantity_column_is_not_filled() {
        let df = df!["quantity_sold" => [None, Some(2.0)]].unwrap();
        let (resolved, outcomes) = MissingValueResolver::new(None)
            .resolve_with_outcomes(&df)
            .unwrap();
        assert!(outcomes.is_empty());
        assert_eq!(floats(&resolved, "quantity_sold"), vec![None, Some(2.0)]);
    }

    #[test]
    fn test_all_missing_price_without_fill_is_noop() {
        let df = df!["price" => [None::<f64>, None, None]].unwrap();
        let (resolved, outcomes) = MissingValueResolver::new(None)
            .resolve_with_outcomes(&df)
            .unwrap();
        assert_eq!(resolved.column("price").unwrap().null_count(), 3);
        assert_eq!(outcomes[0].fill_value, None);
    }

    #[test]
    fn test_other_columns_untouched() {
        let df = df![
            "region" => [Some("north"), None],
            "discount" => [None, Some(0.1)],
        ]
        .unwrap();
        let resolved = MissingValueResolver::new(Some(3.0)).resolve(&df).unwrap();
        assert!(resolved.equals_missing(&df));
    }
}

//! Final stage: removes rows that fail basic sanity constraints.

use crate::error::Result;
use crate::schema::{ColumnRole, SchemaDescriptor};
use crate::types::DropCounts;
use crate::utils::{column_names, numeric_values, price_values, text_values};
use polars::prelude::*;
use tracing::{debug, info};

/// Why a row was dropped. Checks run in declaration order and the first
/// failure wins.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DropReason {
    QuantityMissing,
    QuantityNonPositive,
    PriceMissing,
    PriceNonPositive,
    ProductNameEmpty,
}

impl DropCounts {
    fn record(&mut self, reason: DropReason) {
        match reason {
            DropReason::QuantityMissing => self.quantity_missing += 1,
            DropReason::QuantityNonPositive => self.quantity_non_positive += 1,
            DropReason::PriceMissing => self.price_missing += 1,
            DropReason::PriceNonPositive => self.price_non_positive += 1,
            DropReason::ProductNameEmpty => self.product_name_empty += 1,
        }
    }
}

fn check_positive(
    value: Option<f64>,
    missing: DropReason,
    non_positive: DropReason,
) -> Option<DropReason> {
    match value {
        None => Some(missing),
        Some(v) if v <= 0.0 => Some(non_positive),
        Some(_) => None,
    }
}

/// Drops rows with missing or non-positive quantity or price, and rows with
/// an empty product name. Absent columns skip their checks.
pub struct InvalidRowFilter;

impl InvalidRowFilter {
    pub fn apply(df: &DataFrame) -> Result<DataFrame> {
        Self::apply_with_counts(df).map(|(df, _)| df)
    }

    /// Like [`apply`](Self::apply), also reporting why rows were dropped.
    pub fn apply_with_counts(df: &DataFrame) -> Result<(DataFrame, DropCounts)> {
        let schema = SchemaDescriptor::validation().resolve(column_names(df));
        let height = df.height();

        let quantities = match schema.column(ColumnRole::Quantity) {
            Some(name) => Some(numeric_values(df.column(name)?.as_materialized_series())?),
            None => None,
        };
        let prices = match schema.column(ColumnRole::Price) {
            Some(name) => Some(price_values(df.column(name)?.as_materialized_series())?),
            None => None,
        };
        let product_names = match schema.column(ColumnRole::ProductName) {
            Some(name) => Some(text_values(df.column(name)?.as_materialized_series())?),
            None => None,
        };

        let mut counts = DropCounts::default();
        let mut keep = Vec::with_capacity(height);

        for row in 0..height {
            let reason = quantities
                .as_ref()
                .and_then(|q| {
                    check_positive(
                        q[row],
                        DropReason::QuantityMissing,
                        DropReason::QuantityNonPositive,
                    )
                })
                .or_else(|| {
                    prices.as_ref().and_then(|p| {
                        check_positive(
                            p[row],
                            DropReason::PriceMissing,
                            DropReason::PriceNonPositive,
                        )
                    })
                })
                .or_else(|| {
                    product_names.as_ref().and_then(|names| match &names[row] {
                        Some(name) if !name.trim().is_empty() => None,
                        _ => Some(DropReason::ProductNameEmpty),
                    })
                });

            match reason {
                Some(reason) => {
                    counts.record(reason);
                    keep.push(false);
                }
                None => keep.push(true),
            }
        }

        let dropped = counts.total();
        if dropped == 0 {
            debug!("No invalid rows found");
            return Ok((df.clone(), counts));
        }

        let mask = BooleanChunked::new("keep".into(), &keep);
        let filtered = df.filter(&mask)?;
        info!(
            "Removed {} invalid rows ({} remaining): {:?}",
            dropped,
            filtered.height(),
            counts
        );

        Ok((filtered, counts))
    }
}

//! Column-name standardization and text-field trimming.

use crate::error::Result;
use crate::schema::SchemaDescriptor;
use crate::types::ColumnRename;
use crate::utils::{column_names, text_values};
use once_cell::sync::Lazy;
use polars::prelude::*;
use regex::Regex;
use std::collections::HashSet;
use tracing::{debug, info, warn};

static WHITESPACE_RUN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\s+").expect("Invalid regex: whitespace run"));

/// Trim, lowercase, and replace each run of whitespace with `_`.
pub fn normalize_column_name(name: &str) -> String {
    let lowered = name.trim().to_lowercase();
    WHITESPACE_RUN.replace_all(&lowered, "_").into_owned()
}

/// Make names unique by suffixing repeats with `_duplicated_<n>`.
pub(crate) fn disambiguate_names(names: Vec<String>) -> Vec<String> {
    let mut seen: HashSet<String> = HashSet::with_capacity(names.len());
    let mut result = Vec::with_capacity(names.len());

    for name in names {
        if seen.insert(name.clone()) {
            result.push(name);
            continue;
        }
        let mut n = 0usize;
        let unique = loop {
            let candidate = format!("{}_duplicated_{}", name, n);
            if !seen.contains(&candidate) {
                break candidate;
            }
            n += 1;
        };
        warn!("Column '{}' appears more than once; renamed to '{}'", name, unique);
        seen.insert(unique.clone());
        result.push(unique);
    }

    result
}

/// Second stage: standardizes column names and trims the text fields.
pub struct SchemaNormalizer;

impl SchemaNormalizer {
    /// Normalize column names and trim `product_name` / `category` cells.
    pub fn normalize(df: &DataFrame) -> Result<DataFrame> {
        Self::normalize_with_renames(df).map(|(df, _)| df)
    }

    /// Like [`normalize`](Self::normalize), also reporting which columns were renamed.
    pub fn normalize_with_renames(df: &DataFrame) -> Result<(DataFrame, Vec<ColumnRename>)> {
        info!("Normalizing schema of {} columns...", df.width());

        let original = column_names(df);
        let normalized: Vec<String> = original.iter().map(|n| normalize_column_name(n)).collect();
        let normalized = disambiguate_names(normalized);

        let renames: Vec<ColumnRename> = original
            .iter()
            .zip(&normalized)
            .filter(|(from, to)| from != to)
            .map(|(from, to)| ColumnRename {
                from: from.clone(),
                to: to.clone(),
            })
            .collect();

        let mut df = df.clone();
        if !renames.is_empty() {
            df.set_column_names(normalized.iter().map(String::as_str))?;
            debug!("Renamed {} columns", renames.len());
        }

        let text_fields = SchemaDescriptor::text_fields().resolve(&normalized);
        for (role, col_name) in text_fields.iter() {
            let series = df.column(col_name)?.as_materialized_series();
            let trimmed: Vec<Option<String>> = text_values(series)?
                .into_iter()
                .map(|v| v.map(|s| s.trim().to_string()))
                .collect();
            df.replace(col_name, Series::new(col_name.into(), trimmed))?;
            debug!("Trimmed {} column '{}'", role.display_name(), col_name);
        }

        Ok((df, renames))
    }
}

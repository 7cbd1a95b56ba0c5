//! Schema normalization, cell sanitization and row filtering.
//!
//! This module provides:
//! - Text sanitization and numeric coercion used by the loader
//! - [`SchemaNormalizer`] for column names and text fields
//! - [`InvalidRowFilter`] for the final sanity pass

mod converters;
mod normalizer;
mod row_filter;
mod sanitizers;

pub use converters::{parse_price, parse_quantity};
pub use normalizer::{SchemaNormalizer, normalize_column_name};
pub use row_filter::InvalidRowFilter;

pub(crate) use converters::coerce_column;
pub(crate) use normalizer::disambiguate_names;
pub(crate) use sanitizers::sanitize_text_columns;

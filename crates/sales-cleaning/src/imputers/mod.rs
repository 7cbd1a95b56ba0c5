//! Missing-value handling.
//!
//! - [`StatisticalImputer`]: median, explicit and constant fills for one column
//! - [`MissingValueResolver`]: the pipeline stage choosing which columns get which fill

mod resolver;
mod statistical;

pub use resolver::{DEFAULT_QUANTITY, MissingValueResolver};
pub use statistical::StatisticalImputer;

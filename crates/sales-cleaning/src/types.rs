use polars::prelude::DataFrame;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Row count above which removed rows trigger a summary warning (percent).
pub const ROWS_REMOVED_WARNING_PCT: f32 = 30.0;

/// Output of a pipeline run.
#[derive(Debug, Clone)]
pub struct PipelineResult {
    /// The cleaned dataset.
    pub data: DataFrame,
    /// What each stage did.
    pub summary: CleaningSummary,
    /// Path of the cleaned CSV, when it was written.
    pub output_file: Option<PathBuf>,
    /// Path of the JSON report, when it was written.
    pub report_file: Option<PathBuf>,
}

// ============================================================================
// Cleaning Summary Types
// ============================================================================

/// Human-readable summary of what the pipeline did.
///
/// # Example
///
/// ```rust,ignore
/// let summary = result.summary;
/// println!("Kept {} of {} rows in {}ms", summary.rows_after, summary.rows_before, summary.duration_ms);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CleaningSummary {
    /// Total execution time in milliseconds.
    pub duration_ms: u64,

    /// Number of rows entering the normalizer.
    pub rows_before: usize,
    /// Number of rows leaving the filter.
    pub rows_after: usize,
    /// Number of rows removed by the filter.
    pub rows_removed: usize,

    /// Number of columns. The pipeline never adds or drops columns.
    pub columns: usize,

    /// Columns whose name changed during normalization.
    pub renamed_columns: Vec<ColumnRename>,

    /// One entry per column the resolver looked at.
    pub fill_outcomes: Vec<FillOutcome>,

    /// Why rows were dropped.
    pub drop_counts: DropCounts,

    /// List of actions taken during cleaning.
    pub actions: Vec<CleaningAction>,

    /// Warnings and notes generated during cleaning.
    pub warnings: Vec<String>,
}

impl CleaningSummary {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_action(&mut self, action: CleaningAction) {
        self.actions.push(action);
    }

    pub fn add_warning(&mut self, warning: impl Into<String>) {
        self.warnings.push(warning.into());
    }

    /// Calculate the percentage of rows removed.
    pub fn rows_removed_percentage(&self) -> f32 {
        if self.rows_before == 0 {
            0.0
        } else {
            (self.rows_removed as f32 / self.rows_before as f32) * 100.0
        }
    }

    /// Total number of cells the resolver filled.
    pub fn values_filled(&self) -> usize {
        self.fill_outcomes.iter().map(|o| o.filled).sum()
    }
}

/// A single action taken during cleaning.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CleaningAction {
    /// Type of action performed.
    pub action_type: ActionType,
    /// Target of the action (column name or "dataset").
    pub target: String,
    /// Human-readable description of the action.
    pub description: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl CleaningAction {
    pub fn new(
        action_type: ActionType,
        target: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        Self {
            action_type,
            target: target.into(),
            description: description.into(),
            details: None,
        }
    }

    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }
}

/// Types of actions the pipeline records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionType {
    /// A column was renamed.
    ColumnRenamed,
    /// Text cells were trimmed.
    ValueCleaned,
    /// Missing values were filled.
    ValueImputed,
    /// One or more rows were removed.
    RowsRemoved,
}

impl ActionType {
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::ColumnRenamed => "Column Renamed",
            Self::ValueCleaned => "Value Cleaned",
            Self::ValueImputed => "Value Imputed",
            Self::RowsRemoved => "Rows Removed",
        }
    }
}

/// A column name before and after normalization.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnRename {
    pub from: String,
    pub to: String,
}

/// How a missing value was filled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FillMethod {
    /// Median of the present values.
    Median,
    /// Value supplied by the caller.
    Explicit,
    /// Fixed constant.
    Constant,
}

/// What the resolver did to one column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FillOutcome {
    pub column: String,
    pub method: FillMethod,
    /// Value written into missing cells; `None` when no value could be derived.
    pub fill_value: Option<f64>,
    /// Number of cells filled.
    pub filled: usize,
}

/// Rows dropped by the invalid-row filter, attributed to the first check
/// each row failed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DropCounts {
    pub quantity_missing: usize,
    pub quantity_non_positive: usize,
    pub price_missing: usize,
    pub price_non_positive: usize,
    pub product_name_empty: usize,
}

impl DropCounts {
    pub fn total(&self) -> usize {
        self.quantity_missing
            + self.quantity_non_positive
            + self.price_missing
            + self.price_non_positive
            + self.product_name_empty
    }
}

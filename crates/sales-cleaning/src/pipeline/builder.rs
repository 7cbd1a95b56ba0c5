//! Main cleaning pipeline module.
//!
//! This module provides the `Pipeline` struct and builder that chain the
//! loader, normalizer, resolver and filter.

use crate::cleaner::{InvalidRowFilter, SchemaNormalizer};
use crate::config::{CleaningConfig, ConfigValidationError};
use crate::error::{Result, ResultExt};
use crate::imputers::MissingValueResolver;
use crate::loader::DataLoader;
use crate::pipeline::progress::{
    CleaningStage, ClosureProgressReporter, ProgressReporter, ProgressUpdate,
};
use crate::reporting::ReportGenerator;
use crate::schema::SchemaDescriptor;
use crate::types::{
    ActionType, CleaningAction, CleaningSummary, PipelineResult, ROWS_REMOVED_WARNING_PCT,
};
use crate::utils::column_names;
use polars::prelude::*;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, error, info, warn};

/// Report file stem used when the output path has no usable file name.
const DEFAULT_REPORT_STEM: &str = "sales_data_clean";

/// The sales data cleaning pipeline.
///
/// Use [`Pipeline::builder()`] to create a new pipeline with custom configuration.
///
/// # Example
///
/// ```rust,ignore
/// use sales_cleaning::{CleaningConfig, Pipeline};
///
/// // Load, clean and write in one call
/// let result = Pipeline::builder()
///     .config(CleaningConfig::builder().price_fill(0.0).build()?)
///     .build()?
///     .run("data/raw/sales_data_raw.csv")?;
///
/// // In memory only
/// let result = Pipeline::builder().build()?.process(dataframe)?;
/// ```
pub struct Pipeline {
    config: CleaningConfig,
    progress_reporter: Option<Arc<dyn ProgressReporter>>,
    resolver: MissingValueResolver,
    reporter: ReportGenerator,
}

// Pipeline can be moved to a worker thread
static_assertions::assert_impl_all!(Pipeline: Send);

impl Pipeline {
    /// Create a new pipeline builder.
    pub fn builder() -> PipelineBuilder {
        PipelineBuilder::default()
    }

    pub fn config(&self) -> &CleaningConfig {
        &self.config
    }

    /// Run normalizer, resolver and filter on an already loaded frame.
    ///
    /// Nothing is written to disk.
    pub fn process(&self, df: DataFrame) -> Result<PipelineResult> {
        let start_time = Instant::now();
        let outcome = self.clean(&df).map(|(data, mut summary)| {
            summary.duration_ms = start_time.elapsed().as_millis() as u64;
            PipelineResult {
                data,
                summary,
                output_file: None,
                report_file: None,
            }
        });
        self.finish(outcome)
    }

    /// Load `input`, clean it, and write the result according to the config.
    ///
    /// Nothing is written if loading or any cleaning stage fails.
    pub fn run(&self, input: impl AsRef<Path>) -> Result<PipelineResult> {
        let outcome = self.run_internal(input.as_ref());
        self.finish(outcome)
    }

    fn finish(&self, outcome: Result<PipelineResult>) -> Result<PipelineResult> {
        match outcome {
            Ok(result) => {
                self.report_progress(ProgressUpdate::complete("Pipeline completed successfully"));
                Ok(result)
            }
            Err(e) => {
                self.report_progress(ProgressUpdate::failed(e.to_string()));
                error!("Pipeline error: {}", e);
                Err(e)
            }
        }
    }

    /// Report progress if a reporter is configured.
    fn report_progress(&self, update: ProgressUpdate) {
        if let Some(reporter) = &self.progress_reporter {
            reporter.report(update);
        }
    }

    fn run_internal(&self, input: &Path) -> Result<PipelineResult> {
        let start_time = Instant::now();

        self.report_progress(ProgressUpdate::new(
            CleaningStage::Loading,
            0.0,
            format!("Loading {}", input.display()),
        ));
        let raw = DataLoader::load(input)?;
        self.report_progress(ProgressUpdate::new(
            CleaningStage::Loading,
            1.0,
            format!("Loaded {} rows", raw.height()),
        ));

        let (mut data, mut summary) = self.clean(&raw)?;

        let mut output_file = None;
        let mut report_file = None;
        if self.config.save_to_disk {
            self.report_progress(ProgressUpdate::with_sub_stage(
                CleaningStage::Writing,
                self.reporter.output_path().display().to_string(),
                0.0,
                "Writing cleaned dataset...",
            ));
            let written = self
                .reporter
                .write_dataset(&mut data)
                .context("Failed to write cleaned dataset")?;

            summary.duration_ms = start_time.elapsed().as_millis() as u64;

            if self.config.generate_reports {
                let report = ReportGenerator::build_report(
                    &input.display().to_string(),
                    Some(&written),
                    &summary,
                );
                let path = match self
                    .reporter
                    .write_report_to_file(&report, &report_stem(&written))
                {
                    Ok(path) => path,
                    Err(e) => {
                        // A failed run leaves no partial output behind
                        if let Err(remove_err) = std::fs::remove_file(&written) {
                            warn!(
                                "Could not remove {} after report failure: {}",
                                written.display(),
                                remove_err
                            );
                        }
                        return Err(e.with_context("Failed to write cleaning report"));
                    }
                };
                report_file = Some(path);
            }

            output_file = Some(written);
            self.report_progress(ProgressUpdate::new(
                CleaningStage::Writing,
                1.0,
                "Output files saved",
            ));
        } else {
            debug!("Skipping output (save_to_disk disabled)");
            summary.duration_ms = start_time.elapsed().as_millis() as u64;
        }

        Ok(PipelineResult {
            data,
            summary,
            output_file,
            report_file,
        })
    }

    fn clean(&self, df: &DataFrame) -> Result<(DataFrame, CleaningSummary)> {
        let mut summary = CleaningSummary::new();
        summary.rows_before = df.height();
        summary.columns = df.width();

        // Step 1: normalize
        self.report_progress(ProgressUpdate::new(
            CleaningStage::Normalizing,
            0.0,
            "Normalizing column names...",
        ));
        info!("Step 1: Normalizing schema...");
        let (normalized, renames) = SchemaNormalizer::normalize_with_renames(df)?;
        for rename in &renames {
            summary.add_action(CleaningAction::new(
                ActionType::ColumnRenamed,
                rename.to.clone(),
                format!("Renamed '{}' to '{}'", rename.from, rename.to),
            ));
        }
        for (role, col_name) in SchemaDescriptor::text_fields()
            .resolve(column_names(&normalized))
            .iter()
        {
            summary.add_action(CleaningAction::new(
                ActionType::ValueCleaned,
                col_name,
                format!("Trimmed whitespace in {} values", role.display_name()),
            ));
        }
        summary.renamed_columns = renames;

        // Step 2: impute
        self.report_progress(ProgressUpdate::new(
            CleaningStage::Imputing,
            0.0,
            "Filling missing values...",
        ));
        info!("Step 2: Resolving missing values...");
        let (resolved, outcomes) = self.resolver.resolve_with_outcomes(&normalized)?;
        for outcome in &outcomes {
            match outcome.fill_value {
                Some(value) => summary.add_action(
                    CleaningAction::new(
                        ActionType::ValueImputed,
                        outcome.column.clone(),
                        format!("Filled {} missing values", outcome.filled),
                    )
                    .with_details(format!("{:?} = {}", outcome.method, value)),
                ),
                None => summary.add_warning(format!(
                    "Column '{}' has no values; missing entries were left as-is",
                    outcome.column
                )),
            }
        }
        summary.fill_outcomes = outcomes;

        // Step 3: filter
        self.report_progress(ProgressUpdate::new(
            CleaningStage::Filtering,
            0.0,
            "Removing invalid rows...",
        ));
        info!("Step 3: Filtering invalid rows...");
        let (filtered, drop_counts) = InvalidRowFilter::apply_with_counts(&resolved)?;
        if drop_counts.total() > 0 {
            summary.add_action(
                CleaningAction::new(
                    ActionType::RowsRemoved,
                    "dataset",
                    format!("Removed {} invalid rows", drop_counts.total()),
                )
                .with_details(format!("{:?}", drop_counts)),
            );
        }
        summary.drop_counts = drop_counts;
        self.report_progress(ProgressUpdate::new(
            CleaningStage::Filtering,
            1.0,
            format!("{} rows remaining", filtered.height()),
        ));

        summary.rows_after = filtered.height();
        summary.rows_removed = summary.rows_before.saturating_sub(summary.rows_after);
        if summary.rows_removed_percentage() > ROWS_REMOVED_WARNING_PCT {
            summary.add_warning(format!(
                "High data loss: {:.1}% of rows were removed",
                summary.rows_removed_percentage()
            ));
        }

        Ok((filtered, summary))
    }
}

fn report_stem(output: &Path) -> String {
    output
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .filter(|s| !s.is_empty())
        .unwrap_or_else(|| DEFAULT_REPORT_STEM.to_string())
}

/// Builder for creating a [`Pipeline`] instance.
///
/// # Example
///
/// ```rust,ignore
/// let pipeline = Pipeline::builder()
///     .config(CleaningConfig::default())
///     .on_progress(|update| {
///         println!("[{:.0}%] {}", update.progress * 100.0, update.message);
///     })
///     .build()?;
/// ```
#[derive(Default)]
pub struct PipelineBuilder {
    config: Option<CleaningConfig>,
    progress_reporter: Option<Arc<dyn ProgressReporter>>,
}

static_assertions::assert_impl_all!(PipelineBuilder: Send);

impl PipelineBuilder {
    /// Set the pipeline configuration.
    pub fn config(mut self, config: CleaningConfig) -> Self {
        self.config = Some(config);
        self
    }

    /// Set a progress reporter for receiving updates during processing.
    pub fn progress_reporter(mut self, reporter: Arc<dyn ProgressReporter>) -> Self {
        self.progress_reporter = Some(reporter);
        self
    }

    /// Set a progress callback closure.
    ///
    /// For more complex scenarios, use [`progress_reporter`](Self::progress_reporter).
    pub fn on_progress<F>(mut self, callback: F) -> Self
    where
        F: Fn(ProgressUpdate) + Send + Sync + 'static,
    {
        self.progress_reporter = Some(Arc::new(ClosureProgressReporter::new(callback)));
        self
    }

    /// Build the pipeline.
    ///
    /// Returns an error if the configuration is invalid.
    pub fn build(self) -> std::result::Result<Pipeline, ConfigValidationError> {
        let config = self.config.unwrap_or_default();
        config.validate()?;

        let reporter = ReportGenerator::new(PathBuf::from(&config.output_path));
        let resolver = MissingValueResolver::new(config.price_fill);

        Ok(Pipeline {
            config,
            progress_reporter: self.progress_reporter,
            resolver,
            reporter,
        })
    }
}

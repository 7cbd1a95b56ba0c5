//! CLI entry point for the sales data cleaning pipeline.

use anyhow::{Context, Result};
use clap::Parser;
use dotenv::dotenv;
use sales_cleaning::{
    CleaningConfig, CleaningReport, CleaningSummary, Pipeline, PipelineResult, ReportGenerator,
};
use serde_json::json;
use tracing::{debug, info};

#[derive(Parser, Debug)]
#[command(
    version,
    about = "Sales data cleaning pipeline",
    long_about = "Loads a raw sales CSV, normalizes its columns, fills missing prices and \
                  quantities, drops invalid rows and writes the cleaned CSV.\n\n\
                  EXAMPLES:\n  \
                  # Clean the default input into the default output\n  \
                  sales-cleaning\n\n  \
                  # Use a fixed price for missing values\n  \
                  sales-cleaning -i raw.csv -o clean.csv --price-fill 0\n\n  \
                  # Preview without writing anything\n  \
                  sales-cleaning -i raw.csv --dry-run"
)]
struct Args {
    /// Path to the raw CSV file
    #[arg(short, long, default_value = "data/raw/sales_data_raw.csv")]
    input: String,

    /// Path of the cleaned CSV
    #[arg(short, long, default_value = sales_cleaning::config::DEFAULT_OUTPUT_PATH)]
    output: String,

    /// Value for missing prices (default: median of the observed prices)
    #[arg(long)]
    price_fill: Option<f64>,

    /// Number of cleaned rows to print
    #[arg(long, default_value = "5")]
    preview_rows: usize,

    /// Clean in memory without writing any files
    #[arg(long)]
    dry_run: bool,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, default_value = "info")]
    log_level: String,

    /// Suppress progress output (only show warnings, errors and the preview)
    #[arg(short, long)]
    quiet: bool,

    /// Output the cleaning report as JSON to stdout instead of the preview
    ///
    /// Disables all logs so stdout only carries JSON.
    #[arg(long)]
    json: bool,

    /// Write a JSON report next to the cleaned CSV
    ///
    /// The report will be saved as <output_name>_report.json
    #[arg(short = 'r', long)]
    emit_report: bool,
}

/// Initialize the tracing subscriber for logging.
///
/// When `json_output` is true, logging is completely disabled to ensure
/// only JSON is written to stdout.
fn init_logging(level: &str, quiet: bool, json_output: bool) {
    if json_output {
        return;
    }

    use tracing_subscriber::EnvFilter;

    let effective_level = if quiet { "warn" } else { level };

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(effective_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
}

fn main() -> Result<()> {
    // .env may carry RUST_LOG, so load it before the subscriber reads the environment
    dotenv().ok();

    let args = Args::parse();
    init_logging(&args.log_level, args.quiet, args.json);

    let mut config_builder = CleaningConfig::builder()
        .output_path(&args.output)
        .save_to_disk(!args.dry_run)
        .generate_reports(args.emit_report && !args.dry_run);
    if let Some(fill) = args.price_fill {
        config_builder = config_builder.price_fill(fill);
    }
    let config = config_builder.build().context("Invalid arguments")?;

    let pipeline = Pipeline::builder()
        .config(config)
        .on_progress(|update| {
            debug!(
                "[{:.0}%] {}: {}",
                update.progress * 100.0,
                update.stage.display_name(),
                update.message
            );
        })
        .build()?;

    if args.dry_run {
        info!("Dry run: nothing will be written");
    }

    let result = match pipeline.run(&args.input) {
        Ok(result) => result,
        Err(e) => {
            if args.json {
                println!("{}", serde_json::to_string_pretty(&json!({ "error": e }))?);
            }
            return Err(e).with_context(|| format!("Failed to clean {}", args.input));
        }
    };

    if args.json {
        let report = build_report(&args, &result);
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    print_preview(&result, args.preview_rows);
    print_summary(&result.summary);
    if let Some(path) = &result.output_file {
        println!("Cleaned data written to {}", path.display());
    }
    if let Some(path) = &result.report_file {
        println!("Report written to {}", path.display());
    }

    Ok(())
}

fn build_report(args: &Args, result: &PipelineResult) -> CleaningReport {
    ReportGenerator::build_report(&args.input, result.output_file.as_deref(), &result.summary)
}

/// Print the first rows of the cleaned dataset.
///
/// Uses `println!` rather than logging so the preview shows at any log level.
fn print_preview(result: &PipelineResult, rows: usize) {
    println!("Cleaning complete. First few rows:");
    println!("{}", result.data.head(Some(rows)));
}

fn print_summary(summary: &CleaningSummary) {
    println!();
    println!(
        "Rows: {} -> {} ({} removed, {:.1}%)",
        summary.rows_before,
        summary.rows_after,
        summary.rows_removed,
        summary.rows_removed_percentage()
    );
    println!("Values filled: {}", summary.values_filled());
    println!("Completed in {}ms", summary.duration_ms);

    if !summary.actions.is_empty() {
        println!("Actions:");
        for action in &summary.actions {
            println!("  - {}: {}", action.action_type.display_name(), action.description);
        }
    }

    if !summary.warnings.is_empty() {
        println!("Warnings:");
        for warning in &summary.warnings {
            println!("  ! {}", warning);
        }
    }
}

//! Cleaner stage: raw survey export → cleaned raw table + encoded table

use std::time::Instant;

use anyhow::Result;
use polars::prelude::DataFrame;

use crate::pipeline::{
    analyze_missing_values, clean_survey, columns_with_missing, load_dataset_with_progress,
    save_dataset, CleaningReport, PipelineConfig, TIMESTAMP_COLUMN,
};
use crate::report::{display_cleaning_report, ArtifactStatus, RunSummary};
use crate::utils::{
    print_count, print_info, print_saved, print_shape, print_step_header, print_step_time,
    print_success,
};

/// Tables produced by the cleaner, as written to disk
#[derive(Debug)]
pub struct CleanOutcome {
    pub raw: DataFrame,
    pub encoded: DataFrame,
    pub report: CleaningReport,
    pub artifacts: RunSummary,
}

/// Load `config.input`, clean and encode it, and write both tables
pub fn run(config: &PipelineConfig) -> Result<CleanOutcome> {
    print_step_header(1, "Load & Clean Survey");
    let step_start = Instant::now();

    let (df, rows, cols, memory_mb) =
        load_dataset_with_progress(&config.input, config.infer_schema_length)?;
    print_shape("Loaded", rows, cols);
    println!("      Estimated memory: {:.2} MB", memory_mb);

    let missing = columns_with_missing(&analyze_missing_values(&df)?);
    if missing.is_empty() {
        print_info("No missing values in the source");
    } else {
        print_count("column(s) with missing values", missing.len(), None);
    }

    let tables = clean_survey(df)?;
    if tables.report.timestamp_dropped {
        print_success(&format!("Dropped column: {}", TIMESTAMP_COLUMN));
    }
    if tables.report.empty_rows_dropped > 0 {
        print_count("empty row(s) dropped", tables.report.empty_rows_dropped, None);
    }

    let mut raw = tables.raw;
    let mut encoded = tables.encoded;
    let mut artifacts = RunSummary::new();

    config.ensure_output_dir()?;
    for (df, path) in [
        (&mut raw, config.raw_table_path()),
        (&mut encoded, config.encoded_table_path()),
    ] {
        save_dataset(df, &path)?;
        print_saved(&path);
        artifacts.record(path, ArtifactStatus::Written);
    }

    print_shape("Cleaned", raw.height(), raw.width());
    print_shape("Encoded", encoded.height(), encoded.width());
    display_cleaning_report(&tables.report, raw.height(), encoded.width());
    print_step_time(step_start.elapsed());

    Ok(CleanOutcome {
        raw,
        encoded,
        report: tables.report,
        artifacts,
    })
}

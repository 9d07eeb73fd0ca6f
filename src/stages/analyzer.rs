//! Analyzer stage: preference breakdown and correlation structure

use std::time::Instant;

use anyhow::Result;

use super::emit_chart;
use crate::charts::{render_bar_chart, render_heatmap, BarChart};
use crate::pipeline::{
    correlation_matrix, read_dataset, save_dataset, value_counts, CorrelationMatrix,
    FrequencyOutcome, PipelineConfig, CORRELATION_HEATMAP_FILE, CORRELATION_MATRIX_FILE,
    PREFERENCE_CHART_FILE,
};
use crate::report::{display_frequency_table, ArtifactStatus, RunSummary};
use crate::utils::{
    print_saved, print_shape, print_step_header, print_step_time, print_success, print_warning,
};

/// What the analyzer computed
#[derive(Debug)]
pub struct AnalysisOutcome {
    pub frequency: FrequencyOutcome,
    pub correlation: CorrelationMatrix,
    pub artifacts: RunSummary,
}

/// Tally the preference question and correlate the encoded table
pub fn run(config: &PipelineConfig) -> Result<AnalysisOutcome> {
    print_step_header(2, "Behaviour Analysis");
    let step_start = Instant::now();
    let mut artifacts = RunSummary::new();
    config.ensure_output_dir()?;

    let encoded = read_dataset(&config.encoded_table_path(), config.infer_schema_length)?;
    print_shape("Encoded table", encoded.height(), encoded.width());

    // The breakdown reads the readable table, loaded on its own
    let raw = read_dataset(&config.raw_table_path(), config.infer_schema_length)?;
    let frequency = value_counts(&raw, &config.preference_column)?;
    let chart_path = config.output_path(PREFERENCE_CHART_FILE);
    match &frequency {
        FrequencyOutcome::Counted(counts) => {
            display_frequency_table(&config.preference_column, counts);
            let chart = BarChart::from_counts("Preferred Shopping Mode", "Shopping Mode", counts);
            emit_chart(config, &chart_path, &mut artifacts, |path| {
                render_bar_chart(&chart, path)
            });
        }
        skipped => {
            let reason = skipped.skip_message().unwrap_or_default();
            print_warning(&reason);
            artifacts.record(chart_path, ArtifactStatus::Skipped(reason));
        }
    }

    // The pairwise path draws its own progress bar
    let correlation = correlation_matrix(&encoded)?;
    print_success(&format!(
        "Correlated {} numeric column(s)",
        correlation.len()
    ));

    let matrix_path = config.output_path(CORRELATION_MATRIX_FILE);
    save_dataset(&mut correlation.to_dataframe()?, &matrix_path)?;
    print_saved(&matrix_path);
    artifacts.record(matrix_path, ArtifactStatus::Written);

    emit_chart(
        config,
        &config.output_path(CORRELATION_HEATMAP_FILE),
        &mut artifacts,
        |path| render_heatmap(&correlation, "Correlation Heatmap of Survey Features", path),
    );

    print_step_time(step_start.elapsed());

    Ok(AnalysisOutcome {
        frequency,
        correlation,
        artifacts,
    })
}

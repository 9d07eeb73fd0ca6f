//! Modeler stage: fit the preference classifier and rank its features

use std::path::PathBuf;
use std::time::Instant;

use anyhow::Result;

use super::emit_chart;
use crate::charts::{render_bar_chart, BarChart, Orientation};
use crate::pipeline::{
    read_dataset, train_and_evaluate, value_counts, FrequencyOutcome, ModelEvaluation,
    PipelineConfig, FEATURE_IMPORTANCE_FILE, MODEL_REPORT_FILE, PURCHASING_BEHAVIOR_FILE,
    SUMMARY_FILE,
};
use crate::report::{
    display_classification_report, display_top_features, export_model_report, write_summary,
    ArtifactStatus, RunSummary,
};
use crate::utils::{
    create_spinner, finish_with_success, finish_with_warning, print_count, print_info, print_saved,
    print_shape, print_step_header, print_step_time, print_warning,
};

/// Result of the best-effort purchasing-behaviour chart
#[derive(Debug, Clone, PartialEq)]
pub enum Enrichment {
    Rendered(PathBuf),
    Skipped(String),
}

/// What the modeler learned, plus the enrichment outcome
#[derive(Debug)]
pub struct ModelOutcome {
    pub evaluation: ModelEvaluation,
    pub enrichment: Enrichment,
    pub artifacts: RunSummary,
}

/// Fit on the encoded table, then write the chart, summary and JSON report
pub fn run(config: &PipelineConfig) -> Result<ModelOutcome> {
    print_step_header(3, "Preference Model");
    let step_start = Instant::now();
    let mut artifacts = RunSummary::new();
    config.ensure_output_dir()?;

    let encoded_path = config.encoded_table_path();
    let encoded = read_dataset(&encoded_path, config.infer_schema_length)?;
    print_shape("Encoded table", encoded.height(), encoded.width());

    let spinner = create_spinner("Fitting logistic regression...");
    let evaluation = match train_and_evaluate(&encoded, &config.target_column, &config.model) {
        Ok(evaluation) => evaluation,
        Err(err) => {
            spinner.finish_and_clear();
            return Err(err);
        }
    };
    let fitted = format!(
        "Fitted on {} row(s), evaluated on {} ({} iteration(s))",
        evaluation.train_rows, evaluation.test_rows, evaluation.model.iterations
    );
    if evaluation.model.converged {
        finish_with_success(&spinner, &fitted);
    } else {
        finish_with_warning(&spinner, &format!("{}; solver did not converge", fitted));
    }

    if !evaluation.dropped_features.is_empty() {
        print_warning(&format!(
            "Dropped {} feature(s) with no observed values: {:?}",
            evaluation.dropped_features.len(),
            evaluation.dropped_features
        ));
    }
    print_count("feature(s) used", evaluation.features.len(), None);

    display_classification_report(&evaluation.report);
    display_top_features(&evaluation.ranking, config.model.top_features);

    let top: Vec<(String, f64)> = evaluation
        .ranking
        .iter()
        .take(config.model.top_features)
        .map(|f| (f.feature.clone(), f.importance))
        .collect();
    let chart = BarChart {
        title: "Top Features Influencing Shopping Mode Preference",
        category_label: "Feature",
        value_label: "Importance",
        orientation: Orientation::Horizontal,
        entries: top,
    };
    emit_chart(
        config,
        &config.output_path(FEATURE_IMPORTANCE_FILE),
        &mut artifacts,
        |path| render_bar_chart(&chart, path),
    );

    let summary_path = config.output_path(SUMMARY_FILE);
    write_summary(&evaluation, config.model.top_features, &summary_path)?;
    print_saved(&summary_path);
    artifacts.record(summary_path, ArtifactStatus::Written);

    let report_path = config.output_path(MODEL_REPORT_FILE);
    export_model_report(&evaluation, &config.model, &encoded_path, &report_path)?;
    print_saved(&report_path);
    artifacts.record(report_path, ArtifactStatus::Written);

    let enrichment = purchasing_behavior_chart(config);
    let chart_path = config.output_path(PURCHASING_BEHAVIOR_FILE);
    match &enrichment {
        Enrichment::Rendered(path) => {
            print_saved(path);
            artifacts.record(path.clone(), ArtifactStatus::Written);
        }
        Enrichment::Skipped(reason) => {
            print_info(&format!("Purchasing behaviour chart skipped: {}", reason));
            artifacts.record(chart_path, ArtifactStatus::Skipped(reason.clone()));
        }
    }

    print_step_time(step_start.elapsed());

    Ok(ModelOutcome {
        evaluation,
        enrichment,
        artifacts,
    })
}

/// Count the trend question in the configured trend source and chart it.
///
/// Never fails: a missing file, unreadable table, absent column or
/// rendering error all come back as `Enrichment::Skipped`.
pub fn purchasing_behavior_chart(config: &PipelineConfig) -> Enrichment {
    let source = config.trend_source_path();
    if !source.exists() {
        return Enrichment::Skipped(format!(
            "{} not found (the cleaner writes {}; pass --trend-source to use it)",
            source.display(),
            config.raw_table_path().display()
        ));
    }

    let df = match read_dataset(&source, config.infer_schema_length) {
        Ok(df) => df,
        Err(err) => {
            return Enrichment::Skipped(format!("could not read {}: {:#}", source.display(), err))
        }
    };

    let counts = match value_counts(&df, &config.trend_column) {
        Ok(FrequencyOutcome::Counted(counts)) => counts,
        Ok(skipped) => return Enrichment::Skipped(skipped.skip_message().unwrap_or_default()),
        Err(err) => return Enrichment::Skipped(format!("{:#}", err)),
    };
    if !config.charts {
        return Enrichment::Skipped(format!(
            "charts disabled ({} distinct response(s) counted)",
            counts.len()
        ));
    }

    let path = config.output_path(PURCHASING_BEHAVIOR_FILE);
    let chart = BarChart::from_counts(
        "Factors Influencing Purchasing Behavior",
        "Influencing Factor",
        &counts,
    );
    match render_bar_chart(&chart, &path) {
        Ok(()) => Enrichment::Rendered(path),
        Err(err) => Enrichment::Skipped(format!("rendering failed: {:#}", err)),
    }
}

//! Model report export

use std::path::Path;

use anyhow::{Context, Result};
use chrono::Utc;
use serde::Serialize;

use crate::pipeline::{ClassificationReport, FeatureImportance, ModelConfig, ModelEvaluation};

/// Metadata about the modeling run
#[derive(Serialize)]
pub struct ModelMetadata {
    /// Timestamp of the run (ISO 8601 format)
    pub timestamp: String,
    /// survey-lens version
    pub version: String,
    /// Encoded table the model was fitted on
    pub input_file: String,
    pub target_column: String,
    pub test_fraction: f64,
    pub seed: u64,
    pub max_iter: usize,
    pub c: f64,
}

/// Fit diagnostics and partition sizes
#[derive(Serialize)]
pub struct ModelSummary {
    pub train_rows: usize,
    pub test_rows: usize,
    pub features_used: usize,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub features_dropped: Vec<String>,
    pub class_counts: Vec<(u8, usize)>,
    pub iterations: usize,
    pub converged: bool,
    pub intercept: f64,
}

/// Complete model report with metadata
#[derive(Serialize)]
pub struct ModelReportExport<'a> {
    pub metadata: ModelMetadata,
    pub summary: ModelSummary,
    pub metrics: &'a ClassificationReport,
    pub features: &'a [FeatureImportance],
}

/// Export the evaluation to a JSON file
pub fn export_model_report(
    evaluation: &ModelEvaluation,
    config: &ModelConfig,
    input_file: &Path,
    output_path: &Path,
) -> Result<()> {
    let export = ModelReportExport {
        metadata: ModelMetadata {
            timestamp: Utc::now().to_rfc3339(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            input_file: input_file.display().to_string(),
            target_column: evaluation.target.clone(),
            test_fraction: config.test_fraction,
            seed: config.seed,
            max_iter: config.max_iter,
            c: config.c,
        },
        summary: ModelSummary {
            train_rows: evaluation.train_rows,
            test_rows: evaluation.test_rows,
            features_used: evaluation.features.len(),
            features_dropped: evaluation.dropped_features.clone(),
            class_counts: evaluation.class_counts.clone(),
            iterations: evaluation.model.iterations,
            converged: evaluation.model.converged,
            intercept: evaluation.model.intercept,
        },
        metrics: &evaluation.report,
        features: &evaluation.ranking,
    };

    let json =
        serde_json::to_string_pretty(&export).context("Failed to serialize model report to JSON")?;

    std::fs::write(output_path, json)
        .with_context(|| format!("Failed to write model report to {}", output_path.display()))?;

    Ok(())
}

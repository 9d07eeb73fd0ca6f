//! Run configuration and the fixed names the stages share
//!
//! Every file name and survey question the pipeline relies on lives here, so
//! the three stages agree on their data contract without re-deriving it.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

/// Default survey export read by the cleaner
pub const DEFAULT_INPUT: &str = "data/Consumer Purchase & Stock Prediction Study (Responses).xlsx";

/// Default directory receiving every artifact
pub const DEFAULT_OUTPUT_DIR: &str = "outputs";

/// Housekeeping column dropped by the cleaner when present
pub const TIMESTAMP_COLUMN: &str = "Timestamp";

/// Sentinel written into empty categorical cells
pub const NO_RESPONSE: &str = "No Response";

/// Survey question whose answers are tallied by the analyzer
pub const PREFERENCE_COLUMN: &str = "Which shopping mode do you prefer most often?";

/// Encoded indicator column predicted by the modeler
pub const TARGET_COLUMN: &str = "Which shopping mode do you prefer most often?_Online(Ecommerce)";

/// Survey question counted by the optional purchasing-behaviour chart
pub const TREND_COLUMN: &str = "What mostly influences your purchasing behavior?";

/// Number of rows used for CSV schema inference
pub const DEFAULT_INFER_SCHEMA_LENGTH: usize = 10_000;

// Artifact file names, relative to the output directory
pub const RAW_TABLE_FILE: &str = "cleaned_data_raw.csv";
pub const ENCODED_TABLE_FILE: &str = "cleaned_data_encoded.csv";
pub const CORRELATION_MATRIX_FILE: &str = "correlation_matrix.csv";
pub const CORRELATION_HEATMAP_FILE: &str = "correlation_heatmap.png";
pub const PREFERENCE_CHART_FILE: &str = "shopping_mode_preference.png";
pub const FEATURE_IMPORTANCE_FILE: &str = "feature_importance.png";
pub const PURCHASING_BEHAVIOR_FILE: &str = "purchasing_behavior.png";
pub const SUMMARY_FILE: &str = "analysis_summary.txt";
pub const MODEL_REPORT_FILE: &str = "model_report.json";

/// Non-encoded table the purchasing-behaviour chart looks for.
///
/// The cleaner never writes this name (it writes `cleaned_data_raw.csv`), so
/// the chart is skipped unless the file is supplied separately or
/// `--trend-source` points elsewhere.
pub const TREND_SOURCE_FILE: &str = "cleaned_data.csv";

/// Hyper-parameters for the split, scaler and classifier
#[derive(Debug, Clone, PartialEq)]
pub struct ModelConfig {
    /// Share of rows held out for evaluation
    pub test_fraction: f64,
    /// Seed for the stratified shuffle
    pub seed: u64,
    /// Upper bound on Newton iterations
    pub max_iter: usize,
    /// Convergence tolerance on the largest parameter step
    pub tolerance: f64,
    /// Inverse L2 regularisation strength
    pub c: f64,
    /// How many ranked features the importance chart shows
    pub top_features: usize,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            test_fraction: 0.2,
            seed: 42,
            max_iter: 1000,
            tolerance: 1e-4,
            c: 1.0,
            top_features: 10,
        }
    }
}

/// Everything a stage needs to know about where to read and write
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    pub input: PathBuf,
    pub output_dir: PathBuf,
    pub target_column: String,
    pub preference_column: String,
    pub trend_column: String,
    /// Explicit trend source; defaults to `TREND_SOURCE_FILE` in the output directory
    pub trend_source: Option<PathBuf>,
    pub infer_schema_length: usize,
    /// Render PNG charts; tables and text artifacts are always written
    pub charts: bool,
    pub model: ModelConfig,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            input: PathBuf::from(DEFAULT_INPUT),
            output_dir: PathBuf::from(DEFAULT_OUTPUT_DIR),
            target_column: TARGET_COLUMN.to_string(),
            preference_column: PREFERENCE_COLUMN.to_string(),
            trend_column: TREND_COLUMN.to_string(),
            trend_source: None,
            infer_schema_length: DEFAULT_INFER_SCHEMA_LENGTH,
            charts: true,
            model: ModelConfig::default(),
        }
    }
}

impl PipelineConfig {
    /// Configuration with default names, reading `input` and writing to `output_dir`
    pub fn new(input: impl Into<PathBuf>, output_dir: impl Into<PathBuf>) -> Self {
        Self {
            input: input.into(),
            output_dir: output_dir.into(),
            ..Default::default()
        }
    }

    /// Path of an artifact inside the output directory
    pub fn output_path(&self, file_name: &str) -> PathBuf {
        self.output_dir.join(file_name)
    }

    pub fn raw_table_path(&self) -> PathBuf {
        self.output_path(RAW_TABLE_FILE)
    }

    pub fn encoded_table_path(&self) -> PathBuf {
        self.output_path(ENCODED_TABLE_FILE)
    }

    pub fn trend_source_path(&self) -> PathBuf {
        self.trend_source
            .clone()
            .unwrap_or_else(|| self.output_path(TREND_SOURCE_FILE))
    }

    /// Create the output directory if it does not exist yet
    pub fn ensure_output_dir(&self) -> Result<&Path> {
        std::fs::create_dir_all(&self.output_dir).with_context(|| {
            format!(
                "Failed to create output directory: {}",
                self.output_dir.display()
            )
        })?;
        Ok(&self.output_dir)
    }
}

//! Error types for the survey pipeline.
//!
//! `PipelineError` captures the domain failures a stage can hit once its
//! input has been read. I/O problems travel as `anyhow` context chains; these
//! variants are the ones callers may want to match on.

use thiserror::Error;

/// Domain errors raised by the cleaning, analysis and modeling stages.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// A column the stage cannot proceed without is absent.
    #[error("Column '{column}' not found in dataset. Available columns: {available:?}")]
    MissingColumn {
        /// Name that was looked up
        column: String,
        /// Columns the table actually has
        available: Vec<String>,
    },

    /// The designated target is not a usable binary 0/1 indicator.
    #[error("Target column '{column}' is not a binary 0/1 indicator: {reason}")]
    InvalidTarget {
        /// Target column name
        column: String,
        /// What was wrong with its values
        reason: String,
    },

    /// A feature column could not be interpreted as numbers.
    #[error("Feature column '{column}' is not numeric (dtype {dtype})")]
    NonNumericFeature {
        /// Feature column name
        column: String,
        /// Polars dtype that was found
        dtype: String,
    },

    /// The stratified train/test split is impossible for this target.
    #[error("Cannot split dataset: {0}")]
    Split(String),

    /// The classifier could not be fitted to the training rows.
    #[error("Model fit failed: {0}")]
    ModelFit(String),

    /// The file extension is not one the loader understands.
    #[error("Unsupported file format: '{0}'. Supported formats: csv, parquet, xlsx, xls")]
    UnsupportedFormat(String),

    /// No rows remain to fit a model on.
    #[error("Dataset has no rows")]
    EmptyDataset,
}

impl PipelineError {
    /// Build a `MissingColumn` error from the table's current column list.
    pub fn missing_column(column: &str, available: &[String]) -> Self {
        Self::MissingColumn {
            column: column.to_string(),
            available: available.to_vec(),
        }
    }
}

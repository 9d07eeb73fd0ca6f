//! Command-line argument definitions using clap

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::pipeline::{
    ModelConfig, PipelineConfig, DEFAULT_INFER_SCHEMA_LENGTH, DEFAULT_INPUT, DEFAULT_OUTPUT_DIR,
    PREFERENCE_COLUMN, TARGET_COLUMN, TREND_COLUMN,
};

/// survey-lens - Clean, analyze and model consumer shopping-preference survey responses
#[derive(Parser, Debug)]
#[command(name = "survey-lens")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Directory all artifacts are written to (created if absent)
    #[arg(short, long, global = true, default_value = DEFAULT_OUTPUT_DIR)]
    pub output_dir: PathBuf,

    /// Encoded indicator column the classifier predicts.
    /// Must hold 0/1 values in the encoded table.
    #[arg(short, long, global = true, default_value = TARGET_COLUMN)]
    pub target: String,

    /// Raw question whose answers are tallied for the preference chart
    #[arg(long, global = true, default_value = PREFERENCE_COLUMN)]
    pub preference_column: String,

    /// Raw question tallied for the purchasing-behaviour chart
    #[arg(long, global = true, default_value = TREND_COLUMN)]
    pub trend_column: String,

    /// Table read for the purchasing-behaviour chart.
    /// Defaults to cleaned_data.csv in the output directory.
    #[arg(long, global = true)]
    pub trend_source: Option<PathBuf>,

    /// Number of rows to use for schema inference (CSV only).
    /// Use 0 for full table scan (very slow for large files).
    #[arg(long, global = true, default_value_t = DEFAULT_INFER_SCHEMA_LENGTH)]
    pub infer_schema_length: usize,

    /// Share of rows held out for evaluation (between 0 and 1, exclusive)
    #[arg(long, global = true, default_value = "0.2", value_parser = validate_test_fraction)]
    pub test_fraction: f64,

    /// Seed for the stratified train/test shuffle
    #[arg(long, global = true, default_value = "42")]
    pub seed: u64,

    /// Maximum solver iterations for the logistic regression
    #[arg(long, global = true, default_value = "1000")]
    pub max_iter: usize,

    /// Number of ranked features shown in the importance chart
    #[arg(long, global = true, default_value = "10")]
    pub top_features: usize,

    /// Skip PNG chart rendering; tables and reports are still written
    #[arg(long, global = true, default_value = "false")]
    pub no_charts: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Drop the timestamp and empty rows, fill gaps and one-hot encode
    Clean {
        /// Survey export (CSV or Parquet)
        #[arg(short, long, default_value = DEFAULT_INPUT)]
        input: PathBuf,
    },

    /// Tally the preference question and correlate the encoded table
    Analyze,

    /// Fit the preference classifier and rank feature importance
    Model,

    /// Clean, analyze and model in one go
    Run {
        /// Survey export (CSV or Parquet)
        #[arg(short, long, default_value = DEFAULT_INPUT)]
        input: PathBuf,
    },

    /// List the columns of a survey export
    Columns {
        /// File to inspect (CSV or Parquet)
        #[arg(short, long, default_value = DEFAULT_INPUT)]
        input: PathBuf,
    },
}

impl Cli {
    /// Source file named by the subcommand, if it takes one
    pub fn input(&self) -> Option<&PathBuf> {
        match &self.command {
            Commands::Clean { input } | Commands::Run { input } | Commands::Columns { input } => {
                Some(input)
            }
            Commands::Analyze | Commands::Model => None,
        }
    }

    /// Stage configuration assembled from the parsed flags
    pub fn pipeline_config(&self) -> PipelineConfig {
        let defaults = ModelConfig::default();
        PipelineConfig {
            input: self
                .input()
                .cloned()
                .unwrap_or_else(|| PathBuf::from(DEFAULT_INPUT)),
            output_dir: self.output_dir.clone(),
            target_column: self.target.clone(),
            preference_column: self.preference_column.clone(),
            trend_column: self.trend_column.clone(),
            trend_source: self.trend_source.clone(),
            infer_schema_length: self.infer_schema_length,
            charts: !self.no_charts,
            model: ModelConfig {
                test_fraction: self.test_fraction,
                seed: self.seed,
                max_iter: self.max_iter,
                top_features: self.top_features,
                ..defaults
            },
        }
    }
}

/// Validator for test_fraction parameter
fn validate_test_fraction(s: &str) -> Result<f64, String> {
    let value: f64 = s
        .parse()
        .map_err(|_| format!("'{}' is not a valid number", s))?;

    if value > 0.0 && value < 1.0 {
        Ok(value)
    } else {
        Err(format!(
            "test_fraction must be between 0.0 and 1.0 (exclusive), got {}",
            value
        ))
    }
}

//! Missing value analysis and mean imputation

use anyhow::Result;
use polars::prelude::*;

use super::error::PipelineError;

/// Missing ratio per column, sorted descending
pub fn analyze_missing_values(df: &DataFrame) -> Result<Vec<(String, f64)>> {
    // Handle empty DataFrame
    if df.height() == 0 {
        return Ok(Vec::new());
    }

    let total = df.height() as f64;
    let mut missing_ratios: Vec<(String, f64)> = df
        .get_columns()
        .iter()
        .map(|col| (col.name().to_string(), col.null_count() as f64 / total))
        .collect();

    missing_ratios.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));

    Ok(missing_ratios)
}

/// Columns that have at least one missing value
pub fn columns_with_missing(missing_ratios: &[(String, f64)]) -> Vec<(String, f64)> {
    missing_ratios
        .iter()
        .filter(|(_, ratio)| *ratio > 0.0)
        .cloned()
        .collect()
}

/// Feature matrix after mean imputation, stored column-major
#[derive(Debug, Clone, Default)]
pub struct ImputedFeatures {
    pub names: Vec<String>,
    pub columns: Vec<Vec<f64>>,
    /// Fill value used for each kept column
    pub means: Vec<f64>,
    /// Columns without a single observed value; they carry no information
    pub dropped: Vec<String>,
}

impl ImputedFeatures {
    pub fn n_rows(&self) -> usize {
        self.columns.first().map_or(0, Vec::len)
    }

    pub fn n_features(&self) -> usize {
        self.columns.len()
    }
}

/// Fill nulls in every column of `df` with that column's mean.
///
/// All columns must be numeric or boolean; anything else is a
/// `NonNumericFeature` error. Columns without an observed value are
/// reported in `dropped` instead.
pub fn impute_mean(df: &DataFrame) -> Result<ImputedFeatures> {
    let mut imputed = ImputedFeatures::default();

    for col in df.get_columns() {
        // An all-null column reads back from CSV as text; it is empty either way
        if col.null_count() == col.len() {
            imputed.dropped.push(col.name().to_string());
            continue;
        }

        let dtype = col.dtype();
        if !(dtype.is_primitive_numeric() || matches!(dtype, DataType::Boolean | DataType::Null)) {
            return Err(PipelineError::NonNumericFeature {
                column: col.name().to_string(),
                dtype: dtype.to_string(),
            }
            .into());
        }

        let values = col.cast(&DataType::Float64)?;
        let ca = values.f64()?;
        let observed: Vec<f64> = ca.into_iter().flatten().collect();

        if observed.is_empty() {
            imputed.dropped.push(col.name().to_string());
            continue;
        }

        let mean = observed.iter().sum::<f64>() / observed.len() as f64;
        imputed.names.push(col.name().to_string());
        imputed.columns.push(ca.into_iter().map(|v| v.unwrap_or(mean)).collect());
        imputed.means.push(mean);
    }

    Ok(imputed)
}

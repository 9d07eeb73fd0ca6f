//! Pearson correlation matrix over the numeric columns of a table

use anyhow::Result;
use faer::Mat;
use polars::prelude::*;
use rayon::prelude::*;

use crate::utils::create_pair_progress;

/// Threshold for auto-selecting matrix vs pairwise correlation computation.
/// Matrix multiplication is more efficient when there are many columns.
pub const MATRIX_METHOD_COLUMN_THRESHOLD: usize = 15;

/// Square, symmetric correlation matrix with named rows and columns.
///
/// The diagonal is exactly 1.0. Off-diagonal entries lie in [-1, 1], or are
/// NaN when the correlation is undefined (a constant column, or fewer than
/// two rows where both columns are observed).
#[derive(Debug, Clone)]
pub struct CorrelationMatrix {
    pub columns: Vec<String>,
    pub values: Mat<f64>,
}

impl CorrelationMatrix {
    fn identity(columns: Vec<String>) -> Self {
        let n = columns.len();
        let values = Mat::from_fn(n, n, |i, j| if i == j { 1.0 } else { f64::NAN });
        Self { columns, values }
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    pub fn get(&self, i: usize, j: usize) -> f64 {
        self.values[(i, j)]
    }

    /// Look up a correlation by column names
    pub fn between(&self, a: &str, b: &str) -> Option<f64> {
        let i = self.columns.iter().position(|c| c == a)?;
        let j = self.columns.iter().position(|c| c == b)?;
        Some(self.get(i, j))
    }

    /// Tabular form for persisting: a `feature` label column, then one column
    /// per feature. Undefined entries become nulls.
    pub fn to_dataframe(&self) -> Result<DataFrame> {
        let mut columns = Vec::with_capacity(self.len() + 1);
        columns.push(Column::new("feature".into(), self.columns.clone()));
        for (j, name) in self.columns.iter().enumerate() {
            let values: Vec<Option<f64>> = (0..self.len())
                .map(|i| Some(self.get(i, j)).filter(|v| !v.is_nan()))
                .collect();
            columns.push(Column::new(name.as_str().into(), values));
        }
        Ok(DataFrame::new(columns)?)
    }
}

/// Numeric columns cast to Float64, in table order
fn numeric_float_columns(df: &DataFrame) -> Vec<(String, Column)> {
    df.get_columns()
        .iter()
        .filter(|col| col.dtype().is_primitive_numeric())
        .filter_map(|col| {
            col.cast(&DataType::Float64)
                .ok()
                .map(|cast| (col.name().to_string(), cast))
        })
        .collect()
}

/// Compute the correlation matrix, picking the faster method for the table.
///
/// The matrix method needs complete data; any null falls back to pairwise.
pub fn correlation_matrix(df: &DataFrame) -> Result<CorrelationMatrix> {
    let float_columns = numeric_float_columns(df);
    let has_nulls = float_columns.iter().any(|(_, col)| col.null_count() > 0);

    if float_columns.len() >= MATRIX_METHOD_COLUMN_THRESHOLD && !has_nulls {
        if let Some(matrix) = compute_correlation_matrix_fast(&float_columns) {
            return Ok(matrix);
        }
    }
    Ok(compute_pairwise(&float_columns))
}

/// Pairwise-complete Pearson correlation over every numeric column pair
pub fn correlation_matrix_pairwise(df: &DataFrame) -> Result<CorrelationMatrix> {
    Ok(compute_pairwise(&numeric_float_columns(df)))
}

/// Matrix-based correlation; requires numeric columns without nulls
pub fn correlation_matrix_dense(df: &DataFrame) -> Result<CorrelationMatrix> {
    let float_columns = numeric_float_columns(df);
    compute_correlation_matrix_fast(&float_columns).ok_or_else(|| {
        anyhow::anyhow!("Matrix correlation needs at least one row and no missing values")
    })
}

fn compute_pairwise(float_columns: &[(String, Column)]) -> CorrelationMatrix {
    let names: Vec<String> = float_columns.iter().map(|(name, _)| name.clone()).collect();
    let mut matrix = CorrelationMatrix::identity(names);
    let num_cols = float_columns.len();
    if num_cols < 2 {
        return matrix;
    }

    // Generate all pairs (indices for upper triangle)
    let pairs: Vec<(usize, usize)> = (0..num_cols)
        .flat_map(|i| ((i + 1)..num_cols).map(move |j| (i, j)))
        .collect();

    let pb = create_pair_progress(pairs.len() as u64);

    let results: Vec<(usize, usize, f64)> = pairs
        .par_iter()
        .map(|&(i, j)| {
            let corr = compute_pearson_correlation(&float_columns[i].1, &float_columns[j].1)
                .unwrap_or(f64::NAN);
            pb.inc(1);
            (i, j, corr)
        })
        .collect();

    pb.finish_and_clear();

    for (i, j, corr) in results {
        matrix.values[(i, j)] = corr;
        matrix.values[(j, i)] = corr;
    }
    matrix
}

/// Pearson correlation over rows where both values are present, using
/// Welford's single-pass update for numerical stability
fn compute_pearson_correlation(s1: &Column, s2: &Column) -> Option<f64> {
    let ca1 = s1.f64().ok()?;
    let ca2 = s2.f64().ok()?;

    if ca1.len() != ca2.len() {
        return None;
    }

    let mut n = 0.0;
    let mut mean_x = 0.0;
    let mut mean_y = 0.0;
    let mut var_x = 0.0;
    let mut var_y = 0.0;
    let mut cov_xy = 0.0;

    for (x, y) in ca1.iter().zip(ca2.iter()) {
        if let (Some(x), Some(y)) = (x, y) {
            n += 1.0;
            let dx = x - mean_x;
            let dy = y - mean_y;
            mean_x += dx / n;
            mean_y += dy / n;
            var_x += dx * (x - mean_x);
            var_y += dy * (y - mean_y);
            cov_xy += dx * (y - mean_y);
        }
    }

    if n < 2.0 || var_x <= 0.0 || var_y <= 0.0 {
        return None;
    }

    Some((cov_xy / (var_x.sqrt() * var_y.sqrt())).clamp(-1.0, 1.0))
}

/// Compute correlation matrix using matrix operations.
///
/// Algorithm:
/// 1. Standardise each column: z = (x - mean) / (std * sqrt(n))
/// 2. Compute R = Z^T * Z
///
/// Constant columns get NaN off the diagonal. Returns None when any value is
/// missing or the table has no rows.
fn compute_correlation_matrix_fast(float_columns: &[(String, Column)]) -> Option<CorrelationMatrix> {
    let names: Vec<String> = float_columns.iter().map(|(name, _)| name.clone()).collect();
    let n_cols = float_columns.len();
    let n_rows = float_columns.first().map_or(0, |(_, col)| col.len());
    if n_rows == 0 {
        return None;
    }

    // Standardise every column in parallel; None marks a constant column
    let standardized: Vec<Option<Option<Vec<f64>>>> = float_columns
        .par_iter()
        .map(|(_, col)| {
            let ca = col.f64().ok()?;
            let values: Vec<f64> = ca.into_iter().collect::<Option<Vec<f64>>>()?;
            let n = values.len() as f64;
            let mean = values.iter().sum::<f64>() / n;
            let ss: f64 = values.iter().map(|x| (x - mean) * (x - mean)).sum();
            if ss <= 0.0 {
                return Some(None);
            }
            let norm = ss.sqrt();
            Some(Some(values.iter().map(|x| (x - mean) / norm).collect()))
        })
        .collect();

    let standardized: Vec<Option<Vec<f64>>> = standardized.into_iter().collect::<Option<_>>()?;

    let mut z = Mat::<f64>::zeros(n_rows, n_cols);
    for (col_idx, col_data) in standardized.iter().enumerate() {
        if let Some(col_data) = col_data {
            for (row_idx, &val) in col_data.iter().enumerate() {
                z[(row_idx, col_idx)] = val;
            }
        }
    }

    let product = z.transpose() * &z;

    let values = Mat::from_fn(n_cols, n_cols, |i, j| {
        if i == j {
            1.0
        } else if standardized[i].is_none() || standardized[j].is_none() {
            f64::NAN
        } else {
            product[(i, j)].clamp(-1.0, 1.0)
        }
    });

    Some(CorrelationMatrix {
        columns: names,
        values,
    })
}

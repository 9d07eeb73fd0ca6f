//! Binary logistic regression and the train/evaluate/rank pipeline

use std::collections::BTreeMap;

use anyhow::Result;
use faer::prelude::*;
use polars::prelude::{DataFrame, DataType};
use serde::Serialize;

use super::config::ModelConfig;
use super::error::PipelineError;
use super::loader::column_names;
use super::metrics::ClassificationReport;
use super::missing::impute_mean;
use super::scaling::StandardScaler;
use super::split::stratified_split;

/// Tolerance for floating point comparison when checking binary 0/1 values
const TOLERANCE: f64 = 1e-9;

/// Sufficient-decrease constant for the backtracking line search
const ARMIJO: f64 = 1e-4;

/// Keeps the intercept row of the Hessian invertible when every row saturates
const INTERCEPT_JITTER: f64 = 1e-10;

fn sigmoid(z: f64) -> f64 {
    if z >= 0.0 {
        1.0 / (1.0 + (-z).exp())
    } else {
        let e = z.exp();
        e / (1.0 + e)
    }
}

/// log(1 + e^z) without overflow
fn softplus(z: f64) -> f64 {
    if z > 0.0 {
        z + (-z).exp().ln_1p()
    } else {
        z.exp().ln_1p()
    }
}

/// L2-regularised logistic regression solved with damped Newton steps
#[derive(Debug, Clone)]
pub struct LogisticRegression {
    /// Inverse regularisation strength; the intercept is not penalised
    pub c: f64,
    pub max_iter: usize,
    /// Stop once no parameter moves by more than this
    pub tolerance: f64,
}

impl Default for LogisticRegression {
    fn default() -> Self {
        Self {
            c: 1.0,
            max_iter: 1000,
            tolerance: 1e-4,
        }
    }
}

impl From<&ModelConfig> for LogisticRegression {
    fn from(config: &ModelConfig) -> Self {
        Self {
            c: config.c,
            max_iter: config.max_iter,
            tolerance: config.tolerance,
        }
    }
}

/// Learned coefficients of a fitted classifier
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FittedLogistic {
    /// One weight per feature column, in column order
    pub coefficients: Vec<f64>,
    pub intercept: f64,
    pub iterations: usize,
    pub converged: bool,
}

impl FittedLogistic {
    /// Linear score `x·w + b` per row
    pub fn decision_function(&self, x: &Mat<f64>) -> Vec<f64> {
        (0..x.nrows())
            .map(|i| {
                self.coefficients
                    .iter()
                    .enumerate()
                    .map(|(j, w)| w * x[(i, j)])
                    .sum::<f64>()
                    + self.intercept
            })
            .collect()
    }

    /// Probability of class 1 per row
    pub fn predict_proba(&self, x: &Mat<f64>) -> Vec<f64> {
        self.decision_function(x).into_iter().map(sigmoid).collect()
    }

    /// Class 1 when the score is positive, else class 0
    pub fn predict(&self, x: &Mat<f64>) -> Vec<u8> {
        self.decision_function(x)
            .into_iter()
            .map(|z| u8::from(z > 0.0))
            .collect()
    }
}

impl LogisticRegression {
    /// Minimise the weighted log-loss plus `||w||^2 / (2C)`.
    ///
    /// `x` is n×p, `y` holds 0/1 labels and `sample_weight` one weight per
    /// row. Each iteration solves the Newton system with an LU factorisation
    /// and halves the step until the objective decreases sufficiently.
    pub fn fit(
        &self,
        x: &Mat<f64>,
        y: &[u8],
        sample_weight: &[f64],
    ) -> Result<FittedLogistic, PipelineError> {
        let (n, p) = (x.nrows(), x.ncols());
        if n == 0 {
            return Err(PipelineError::EmptyDataset);
        }
        if y.len() != n || sample_weight.len() != n {
            return Err(PipelineError::ModelFit(format!(
                "{} rows but {} labels and {} weights",
                n,
                y.len(),
                sample_weight.len()
            )));
        }

        let inv_c = 1.0 / self.c;
        let targets: Vec<f64> = y.iter().map(|&v| f64::from(v)).collect();

        // Design matrix with a trailing column of ones for the intercept
        let xa = Mat::from_fn(n, p + 1, |i, j| if j < p { x[(i, j)] } else { 1.0 });

        let scores = |theta: &[f64]| -> Vec<f64> {
            (0..n)
                .map(|i| (0..=p).map(|j| theta[j] * xa[(i, j)]).sum())
                .collect()
        };
        let objective = |theta: &[f64]| -> f64 {
            let z = scores(theta);
            let loss: f64 = (0..n)
                .map(|i| sample_weight[i] * (softplus(z[i]) - targets[i] * z[i]))
                .sum();
            let penalty: f64 = theta[..p].iter().map(|w| w * w).sum::<f64>() * 0.5 * inv_c;
            loss + penalty
        };

        let mut theta = vec![0.0; p + 1];
        let mut loss = objective(&theta);
        let mut iterations = 0;
        let mut converged = false;

        while iterations < self.max_iter {
            iterations += 1;

            let z = scores(&theta);
            let mu: Vec<f64> = z.iter().map(|&v| sigmoid(v)).collect();
            let residual: Vec<f64> = (0..n)
                .map(|i| sample_weight[i] * (mu[i] - targets[i]))
                .collect();
            let curvature: Vec<f64> = (0..n)
                .map(|i| sample_weight[i] * mu[i] * (1.0 - mu[i]))
                .collect();

            let gradient = Mat::from_fn(p + 1, 1, |j, _| {
                let data: f64 = (0..n).map(|i| residual[i] * xa[(i, j)]).sum();
                if j < p {
                    data + inv_c * theta[j]
                } else {
                    data
                }
            });

            let weighted = Mat::from_fn(n, p + 1, |i, j| curvature[i] * xa[(i, j)]);
            let mut hessian = xa.transpose() * &weighted;
            for j in 0..p {
                hessian[(j, j)] += inv_c;
            }
            hessian[(p, p)] += INTERCEPT_JITTER;

            let solved = hessian.partial_piv_lu().solve(gradient.as_ref());
            let step: Vec<f64> = (0..=p).map(|j| solved[(j, 0)]).collect();

            // The full Newton step bounds the distance to the optimum
            if step.iter().all(|s| s.abs() < self.tolerance) {
                theta.iter_mut().zip(&step).for_each(|(w, s)| *w -= s);
                converged = true;
                break;
            }

            let descent: f64 = (0..=p).map(|j| gradient[(j, 0)] * step[j]).sum();
            match backtrack(&objective, &theta, &step, loss, descent) {
                LineSearch::Accepted {
                    theta: next,
                    loss: next_loss,
                } => {
                    theta = next;
                    loss = next_loss;
                }
                LineSearch::Stalled { last_loss } if !last_loss.is_finite() => {
                    return Err(PipelineError::ModelFit(format!(
                        "objective is not finite after {} iteration(s)",
                        iterations
                    )));
                }
                // No step length decreases the objective; keep the last point
                LineSearch::Stalled { .. } => break,
            }
        }

        let intercept = theta[p];
        theta.truncate(p);
        Ok(FittedLogistic {
            coefficients: theta,
            intercept,
            iterations,
            converged,
        })
    }
}

/// Shortest step length tried before the line search gives up
const MIN_STEP_LENGTH: f64 = 1e-10;

/// Outcome of one backtracking line search
#[derive(Debug, PartialEq)]
enum LineSearch {
    Accepted { theta: Vec<f64>, loss: f64 },
    Stalled { last_loss: f64 },
}

/// Halve the step along `-step` until the Armijo condition holds
fn backtrack<F>(objective: F, theta: &[f64], step: &[f64], loss: f64, descent: f64) -> LineSearch
where
    F: Fn(&[f64]) -> f64,
{
    let mut t = 1.0;
    let mut last_loss = loss;
    while t >= MIN_STEP_LENGTH {
        let candidate: Vec<f64> = theta.iter().zip(step).map(|(w, s)| w - t * s).collect();
        let candidate_loss = objective(&candidate);
        if candidate_loss <= loss - ARMIJO * t * descent {
            return LineSearch::Accepted {
                theta: candidate,
                loss: candidate_loss,
            };
        }
        last_loss = candidate_loss;
        t *= 0.5;
    }
    LineSearch::Stalled { last_loss }
}

/// Sample weights `n / (k * n_class)` so each class contributes equally
pub fn balanced_class_weights(y: &[u8]) -> Vec<f64> {
    let mut counts: BTreeMap<u8, usize> = BTreeMap::new();
    for &label in y {
        *counts.entry(label).or_insert(0) += 1;
    }
    let n = y.len() as f64;
    let k = counts.len() as f64;
    y.iter()
        .map(|label| n / (k * counts[label] as f64))
        .collect()
}

/// Extract a 0/1 target column as labels.
///
/// The column must be numeric or boolean, have no nulls and hold only 0 and 1.
pub fn binary_target(df: &DataFrame, target: &str) -> Result<Vec<u8>> {
    let col = df
        .column(target)
        .map_err(|_| PipelineError::missing_column(target, &column_names(df)))?;

    let invalid = |reason: String| PipelineError::InvalidTarget {
        column: target.to_string(),
        reason,
    };

    let dtype = col.dtype();
    if !(dtype.is_primitive_numeric() || matches!(dtype, DataType::Boolean)) {
        return Err(invalid(format!("dtype {} is not numeric", dtype)).into());
    }
    if col.null_count() > 0 {
        return Err(invalid(format!("{} missing value(s)", col.null_count())).into());
    }

    let values = col.cast(&DataType::Float64)?;
    let mut labels = Vec::with_capacity(values.len());
    for v in values.f64()?.into_iter().flatten() {
        if (v - 0.0).abs() < TOLERANCE {
            labels.push(0);
        } else if (v - 1.0).abs() < TOLERANCE {
            labels.push(1);
        } else {
            return Err(invalid(format!("found value {}", v)).into());
        }
    }
    Ok(labels)
}

/// A feature and the magnitude of its learned coefficient
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FeatureImportance {
    pub feature: String,
    pub importance: f64,
}

/// Rank features by absolute coefficient, largest first
pub fn rank_features(names: &[String], coefficients: &[f64]) -> Vec<FeatureImportance> {
    let mut ranking: Vec<FeatureImportance> = names
        .iter()
        .zip(coefficients)
        .map(|(name, coef)| FeatureImportance {
            feature: name.clone(),
            importance: coef.abs(),
        })
        .collect();
    ranking.sort_by(|a, b| {
        b.importance
            .partial_cmp(&a.importance)
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    ranking
}

/// Everything the modeler learned and measured on one table
#[derive(Debug, Clone)]
pub struct ModelEvaluation {
    pub target: String,
    /// Feature columns that entered the model, in column order
    pub features: Vec<String>,
    /// Feature columns dropped because they had no observed value
    pub dropped_features: Vec<String>,
    pub train_rows: usize,
    pub test_rows: usize,
    /// Rows per class in the full table
    pub class_counts: Vec<(u8, usize)>,
    pub model: FittedLogistic,
    pub report: ClassificationReport,
    pub ranking: Vec<FeatureImportance>,
}

fn select_rows(x: &Mat<f64>, rows: &[usize]) -> Mat<f64> {
    Mat::from_fn(rows.len(), x.ncols(), |i, j| x[(rows[i], j)])
}

/// Fit the classifier predicting `target` from every other column.
///
/// Order of operations: mean imputation, stratified split, standardisation
/// fit on the training rows, class-balanced logistic regression, evaluation
/// on the held-out rows, and ranking by absolute coefficient.
pub fn train_and_evaluate(
    df: &DataFrame,
    target: &str,
    config: &ModelConfig,
) -> Result<ModelEvaluation> {
    let available = column_names(df);
    if !available.iter().any(|c| c == target) {
        return Err(PipelineError::missing_column(target, &available).into());
    }
    if df.height() == 0 {
        return Err(PipelineError::EmptyDataset.into());
    }

    let labels = binary_target(df, target)?;
    let imputed = impute_mean(&df.drop(target)?)?;

    let (n, p) = (labels.len(), imputed.n_features());
    let x = Mat::from_fn(n, p, |i, j| imputed.columns[j][i]);

    let split = stratified_split(&labels, config.test_fraction, config.seed)?;
    let x_train = select_rows(&x, &split.train);
    let x_test = select_rows(&x, &split.test);
    let y_train: Vec<u8> = split.train.iter().map(|&i| labels[i]).collect();
    let y_test: Vec<u8> = split.test.iter().map(|&i| labels[i]).collect();

    let (scaler, x_train) = StandardScaler::fit_transform(&x_train);
    let x_test = scaler.transform(&x_test);

    let weights = balanced_class_weights(&y_train);
    let model = LogisticRegression::from(config).fit(&x_train, &y_train, &weights)?;

    let y_pred = model.predict(&x_test);
    let report = ClassificationReport::from_predictions(&y_test, &y_pred);
    let ranking = rank_features(&imputed.names, &model.coefficients);

    let mut class_counts: BTreeMap<u8, usize> = BTreeMap::new();
    for &label in &labels {
        *class_counts.entry(label).or_insert(0) += 1;
    }

    Ok(ModelEvaluation {
        target: target.to_string(),
        features: imputed.names,
        dropped_features: imputed.dropped,
        train_rows: split.train.len(),
        test_rows: split.test.len(),
        class_counts: class_counts.into_iter().collect(),
        model,
        report,
        ranking,
    })
}

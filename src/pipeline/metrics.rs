//! Classification metrics: accuracy and a per-class precision/recall/F1 report

use std::collections::BTreeSet;

use serde::Serialize;

/// Precision, recall and F1 for one class label
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClassMetrics {
    pub label: u8,
    pub precision: f64,
    pub recall: f64,
    pub f1: f64,
    /// Number of true instances of the label
    pub support: usize,
}

/// Averaged scores across classes
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AveragedMetrics {
    pub precision: f64,
    pub recall: f64,
    pub f1: f64,
    pub support: usize,
}

/// Accuracy plus per-class breakdown with macro and support-weighted averages.
///
/// Labels are the union of those seen in the truth and the predictions.
/// A ratio with a zero denominator is reported as 0.0.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClassificationReport {
    pub accuracy: f64,
    pub classes: Vec<ClassMetrics>,
    pub macro_avg: AveragedMetrics,
    pub weighted_avg: AveragedMetrics,
}

fn ratio(num: usize, den: usize) -> f64 {
    if den == 0 {
        0.0
    } else {
        num as f64 / den as f64
    }
}

/// Fraction of predictions that match the truth
pub fn accuracy(y_true: &[u8], y_pred: &[u8]) -> f64 {
    let correct = y_true
        .iter()
        .zip(y_pred)
        .filter(|(t, p)| t == p)
        .count();
    ratio(correct, y_true.len())
}

impl ClassificationReport {
    pub fn from_predictions(y_true: &[u8], y_pred: &[u8]) -> Self {
        let labels: BTreeSet<u8> = y_true.iter().chain(y_pred).copied().collect();

        let classes: Vec<ClassMetrics> = labels
            .into_iter()
            .map(|label| {
                let mut tp = 0;
                let mut predicted = 0;
                let mut actual = 0;
                for (&t, &p) in y_true.iter().zip(y_pred) {
                    if p == label {
                        predicted += 1;
                    }
                    if t == label {
                        actual += 1;
                        if p == label {
                            tp += 1;
                        }
                    }
                }
                let precision = ratio(tp, predicted);
                let recall = ratio(tp, actual);
                let f1 = if precision + recall > 0.0 {
                    2.0 * precision * recall / (precision + recall)
                } else {
                    0.0
                };
                ClassMetrics {
                    label,
                    precision,
                    recall,
                    f1,
                    support: actual,
                }
            })
            .collect();

        let total: usize = classes.iter().map(|c| c.support).sum();
        let k = classes.len().max(1) as f64;
        let macro_avg = AveragedMetrics {
            precision: classes.iter().map(|c| c.precision).sum::<f64>() / k,
            recall: classes.iter().map(|c| c.recall).sum::<f64>() / k,
            f1: classes.iter().map(|c| c.f1).sum::<f64>() / k,
            support: total,
        };

        let weight = |c: &ClassMetrics| {
            if total == 0 {
                0.0
            } else {
                c.support as f64 / total as f64
            }
        };
        let weighted_avg = AveragedMetrics {
            precision: classes.iter().map(|c| weight(c) * c.precision).sum(),
            recall: classes.iter().map(|c| weight(c) * c.recall).sum(),
            f1: classes.iter().map(|c| weight(c) * c.f1).sum(),
            support: total,
        };

        Self {
            accuracy: accuracy(y_true, y_pred),
            classes,
            macro_avg,
            weighted_avg,
        }
    }
}

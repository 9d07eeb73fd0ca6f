//! Tests for the logistic regression, metrics and feature ranking

use faer::Mat;
use polars::prelude::*;
use survey_lens::pipeline::*;

#[path = "common/mod.rs"]
mod common;

use common::*;

/// 40 rows where the first feature alone separates the classes by a wide margin
fn separable_set() -> (Mat<f64>, Vec<u8>) {
    let n = 40;
    let x = Mat::from_fn(n, 2, |i, j| {
        if j == 0 {
            if i < 20 {
                -(1.0 + i as f64 * 0.1)
            } else {
                1.0 + (i - 20) as f64 * 0.1
            }
        } else {
            ((i * 7) % 11) as f64 / 11.0
        }
    });
    let y = (0..n).map(|i| u8::from(i >= 20)).collect();
    (x, y)
}

#[test]
fn test_logistic_separates_toy_set() {
    let (x, y) = separable_set();
    let weights = vec![1.0; y.len()];

    let model = LogisticRegression::default().fit(&x, &y, &weights).unwrap();

    assert!(model.converged);
    assert_eq!(model.predict(&x), y);
    assert!(model.coefficients[0] > 0.0);
    assert!(model.coefficients[0].abs() > model.coefficients[1].abs());
    assert!(model
        .predict_proba(&x)
        .iter()
        .all(|p| *p > 0.0 && *p < 1.0));
}

#[test]
fn test_logistic_is_deterministic() {
    let (x, y) = separable_set();
    let weights = balanced_class_weights(&y);

    let first = LogisticRegression::default().fit(&x, &y, &weights).unwrap();
    let second = LogisticRegression::default().fit(&x, &y, &weights).unwrap();
    assert_eq!(first, second);
}

#[test]
fn test_stronger_regularisation_shrinks_coefficients() {
    let (x, y) = separable_set();
    let weights = vec![1.0; y.len()];

    let loose = LogisticRegression::default().fit(&x, &y, &weights).unwrap();
    let tight = LogisticRegression {
        c: 0.01,
        ..Default::default()
    }
    .fit(&x, &y, &weights)
    .unwrap();

    assert!(tight.coefficients[0].abs() < loose.coefficients[0].abs());
}

#[test]
fn test_fit_rejects_mismatched_lengths() {
    let (x, y) = separable_set();
    let weights = vec![1.0; 3];

    let err = LogisticRegression::default().fit(&x, &y, &weights).unwrap_err();
    assert!(matches!(err, PipelineError::ModelFit(_)));
}

#[test]
fn test_balanced_class_weights() {
    let weights = balanced_class_weights(&[1, 1, 1, 0]);

    assert!((weights[0] - 4.0 / 6.0).abs() < 1e-12);
    assert!((weights[3] - 2.0).abs() < 1e-12);
    // Each class carries the same total weight
    let ones: f64 = weights[..3].iter().sum();
    assert!((ones - weights[3]).abs() < 1e-12);
}

#[test]
fn test_rank_features_by_absolute_coefficient() {
    let names = vec!["a".to_string(), "b".to_string(), "c".to_string()];

    let ranking = rank_features(&names, &[0.5, -2.0, 1.0]);

    let order: Vec<&str> = ranking.iter().map(|f| f.feature.as_str()).collect();
    assert_eq!(order, vec!["b", "c", "a"]);
    assert_eq!(ranking[0].importance, 2.0);
}

#[test]
fn test_classification_report() {
    let y_true = [1, 1, 0, 0, 1];
    let y_pred = [1, 0, 0, 1, 1];

    let report = ClassificationReport::from_predictions(&y_true, &y_pred);

    assert!((report.accuracy - 0.6).abs() < 1e-12);
    assert_eq!(report.classes.len(), 2);
    assert_eq!(report.classes[0].label, 0);
    assert!((report.classes[0].precision - 0.5).abs() < 1e-12);
    assert!((report.classes[1].recall - 2.0 / 3.0).abs() < 1e-12);
    assert_eq!(report.classes[1].support, 3);
    assert_eq!(report.macro_avg.support, 5);
    assert!((report.weighted_avg.precision - 0.6).abs() < 1e-12);
}

#[test]
fn test_report_zero_division_is_zero() {
    let report = ClassificationReport::from_predictions(&[0, 0], &[0, 1]);

    let positive = &report.classes[1];
    assert_eq!(positive.support, 0);
    assert_eq!(positive.precision, 0.0);
    assert_eq!(positive.recall, 0.0);
    assert_eq!(positive.f1, 0.0);
}

#[test]
fn test_binary_target_validation() {
    let df = df! {
        "ok" => [0i32, 1, 1],
        "bool" => [true, false, true],
        "three" => [0i32, 1, 2],
        "gap" => [Some(0i32), None, Some(1)],
        "text" => ["0", "1", "1"],
    }
    .unwrap();

    assert_eq!(binary_target(&df, "ok").unwrap(), vec![0, 1, 1]);
    assert_eq!(binary_target(&df, "bool").unwrap(), vec![1, 0, 1]);

    for column in ["three", "gap", "text"] {
        let err = binary_target(&df, column).unwrap_err();
        assert!(
            matches!(
                err.downcast_ref::<PipelineError>(),
                Some(PipelineError::InvalidTarget { .. })
            ),
            "{} should be rejected",
            column
        );
    }
}

#[test]
fn test_missing_target_names_the_column() {
    let tables = clean_survey(load_survey_dataframe()).unwrap();

    let err = train_and_evaluate(&tables.encoded, "Shops online", &ModelConfig::default())
        .unwrap_err();

    assert!(err.to_string().contains("Shops online"));
    assert!(matches!(
        err.downcast_ref::<PipelineError>(),
        Some(PipelineError::MissingColumn { column, .. }) if column == "Shops online"
    ));
}

#[test]
fn test_single_class_target_fails_split() {
    let df = df! {
        "target" => [1i32; 10],
        "x" => [1.0f64, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0, 9.0, 10.0],
    }
    .unwrap();

    let err = train_and_evaluate(&df, "target", &ModelConfig::default()).unwrap_err();
    assert!(matches!(
        err.downcast_ref::<PipelineError>(),
        Some(PipelineError::Split(_))
    ));
}

#[test]
fn test_train_and_evaluate_on_survey() {
    let tables = clean_survey(load_survey_dataframe()).unwrap();

    let evaluation =
        train_and_evaluate(&tables.encoded, SURVEY_TARGET, &ModelConfig::default()).unwrap();

    assert_eq!(evaluation.target, SURVEY_TARGET);
    assert_eq!(evaluation.train_rows, 40);
    assert_eq!(evaluation.test_rows, 10);
    assert_eq!(evaluation.class_counts, vec![(0, 20), (1, 30)]);
    assert!(!evaluation.features.contains(&SURVEY_TARGET.to_string()));
    assert_eq!(evaluation.ranking.len(), evaluation.features.len());
    assert_eq!(evaluation.report.macro_avg.support, 10);

    // Satisfaction alone separates the two shopping modes
    assert_eq!(evaluation.ranking[0].feature, "Satisfaction");
    assert!(evaluation.report.accuracy >= 0.9);
}

#[test]
fn test_ranking_is_sorted() {
    let df = create_large_test_dataframe(120, 6, 3);

    let evaluation = train_and_evaluate(&df, "target", &ModelConfig::default()).unwrap();

    assert!(evaluation
        .ranking
        .windows(2)
        .all(|w| w[0].importance >= w[1].importance));
}

//! Integration tests for the three stages run against files on disk

use survey_lens::pipeline::*;
use survey_lens::report::ArtifactStatus;
use survey_lens::stages::{analyzer, cleaner, modeler, run_all};

#[path = "common/mod.rs"]
mod common;

use common::*;

#[test]
fn test_full_run_writes_artifacts() {
    let (temp_dir, csv_path) = create_survey_csv();
    let config = survey_config(&temp_dir, csv_path);

    let outcome = run_all(&config).unwrap();

    for file in [
        RAW_TABLE_FILE,
        ENCODED_TABLE_FILE,
        CORRELATION_MATRIX_FILE,
        SUMMARY_FILE,
        MODEL_REPORT_FILE,
    ] {
        assert!(config.output_path(file).exists(), "{} should be written", file);
    }
    // Charts are disabled by the shared test configuration
    assert!(!config.output_path(CORRELATION_HEATMAP_FILE).exists());

    let summary = outcome.summary();
    assert_eq!(summary.written(), 5);
    assert!(summary
        .artifacts
        .iter()
        .any(|(path, status)| path.ends_with(FEATURE_IMPORTANCE_FILE)
            && matches!(status, ArtifactStatus::Skipped(_))));
}

#[test]
fn test_full_run_renders_charts() {
    let (temp_dir, csv_path) = create_survey_csv();
    let mut config = survey_config(&temp_dir, csv_path);
    config.charts = true;
    config.trend_source = Some(config.raw_table_path());

    let outcome = run_all(&config).unwrap();

    let summary = outcome.summary();
    assert_eq!(summary.artifacts.len(), 9);
    for (path, status) in &summary.artifacts {
        assert!(
            matches!(status, ArtifactStatus::Written),
            "{} was {:?}",
            path.display(),
            status
        );
    }

    for file in [
        PREFERENCE_CHART_FILE,
        CORRELATION_HEATMAP_FILE,
        FEATURE_IMPORTANCE_FILE,
        PURCHASING_BEHAVIOR_FILE,
    ] {
        let size = std::fs::metadata(config.output_path(file)).unwrap().len();
        assert!(size > 0, "{} should not be empty", file);
    }
    assert_eq!(
        outcome.model.enrichment,
        modeler::Enrichment::Rendered(config.output_path(PURCHASING_BEHAVIOR_FILE))
    );
}

#[test]
fn test_clean_from_workbook_matches_csv() {
    let (xlsx_dir, xlsx_path) = create_survey_xlsx();
    let (csv_dir, csv_path) = create_survey_csv();

    let from_xlsx = cleaner::run(&survey_config(&xlsx_dir, xlsx_path)).unwrap();
    let from_csv = cleaner::run(&survey_config(&csv_dir, csv_path)).unwrap();

    assert_eq!(from_xlsx.raw.height(), SURVEY_ROWS);
    assert_eq!(column_names(&from_xlsx.encoded), column_names(&from_csv.encoded));
    assert!(from_xlsx.encoded.equals_missing(&from_csv.encoded));
}

#[test]
fn test_three_column_survey_end_to_end() {
    let temp_dir = tempfile::TempDir::new().unwrap();
    let csv_path = temp_dir.path().join("minimal.csv");
    let mut body = String::from("Timestamp,PreferredMode,Age\n");
    for i in 0..50 {
        let mode = if i % 5 < 3 { "Online" } else { "Offline" };
        let age = if i % 20 == 3 {
            String::new()
        } else {
            (20 + i).to_string()
        };
        body.push_str(&format!("2024-03-01 09:{:02}:00,{},{}\n", i, mode, age));
    }
    std::fs::write(&csv_path, body).unwrap();
    let config = survey_config(&temp_dir, csv_path);

    let cleaned = cleaner::run(&config).unwrap();
    assert!(cleaned.raw.height() <= 50);
    assert_missing_columns(&cleaned.raw, &[TIMESTAMP_COLUMN]);
    let indicators: Vec<String> = column_names(&cleaned.encoded)
        .into_iter()
        .filter(|c| c.starts_with("PreferredMode_"))
        .collect();
    assert_eq!(indicators, vec![SURVEY_TARGET]);

    let model = modeler::run(&config).unwrap();
    let accuracy = model.evaluation.report.accuracy;
    assert!((0.0..=1.0).contains(&accuracy));
    let age = model
        .evaluation
        .ranking
        .iter()
        .find(|f| f.feature == "Age")
        .unwrap();
    assert!(age.importance >= 0.0);
}

#[test]
fn test_stages_run_separately() {
    let (temp_dir, csv_path) = create_survey_csv();
    let config = survey_config(&temp_dir, csv_path);

    let cleaned = cleaner::run(&config).unwrap();
    assert_eq!(cleaned.raw.height(), SURVEY_ROWS);

    let analysis = analyzer::run(&config).unwrap();
    assert_eq!(
        analysis.frequency.counts().unwrap()[0],
        ("Online".to_string(), 30)
    );

    let model = modeler::run(&config).unwrap();
    assert_eq!(model.evaluation.target, SURVEY_TARGET);
}

#[test]
fn test_encoded_table_reads_back_numeric() {
    let (temp_dir, csv_path) = create_survey_csv();
    let config = survey_config(&temp_dir, csv_path);
    cleaner::run(&config).unwrap();

    let encoded = read_dataset(&config.encoded_table_path(), config.infer_schema_length).unwrap();

    assert_shape(&encoded, SURVEY_ROWS, 9);
    assert!(encoded
        .get_columns()
        .iter()
        .all(|col| col.dtype().is_primitive_numeric()));
}

#[test]
fn test_correlation_matrix_file_layout() {
    let (temp_dir, csv_path) = create_survey_csv();
    let config = survey_config(&temp_dir, csv_path);
    cleaner::run(&config).unwrap();
    let analysis = analyzer::run(&config).unwrap();

    let table = read_dataset(&config.output_path(CORRELATION_MATRIX_FILE), 100).unwrap();

    assert_eq!(table.height(), analysis.correlation.len());
    assert_eq!(table.width(), analysis.correlation.len() + 1);
    assert_eq!(column_names(&table)[0], "feature");
}

#[test]
fn test_missing_preference_column_is_not_fatal() {
    let (temp_dir, csv_path) = create_survey_csv();
    let mut config = survey_config(&temp_dir, csv_path);
    config.preference_column = "Which shopping mode do you prefer?".to_string();

    cleaner::run(&config).unwrap();
    let analysis = analyzer::run(&config).unwrap();

    assert!(matches!(analysis.frequency, FrequencyOutcome::Skipped { .. }));
    assert!(config.output_path(CORRELATION_MATRIX_FILE).exists());
}

#[test]
fn test_missing_target_is_fatal() {
    let (temp_dir, csv_path) = create_survey_csv();
    let mut config = survey_config(&temp_dir, csv_path);
    config.target_column = "Buys online".to_string();

    cleaner::run(&config).unwrap();
    let err = modeler::run(&config).unwrap_err();

    assert!(err.to_string().contains("Buys online"));
    assert!(!config.output_path(SUMMARY_FILE).exists());
}

#[test]
fn test_missing_source_is_fatal() {
    let temp_dir = tempfile::TempDir::new().unwrap();
    let config = survey_config(&temp_dir, temp_dir.path().join("absent.csv"));

    assert!(cleaner::run(&config).is_err());
}

#[test]
fn test_trend_enrichment_skips_default_source() {
    let (temp_dir, csv_path) = create_survey_csv();
    let config = survey_config(&temp_dir, csv_path);
    cleaner::run(&config).unwrap();

    match modeler::purchasing_behavior_chart(&config) {
        modeler::Enrichment::Skipped(reason) => {
            assert!(reason.contains(TREND_SOURCE_FILE));
            assert!(reason.contains(RAW_TABLE_FILE));
        }
        other => panic!("expected a skip, got {:?}", other),
    }
}

#[test]
fn test_trend_enrichment_reads_configured_source() {
    let (temp_dir, csv_path) = create_survey_csv();
    let mut config = survey_config(&temp_dir, csv_path);
    config.trend_source = Some(config.raw_table_path());
    cleaner::run(&config).unwrap();

    // With charts off the column is still counted
    match modeler::purchasing_behavior_chart(&config) {
        modeler::Enrichment::Skipped(reason) => {
            assert!(reason.contains("charts disabled"));
            assert!(reason.contains("4 distinct"));
        }
        other => panic!("expected a skip, got {:?}", other),
    }

    config.trend_column = "Nobody asked this".to_string();
    match modeler::purchasing_behavior_chart(&config) {
        modeler::Enrichment::Skipped(reason) => assert!(reason.contains("Nobody asked this")),
        other => panic!("expected a skip, got {:?}", other),
    }
}

#[test]
fn test_model_report_json() {
    let (temp_dir, csv_path) = create_survey_csv();
    let config = survey_config(&temp_dir, csv_path);
    run_all(&config).unwrap();

    let text = std::fs::read_to_string(config.output_path(MODEL_REPORT_FILE)).unwrap();
    let json: serde_json::Value = serde_json::from_str(&text).unwrap();

    assert_eq!(json["metadata"]["target_column"], SURVEY_TARGET);
    assert_eq!(json["metadata"]["seed"], 42);
    assert_eq!(json["summary"]["test_rows"], 10);
    assert!(json["metrics"]["accuracy"].as_f64().unwrap() <= 1.0);
    assert_eq!(json["features"].as_array().unwrap().len(), 8);
}

#[test]
fn test_summary_text_has_results_appendix() {
    let (temp_dir, csv_path) = create_survey_csv();
    let config = survey_config(&temp_dir, csv_path);
    run_all(&config).unwrap();

    let text = std::fs::read_to_string(config.output_path(SUMMARY_FILE)).unwrap();
    assert!(text.contains("### Model Results"));
    assert!(text.contains("Satisfaction"));
}

#[test]
fn test_rerun_overwrites_outputs() {
    let (temp_dir, csv_path) = create_survey_csv();
    let config = survey_config(&temp_dir, csv_path);

    run_all(&config).unwrap();
    let first = std::fs::read_to_string(config.raw_table_path()).unwrap();
    run_all(&config).unwrap();
    let second = std::fs::read_to_string(config.raw_table_path()).unwrap();

    assert_eq!(first, second);
}

//! Shared test utilities and fixture generators

#![allow(dead_code)]

use polars::prelude::*;
use std::path::PathBuf;
use survey_lens::pipeline::PipelineConfig;
use tempfile::TempDir;

/// Rows in the survey fixture, not counting the blank row
pub const SURVEY_ROWS: usize = 50;

pub const SURVEY_TARGET: &str = "PreferredMode_Online";
pub const SURVEY_PREFERENCE: &str = "PreferredMode";
pub const SURVEY_TREND: &str = "Influence";

fn is_online(i: usize) -> bool {
    i % 5 < 3
}

/// Body of a small survey export.
///
/// Characteristics:
/// - `Timestamp`: housekeeping column the cleaner drops
/// - `Age`: numeric, missing for rows 7, 27 and 47
/// - `Satisfaction`: numeric, 4-5 for online shoppers and 1-2 otherwise
/// - `Gender`: Female/Male/Other, unanswered in row 11
/// - `PreferredMode`: Online for 30 rows, Offline for 20
/// - `Influence`: Brand/Price/Quality/Reviews cycling
/// - one completely blank row after row 24
pub fn survey_csv() -> String {
    let genders = ["Female", "Male", "Other"];
    let influences = ["Price", "Quality", "Brand", "Reviews"];

    let mut out = String::from("Timestamp,Age,Satisfaction,Gender,PreferredMode,Influence\n");
    for i in 0..SURVEY_ROWS {
        let age = if i % 20 == 7 {
            String::new()
        } else {
            (18 + i % 40).to_string()
        };
        let satisfaction = if is_online(i) { 4 + i % 2 } else { 1 + i % 2 };
        let gender = if i == 11 { "" } else { genders[i % 3] };
        let mode = if is_online(i) { "Online" } else { "Offline" };
        out.push_str(&format!(
            "2024-03-01 10:{:02}:00,{},{},{},{},{}\n",
            i,
            age,
            satisfaction,
            gender,
            mode,
            influences[i % 4]
        ));
        if i == 24 {
            out.push_str(",,,,,\n");
        }
    }
    out
}

/// Write the survey fixture to a temp directory
pub fn create_survey_csv() -> (TempDir, PathBuf) {
    let temp_dir = TempDir::new().unwrap();
    let csv_path = temp_dir.path().join("responses.csv");
    std::fs::write(&csv_path, survey_csv()).unwrap();
    (temp_dir, csv_path)
}

/// Write the survey fixture as a single-sheet workbook, numbers as numbers
pub fn create_survey_xlsx() -> (TempDir, PathBuf) {
    let temp_dir = TempDir::new().unwrap();
    let xlsx_path = temp_dir.path().join("responses.xlsx");

    let mut workbook = rust_xlsxwriter::Workbook::new();
    let sheet = workbook.add_worksheet();
    for (row, line) in survey_csv().lines().enumerate() {
        for (col, value) in line.split(',').enumerate() {
            let (row, col) = (row as u32, col as u16);
            if value.is_empty() {
                continue;
            }
            match value.parse::<f64>() {
                Ok(number) => sheet.write_number(row, col, number).unwrap(),
                Err(_) => sheet.write_string(row, col, value).unwrap(),
            };
        }
    }
    workbook.save(&xlsx_path).unwrap();
    (temp_dir, xlsx_path)
}

/// Pipeline configuration for the survey fixture, writing under `temp_dir`
pub fn survey_config(temp_dir: &TempDir, input: PathBuf) -> PipelineConfig {
    let mut config = PipelineConfig::new(input, temp_dir.path().join("outputs"));
    config.target_column = SURVEY_TARGET.to_string();
    config.preference_column = SURVEY_PREFERENCE.to_string();
    config.trend_column = SURVEY_TREND.to_string();
    config.charts = false;
    config
}

/// Load the survey fixture the way the cleaner does
pub fn load_survey_dataframe() -> DataFrame {
    let (_temp_dir, csv_path) = create_survey_csv();
    survey_lens::pipeline::read_dataset(&csv_path, 100).unwrap()
}

/// Create a DataFrame with known correlation patterns
pub fn create_correlation_test_dataframe() -> DataFrame {
    df! {
        "a" => [1.0f64, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0, 9.0, 10.0],
        "b" => [2.0f64, 4.0, 6.0, 8.0, 10.0, 12.0, 14.0, 16.0, 18.0, 20.0], // b = 2a
        "c" => [10.0f64, 9.0, 8.0, 7.0, 6.0, 5.0, 4.0, 3.0, 2.0, 1.0], // reversed a
        "d" => [5.0f64, 1.0, 8.0, 2.0, 9.0, 3.0, 7.0, 4.0, 6.0, 0.0],
        "label" => ["x", "y", "x", "y", "x", "y", "x", "y", "x", "y"], // not numeric
    }
    .unwrap()
}

/// Create a wide random DataFrame with a 0/1 `target` column
pub fn create_large_test_dataframe(rows: usize, cols: usize, seed: u64) -> DataFrame {
    use rand::{Rng, SeedableRng};
    let mut rng = rand::rngs::StdRng::seed_from_u64(seed);

    let mut columns: Vec<Column> = Vec::with_capacity(cols + 1);
    let target: Vec<i32> = (0..rows).map(|i| (i % 2) as i32).collect();
    columns.push(Column::new("target".into(), target));

    for i in 0..cols {
        let values: Vec<f64> = (0..rows).map(|_| rng.gen::<f64>()).collect();
        columns.push(Column::new(format!("feature_{}", i).into(), values));
    }

    DataFrame::new(columns).unwrap()
}

/// Create a temporary directory with a test CSV file
pub fn create_temp_csv(df: &mut DataFrame) -> (TempDir, PathBuf) {
    let temp_dir = TempDir::new().unwrap();
    let csv_path = temp_dir.path().join("test_data.csv");

    let mut file = std::fs::File::create(&csv_path).unwrap();
    CsvWriter::new(&mut file).finish(df).unwrap();

    (temp_dir, csv_path)
}

/// Create a temporary directory with a test Parquet file
pub fn create_temp_parquet(df: &mut DataFrame) -> (TempDir, PathBuf) {
    let temp_dir = TempDir::new().unwrap();
    let parquet_path = temp_dir.path().join("test_data.parquet");

    let file = std::fs::File::create(&parquet_path).unwrap();
    ParquetWriter::new(file).finish(df).unwrap();

    (temp_dir, parquet_path)
}

/// Assert that a DataFrame has expected shape
pub fn assert_shape(df: &DataFrame, expected_rows: usize, expected_cols: usize) {
    let (rows, cols) = df.shape();
    assert_eq!(rows, expected_rows, "Row count mismatch: expected {}, got {}", expected_rows, rows);
    assert_eq!(cols, expected_cols, "Column count mismatch: expected {}, got {}", expected_cols, cols);
}

/// Assert that a DataFrame contains specific columns
pub fn assert_has_columns(df: &DataFrame, expected_cols: &[&str]) {
    let actual_cols: Vec<String> = df.get_column_names().iter().map(|s| s.to_string()).collect();
    for col in expected_cols {
        assert!(
            actual_cols.contains(&col.to_string()),
            "Missing expected column: '{}'. Actual columns: {:?}",
            col,
            actual_cols
        );
    }
}

/// Assert that a DataFrame does NOT contain specific columns
pub fn assert_missing_columns(df: &DataFrame, unexpected_cols: &[&str]) {
    let actual_cols: Vec<String> = df.get_column_names().iter().map(|s| s.to_string()).collect();
    for col in unexpected_cols {
        assert!(
            !actual_cols.contains(&col.to_string()),
            "Unexpected column still present: '{}'",
            col
        );
    }
}

/// Values of an integer column as i64, nulls panicking
pub fn int_values(df: &DataFrame, column: &str) -> Vec<i64> {
    df.column(column)
        .unwrap()
        .cast(&DataType::Int64)
        .unwrap()
        .i64()
        .unwrap()
        .into_iter()
        .map(|v| v.unwrap())
        .collect()
}

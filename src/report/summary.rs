//! Console tables for stage results

use comfy_table::{presets::UTF8_FULL_CONDENSED, Attribute, Cell, CellAlignment, Color, Table};
use console::style;
use std::path::PathBuf;

use crate::pipeline::{ClassificationReport, CleaningReport, FeatureImportance};
use crate::utils::truncate_string;

const LABEL_WIDTH: usize = 60;

fn print_section(icon: &str, title: &str) {
    println!();
    println!("    {} {}", style(icon).cyan(), style(title).white().bold());
    println!("    {}", style("─".repeat(50)).dim());
}

fn print_indented(table: &Table) {
    for line in table.to_string().lines() {
        println!("    {}", line);
    }
}

fn header(cells: &[&str]) -> Vec<Cell> {
    cells
        .iter()
        .map(|c| Cell::new(c).add_attribute(Attribute::Bold))
        .collect()
}

/// What happened to one output artifact
#[derive(Debug, Clone, PartialEq)]
pub enum ArtifactStatus {
    Written,
    Skipped(String),
    Failed(String),
}

/// Artifacts written across a run, shown at the end
#[derive(Debug, Clone, Default)]
pub struct RunSummary {
    pub artifacts: Vec<(PathBuf, ArtifactStatus)>,
}

impl RunSummary {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, path: PathBuf, status: ArtifactStatus) {
        self.artifacts.push((path, status));
    }

    pub fn extend(&mut self, other: RunSummary) {
        self.artifacts.extend(other.artifacts);
    }

    pub fn written(&self) -> usize {
        self.artifacts
            .iter()
            .filter(|(_, s)| *s == ArtifactStatus::Written)
            .count()
    }

    pub fn display(&self) {
        print_section("📋", "ARTIFACTS");

        let mut table = Table::new();
        table.load_preset(UTF8_FULL_CONDENSED);
        table.set_header(header(&["File", "Status"]));

        for (path, status) in &self.artifacts {
            let (text, color) = match status {
                ArtifactStatus::Written => ("written".to_string(), Color::Green),
                ArtifactStatus::Skipped(reason) => (format!("skipped: {}", reason), Color::Yellow),
                ArtifactStatus::Failed(reason) => (format!("failed: {}", reason), Color::Red),
            };
            table.add_row(vec![
                Cell::new(path.display()),
                Cell::new(truncate_string(&text, LABEL_WIDTH)).fg(color),
            ]);
        }
        print_indented(&table);
    }
}

/// Cleaning counts and the indicator columns each question produced
pub fn display_cleaning_report(report: &CleaningReport, rows_after: usize, encoded_cols: usize) {
    print_section("🧹", "CLEANING SUMMARY");

    let mut table = Table::new();
    table.load_preset(UTF8_FULL_CONDENSED);
    table.set_header(header(&["Metric", "Value"]));
    table.add_row(vec![Cell::new("Rows loaded"), Cell::new(report.rows_before)]);
    table.add_row(vec![
        Cell::new("Empty rows dropped"),
        Cell::new(report.empty_rows_dropped).fg(if report.empty_rows_dropped == 0 {
            Color::White
        } else {
            Color::Red
        }),
    ]);
    table.add_row(vec![
        Cell::new("Timestamp dropped"),
        Cell::new(if report.timestamp_dropped { "yes" } else { "no" }),
    ]);
    table.add_row(vec![
        Cell::new("Cells filled with sentinel"),
        Cell::new(report.cells_filled),
    ]);
    table.add_row(vec![Cell::new("Rows kept"), Cell::new(rows_after)]);
    table.add_row(vec![
        Cell::new("Encoded columns"),
        Cell::new(encoded_cols)
            .fg(Color::Green)
            .add_attribute(Attribute::Bold),
    ]);
    print_indented(&table);

    if report.encoded_columns.is_empty() {
        return;
    }

    let mut table = Table::new();
    table.load_preset(UTF8_FULL_CONDENSED);
    table.set_header(header(&["Question", "Reference level", "Indicators"]));
    for encoded in &report.encoded_columns {
        table.add_row(vec![
            Cell::new(truncate_string(&encoded.source, LABEL_WIDTH)),
            Cell::new(truncate_string(&encoded.reference, 30)),
            Cell::new(encoded.indicators.len()).set_alignment(CellAlignment::Right),
        ]);
    }
    print_indented(&table);
}

/// Frequency breakdown of one question
pub fn display_frequency_table(column: &str, counts: &[(String, usize)]) {
    print_section("📊", &truncate_string(column, LABEL_WIDTH));

    let total: usize = counts.iter().map(|(_, c)| c).sum();
    let mut table = Table::new();
    table.load_preset(UTF8_FULL_CONDENSED);
    table.set_header(header(&["Response", "Count", "Share"]));
    for (value, count) in counts {
        let share = if total > 0 {
            *count as f64 / total as f64 * 100.0
        } else {
            0.0
        };
        table.add_row(vec![
            Cell::new(truncate_string(value, LABEL_WIDTH)),
            Cell::new(count).set_alignment(CellAlignment::Right),
            Cell::new(format!("{:.1}%", share)).set_alignment(CellAlignment::Right),
        ]);
    }
    print_indented(&table);
}

/// Accuracy and the per-class precision/recall/F1 table
pub fn display_classification_report(report: &ClassificationReport) {
    print_section("🎯", "MODEL PERFORMANCE");
    println!(
        "      Accuracy: {}",
        style(format!("{:.4}", report.accuracy)).green().bold()
    );
    println!();

    let mut table = Table::new();
    table.load_preset(UTF8_FULL_CONDENSED);
    table.set_header(header(&["Class", "Precision", "Recall", "F1", "Support"]));

    let fmt = |v: f64| Cell::new(format!("{:.2}", v)).set_alignment(CellAlignment::Right);
    for class in &report.classes {
        table.add_row(vec![
            Cell::new(class.label),
            fmt(class.precision),
            fmt(class.recall),
            fmt(class.f1),
            Cell::new(class.support).set_alignment(CellAlignment::Right),
        ]);
    }
    for (name, avg) in [("macro avg", &report.macro_avg), ("weighted avg", &report.weighted_avg)] {
        table.add_row(vec![
            Cell::new(name).add_attribute(Attribute::Italic),
            fmt(avg.precision),
            fmt(avg.recall),
            fmt(avg.f1),
            Cell::new(avg.support).set_alignment(CellAlignment::Right),
        ]);
    }
    print_indented(&table);
}

/// The `limit` most influential features
pub fn display_top_features(ranking: &[FeatureImportance], limit: usize) {
    print_section("🔝", "TOP FEATURES");

    let mut table = Table::new();
    table.load_preset(UTF8_FULL_CONDENSED);
    table.set_header(header(&["#", "Feature", "Importance"]));
    for (rank, entry) in ranking.iter().take(limit).enumerate() {
        table.add_row(vec![
            Cell::new(rank + 1),
            Cell::new(truncate_string(&entry.feature, LABEL_WIDTH)),
            Cell::new(format!("{:.4}", entry.importance)).set_alignment(CellAlignment::Right),
        ]);
    }
    print_indented(&table);
}

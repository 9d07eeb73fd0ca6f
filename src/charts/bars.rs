//! Bar charts for value counts and feature importance

use std::path::Path;

use anyhow::Result;
use plotters::prelude::*;

use super::{chart_error, MAX_LABEL_CHARS};
use crate::utils::truncate_string;

/// Direction the bars grow in
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Orientation {
    /// Categories along the x axis
    Vertical,
    /// Categories down the y axis, first entry on top
    Horizontal,
}

/// Labelled values plus captions for one bar chart
#[derive(Debug, Clone)]
pub struct BarChart<'a> {
    pub title: &'a str,
    pub category_label: &'a str,
    pub value_label: &'a str,
    pub orientation: Orientation,
    pub entries: Vec<(String, f64)>,
}

impl<'a> BarChart<'a> {
    /// Chart of value counts, most frequent first
    pub fn from_counts(title: &'a str, category_label: &'a str, counts: &[(String, usize)]) -> Self {
        Self {
            title,
            category_label,
            value_label: "Number of Respondents",
            orientation: Orientation::Vertical,
            entries: counts
                .iter()
                .map(|(label, count)| (label.clone(), *count as f64))
                .collect(),
        }
    }
}

/// Render `chart` to a PNG at `path`
pub fn render_bar_chart(chart: &BarChart<'_>, path: &Path) -> Result<()> {
    let n = chart.entries.len();
    if n == 0 {
        anyhow::bail!("Nothing to plot for '{}'", chart.title);
    }

    let labels: Vec<String> = chart
        .entries
        .iter()
        .map(|(label, _)| truncate_string(label, MAX_LABEL_CHARS))
        .collect();
    let max_value = chart
        .entries
        .iter()
        .map(|(_, v)| *v)
        .fold(0.0_f64, f64::max);
    let upper = if max_value > 0.0 { max_value * 1.1 } else { 1.0 };

    let root = BitMapBackend::new(path, (1000, 600)).into_drawing_area();
    root.fill(&WHITE).map_err(chart_error)?;

    let label_for = |segment: &SegmentValue<usize>| match segment {
        SegmentValue::Exact(i) | SegmentValue::CenterOf(i) => {
            labels.get(*i).cloned().unwrap_or_default()
        }
        SegmentValue::Last => String::new(),
    };

    match chart.orientation {
        Orientation::Vertical => {
            let mut ctx = ChartBuilder::on(&root)
                .caption(chart.title, ("sans-serif", 28))
                .margin(15)
                .x_label_area_size(80)
                .y_label_area_size(60)
                .build_cartesian_2d((0..n).into_segmented(), 0.0..upper)
                .map_err(chart_error)?;

            ctx.configure_mesh()
                .disable_x_mesh()
                .x_desc(chart.category_label)
                .y_desc(chart.value_label)
                .x_labels(n)
                .x_label_formatter(&label_for)
                .draw()
                .map_err(chart_error)?;

            ctx.draw_series(
                Histogram::vertical(&ctx)
                    .style(RGBColor(54, 120, 160).filled())
                    .margin(12)
                    .data(chart.entries.iter().enumerate().map(|(i, (_, v))| (i, *v))),
            )
            .map_err(chart_error)?;
        }
        Orientation::Horizontal => {
            let mut ctx = ChartBuilder::on(&root)
                .caption(chart.title, ("sans-serif", 28))
                .margin(15)
                .x_label_area_size(50)
                .y_label_area_size(260)
                .build_cartesian_2d(0.0..upper, (0..n).into_segmented())
                .map_err(chart_error)?;

            // Largest value on top: entry 0 maps to the highest segment
            let flipped = |segment: &SegmentValue<usize>| match segment {
                SegmentValue::Exact(i) | SegmentValue::CenterOf(i) if *i < n => {
                    labels[n - 1 - *i].clone()
                }
                _ => String::new(),
            };

            ctx.configure_mesh()
                .disable_y_mesh()
                .x_desc(chart.value_label)
                .y_desc(chart.category_label)
                .y_labels(n)
                .y_label_formatter(&flipped)
                .draw()
                .map_err(chart_error)?;

            ctx.draw_series(
                Histogram::horizontal(&ctx)
                    .style(RGBColor(40, 90, 170).filled())
                    .margin(6)
                    .data(
                        chart
                            .entries
                            .iter()
                            .enumerate()
                            .map(|(i, (_, v))| (n - 1 - i, *v)),
                    ),
            )
            .map_err(chart_error)?;
        }
    }

    root.present().map_err(chart_error)?;
    Ok(())
}

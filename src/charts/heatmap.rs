//! Correlation heat-map

use std::path::Path;

use anyhow::Result;
use plotters::prelude::*;

use super::{chart_error, MAX_LABEL_CHARS};
use crate::pipeline::CorrelationMatrix;
use crate::utils::truncate_string;

/// Diverging blue-white-red scale centred on zero; grey marks undefined cells
fn diverging_color(value: f64) -> RGBColor {
    if value.is_nan() {
        return RGBColor(200, 200, 200);
    }
    let v = value.clamp(-1.0, 1.0);
    let fade = |strength: f64| (255.0 * (1.0 - strength)).round() as u8;
    if v >= 0.0 {
        RGBColor(255, fade(v * 0.85), fade(v))
    } else {
        RGBColor(fade(-v), fade(-v * 0.85), 255)
    }
}

/// Feature name for a tick at integer position `index`, or blank between cells
fn tick_label(names: &[String], value: f64) -> String {
    let index = value.round();
    if (value - index).abs() > 1e-6 || index < 0.0 {
        return String::new();
    }
    names.get(index as usize).cloned().unwrap_or_default()
}

/// Render the matrix as a grid of coloured cells, row 0 at the top.
/// Cell `(i, j)` is centred on integer coordinates, so the integer ticks
/// carry the (truncated) feature names.
pub fn render_heatmap(matrix: &CorrelationMatrix, title: &str, path: &Path) -> Result<()> {
    let n = matrix.len();
    if n == 0 {
        anyhow::bail!("Correlation matrix is empty; no numeric columns to plot");
    }

    let names: Vec<String> = matrix
        .columns
        .iter()
        .map(|name| truncate_string(name, MAX_LABEL_CHARS))
        .collect();
    // Row 0 is drawn at the top, so the y axis reads the names bottom up
    let reversed: Vec<String> = names.iter().rev().cloned().collect();

    let root = BitMapBackend::new(path, (1200, 1100)).into_drawing_area();
    root.fill(&WHITE).map_err(chart_error)?;

    let extent = n as f64 - 0.5;
    let mut ctx = ChartBuilder::on(&root)
        .caption(title, ("sans-serif", 28))
        .margin(20)
        .x_label_area_size(220)
        .y_label_area_size(240)
        .build_cartesian_2d(-0.5..extent, -0.5..extent)
        .map_err(chart_error)?;

    let ticks = n.min(40);
    ctx.configure_mesh()
        .disable_mesh()
        .x_labels(ticks)
        .y_labels(ticks)
        .x_label_style(
            ("sans-serif", 12)
                .into_font()
                .transform(FontTransform::Rotate90),
        )
        .y_label_style(("sans-serif", 12))
        .x_label_formatter(&|x| tick_label(&names, *x))
        .y_label_formatter(&|y| tick_label(&reversed, *y))
        .draw()
        .map_err(chart_error)?;

    ctx.draw_series((0..n).flat_map(|i| (0..n).map(move |j| (i, j))).map(|(i, j)| {
        let (x, y) = (j as f64, (n - 1 - i) as f64);
        Rectangle::new(
            [(x - 0.5, y - 0.5), (x + 0.5, y + 0.5)],
            diverging_color(matrix.get(i, j)).filled(),
        )
    }))
    .map_err(chart_error)?;

    root.present().map_err(chart_error)?;
    Ok(())
}

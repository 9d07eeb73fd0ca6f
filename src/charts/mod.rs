//! Chart rendering with plotters
//!
//! Charts are a sink: each function takes a finished table and writes one
//! PNG file. Nothing downstream reads them back.

mod bars;
mod heatmap;

pub use bars::{render_bar_chart, BarChart, Orientation};
pub use heatmap::render_heatmap;

/// Render errors carry backend-specific types; flatten them to text
pub(crate) fn chart_error<E: std::fmt::Display>(err: E) -> anyhow::Error {
    anyhow::anyhow!("Chart rendering failed: {}", err)
}

/// Longest axis label, in characters, before truncation
pub(crate) const MAX_LABEL_CHARS: usize = 32;

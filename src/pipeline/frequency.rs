//! Value-frequency breakdown for a single survey question

use std::collections::HashMap;

use anyhow::Result;
use polars::prelude::*;

use super::loader::column_names;

/// Result of tallying one column
#[derive(Debug, Clone, PartialEq)]
pub enum FrequencyOutcome {
    /// Distinct non-null values with their counts, most frequent first
    Counted(Vec<(String, usize)>),
    /// The column is absent; the breakdown was skipped
    Skipped {
        column: String,
        available: Vec<String>,
    },
}

impl FrequencyOutcome {
    /// Human-readable reason for a skip, listing the columns that do exist
    pub fn skip_message(&self) -> Option<String> {
        match self {
            Self::Counted(_) => None,
            Self::Skipped { column, available } => Some(format!(
                "Column '{}' not found. Available columns: {:?}",
                column, available
            )),
        }
    }

    pub fn counts(&self) -> Option<&[(String, usize)]> {
        match self {
            Self::Counted(counts) => Some(counts),
            Self::Skipped { .. } => None,
        }
    }
}

/// Count occurrences of each distinct value in `column`.
///
/// Nulls are not counted, so the counts sum to the column's non-null rows.
/// Ties keep first-appearance order. A missing column is reported as
/// `FrequencyOutcome::Skipped` rather than an error.
pub fn value_counts(df: &DataFrame, column: &str) -> Result<FrequencyOutcome> {
    let Ok(col) = df.column(column) else {
        return Ok(FrequencyOutcome::Skipped {
            column: column.to_string(),
            available: column_names(df),
        });
    };

    let text = col.cast(&DataType::String)?;
    let mut position: HashMap<String, usize> = HashMap::new();
    let mut counts: Vec<(String, usize)> = Vec::new();

    for value in text.str()?.into_iter().flatten() {
        match position.get(value) {
            Some(&idx) => counts[idx].1 += 1,
            None => {
                position.insert(value.to_string(), counts.len());
                counts.push((value.to_string(), 1));
            }
        }
    }

    // Stable sort keeps first-appearance order among equal counts
    counts.sort_by(|a, b| b.1.cmp(&a.1));

    Ok(FrequencyOutcome::Counted(counts))
}

//! One-hot encoding of categorical survey columns

use std::collections::BTreeSet;

use anyhow::{Context, Result};
use polars::prelude::*;

/// How a column is treated by cleaning and encoding
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnKind {
    /// Integer or float values, kept as-is
    Numeric,
    /// True/false values, encoded as 0/1
    Boolean,
    /// Free-text or choice answers, expanded into indicators
    Categorical,
    /// No observed value at all; carried as an all-null numeric column
    Empty,
}

/// Classify a column by dtype and content
pub fn column_kind(col: &Column) -> ColumnKind {
    let dtype = col.dtype();
    if dtype.is_primitive_numeric() {
        ColumnKind::Numeric
    } else if matches!(dtype, DataType::Boolean) {
        ColumnKind::Boolean
    } else if matches!(dtype, DataType::Null) || col.null_count() == col.len() {
        ColumnKind::Empty
    } else {
        ColumnKind::Categorical
    }
}

/// Names of the columns that will be expanded into indicators
pub fn categorical_columns(df: &DataFrame) -> Vec<String> {
    df.get_columns()
        .iter()
        .filter(|col| column_kind(col) == ColumnKind::Categorical)
        .map(|col| col.name().to_string())
        .collect()
}

/// Indicator columns produced from one categorical source column
#[derive(Debug, Clone, PartialEq)]
pub struct EncodedColumn {
    pub source: String,
    /// Lexicographically first category, represented by all-zero indicators
    pub reference: String,
    pub indicators: Vec<String>,
}

/// Indicator column name for one category of a source column
pub fn indicator_name(source: &str, category: &str) -> String {
    format!("{}_{}", source, category)
}

/// Expand every categorical column into binary indicator columns.
///
/// Categories are sorted and the first one is dropped as the reference level,
/// so a column with k distinct values yields k-1 `Int32` columns of 0/1.
/// Non-categorical columns keep their order and come first; indicator columns
/// follow in source-column order. Boolean columns become 0/1 and empty
/// columns become all-null `Float64`. A null categorical cell sets no
/// indicator.
pub fn one_hot_encode(df: &DataFrame) -> Result<(DataFrame, Vec<EncodedColumn>)> {
    let mut kept: Vec<Column> = Vec::new();
    let mut indicators: Vec<Column> = Vec::new();
    let mut encoded = Vec::new();

    for col in df.get_columns() {
        match column_kind(col) {
            ColumnKind::Numeric => kept.push(col.clone()),
            ColumnKind::Boolean => kept.push(col.cast(&DataType::Int32)?),
            ColumnKind::Empty => kept.push(col.cast(&DataType::Float64)?),
            ColumnKind::Categorical => {
                let (columns, info) = encode_categorical(col)?;
                indicators.extend(columns);
                encoded.push(info);
            }
        }
    }

    kept.extend(indicators);
    let df = DataFrame::new(kept).context("Encoded columns clash with an existing column name")?;
    Ok((df, encoded))
}

fn encode_categorical(col: &Column) -> Result<(Vec<Column>, EncodedColumn)> {
    let source = col.name().to_string();
    let as_text = col.cast(&DataType::String)?;
    let values: Vec<Option<&str>> = as_text.str()?.into_iter().collect();

    let categories: BTreeSet<&str> = values.iter().flatten().copied().collect();
    let mut categories = categories.into_iter();
    let reference = categories.next().unwrap_or_default().to_string();

    let mut columns = Vec::new();
    let mut names = Vec::new();
    for category in categories {
        let name = indicator_name(&source, category);
        let flags: Vec<i32> = values
            .iter()
            .map(|v| i32::from(*v == Some(category)))
            .collect();
        columns.push(Column::new(name.as_str().into(), flags));
        names.push(name);
    }

    Ok((
        columns,
        EncodedColumn {
            source,
            reference,
            indicators: names,
        },
    ))
}

//! Survey cleaning: housekeeping column, empty rows and unanswered questions

use anyhow::Result;
use polars::prelude::*;

use super::config::{NO_RESPONSE, TIMESTAMP_COLUMN};
use super::encoding::{column_kind, one_hot_encode, ColumnKind, EncodedColumn};

/// What the cleaner changed, for reporting
#[derive(Debug, Clone, Default)]
pub struct CleaningReport {
    pub rows_before: usize,
    pub columns_before: usize,
    pub timestamp_dropped: bool,
    pub empty_rows_dropped: usize,
    /// Categorical cells that were filled with the sentinel
    pub cells_filled: usize,
    pub encoded_columns: Vec<EncodedColumn>,
}

/// Output of the cleaner: the readable table and its numeric encoding
#[derive(Debug, Clone)]
pub struct CleanedTables {
    pub raw: DataFrame,
    pub encoded: DataFrame,
    pub report: CleaningReport,
}

/// Drop the `Timestamp` column if the export carries one
pub fn drop_timestamp(df: DataFrame) -> Result<(DataFrame, bool)> {
    let has_timestamp = df
        .get_column_names()
        .iter()
        .any(|name| name.as_str() == TIMESTAMP_COLUMN);

    if has_timestamp {
        Ok((df.drop(TIMESTAMP_COLUMN)?, true))
    } else {
        Ok((df, false))
    }
}

/// Drop rows in which every cell is null, returning how many were removed
pub fn drop_empty_rows(df: &DataFrame) -> Result<(DataFrame, usize)> {
    let height = df.height();
    if height == 0 || df.width() == 0 {
        return Ok((df.clone(), 0));
    }

    let mut keep = vec![false; height];
    for col in df.get_columns() {
        let nulls = col.as_materialized_series().is_null();
        for (row, is_null) in nulls.into_iter().enumerate() {
            if is_null == Some(false) {
                keep[row] = true;
            }
        }
    }

    let dropped = keep.iter().filter(|&&k| !k).count();
    if dropped == 0 {
        return Ok((df.clone(), 0));
    }

    let mask = BooleanChunked::from_slice("keep".into(), &keep);
    Ok((df.filter(&mask)?, dropped))
}

/// Replace nulls in categorical columns with `sentinel`.
///
/// Returns the filled table and the number of cells that changed. Numeric,
/// boolean and entirely empty columns are left untouched.
pub fn fill_missing_categorical(df: &DataFrame, sentinel: &str) -> Result<(DataFrame, usize)> {
    let mut filled = 0;
    let mut columns = Vec::with_capacity(df.width());

    for col in df.get_columns() {
        if column_kind(col) != ColumnKind::Categorical {
            columns.push(col.clone());
            continue;
        }

        let text = col.cast(&DataType::String)?;
        filled += text.null_count();
        let values: Vec<&str> = text
            .str()?
            .into_iter()
            .map(|v| v.unwrap_or(sentinel))
            .collect();
        columns.push(Column::new(col.name().clone(), values));
    }

    Ok((DataFrame::new(columns)?, filled))
}

/// Run the full cleaning pass over a freshly loaded survey table
pub fn clean_survey(df: DataFrame) -> Result<CleanedTables> {
    let (rows_before, columns_before) = df.shape();

    let (df, timestamp_dropped) = drop_timestamp(df)?;
    let (df, empty_rows_dropped) = drop_empty_rows(&df)?;
    let (raw, cells_filled) = fill_missing_categorical(&df, NO_RESPONSE)?;
    let (encoded, encoded_columns) = one_hot_encode(&raw)?;

    Ok(CleanedTables {
        raw,
        encoded,
        report: CleaningReport {
            rows_before,
            columns_before,
            timestamp_dropped,
            empty_rows_dropped,
            cells_filled,
            encoded_columns,
        },
    })
}

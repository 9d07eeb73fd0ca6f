//! Spreadsheet reader: first worksheet of an xlsx/xls export into a DataFrame

use std::path::Path;

use anyhow::{Context, Result};
use calamine::{open_workbook_auto, Data, Range, Reader};
use polars::prelude::*;

/// One non-empty cell, already classified
enum Cell {
    Int(i64),
    Float(f64),
    Text(String),
}

fn classify(cell: &Data) -> Option<Cell> {
    match cell {
        Data::Int(i) => Some(Cell::Int(*i)),
        Data::Float(f) => Some(Cell::Float(*f)),
        Data::String(s) if s.trim().is_empty() => None,
        Data::String(s) => Some(Cell::Text(s.clone())),
        Data::Bool(b) => Some(Cell::Text(b.to_string())),
        Data::DateTime(dt) => Some(Cell::Float(dt.as_f64())),
        Data::DateTimeIso(s) | Data::DurationIso(s) => Some(Cell::Text(s.clone())),
        // Error cells (#N/A, #DIV/0!) and blanks are missing answers
        _ => None,
    }
}

fn header_name(cell: Option<&Data>, index: usize) -> String {
    match cell.and_then(classify) {
        Some(Cell::Text(s)) => s.trim().to_string(),
        Some(Cell::Int(i)) => i.to_string(),
        Some(Cell::Float(f)) => f.to_string(),
        None => format!("column_{}", index + 1),
    }
}

/// Build one typed column: Int64 when every value is a whole number,
/// Float64 when every value is numeric, String otherwise. Blanks are null.
fn build_column(name: &str, cells: Vec<Option<Cell>>) -> Column {
    let all_numeric = cells
        .iter()
        .flatten()
        .all(|c| matches!(c, Cell::Int(_) | Cell::Float(_)));

    if all_numeric {
        let values: Vec<Option<f64>> = cells
            .iter()
            .map(|c| match c {
                Some(Cell::Int(i)) => Some(*i as f64),
                Some(Cell::Float(f)) => Some(*f),
                _ => None,
            })
            .collect();
        let integral = values
            .iter()
            .flatten()
            .all(|v| v.fract() == 0.0 && v.abs() < i64::MAX as f64);
        if integral {
            let ints: Vec<Option<i64>> = values.iter().map(|v| v.map(|v| v as i64)).collect();
            return Column::new(name.into(), ints);
        }
        return Column::new(name.into(), values);
    }

    let text: Vec<Option<String>> = cells
        .into_iter()
        .map(|c| match c {
            Some(Cell::Text(s)) => Some(s),
            Some(Cell::Int(i)) => Some(i.to_string()),
            Some(Cell::Float(f)) => Some(f.to_string()),
            None => None,
        })
        .collect();
    Column::new(name.into(), text)
}

fn range_to_dataframe(range: &Range<Data>) -> Result<DataFrame> {
    let mut rows = range.rows();
    let Some(header) = rows.next() else {
        return Ok(DataFrame::empty());
    };
    let names: Vec<String> = (0..range.width())
        .map(|i| header_name(header.get(i), i))
        .collect();

    let mut cells: Vec<Vec<Option<Cell>>> = names.iter().map(|_| Vec::new()).collect();
    for row in rows {
        for (i, column) in cells.iter_mut().enumerate() {
            column.push(row.get(i).and_then(classify));
        }
    }

    let columns: Vec<Column> = names
        .iter()
        .zip(cells)
        .map(|(name, values)| build_column(name, values))
        .collect();
    DataFrame::new(columns).context("Failed to assemble worksheet columns")
}

/// Read the first worksheet of a workbook, using its first row as the header
pub fn read_workbook(path: &Path) -> Result<DataFrame> {
    let mut workbook = open_workbook_auto(path)
        .with_context(|| format!("Failed to open workbook: {}", path.display()))?;
    let range = workbook
        .worksheet_range_at(0)
        .with_context(|| format!("Workbook has no worksheets: {}", path.display()))?
        .with_context(|| format!("Failed to read first worksheet: {}", path.display()))?;
    range_to_dataframe(&range)
}

//! Spreadsheet reader
//!
//! Loads a whole sheet into memory as [`SourceRow`]s. Workbooks
//! (`.xlsx`, `.xlsm`, `.xlsb`, `.xls`, `.ods`) are read with calamine,
//! `.csv` files with the csv crate.
//!
//! **Row numbering:** rows carry their 1-based sheet row number so journal
//! entries point back at the line an operator would look at. With headers
//! enabled the first data row is row 2. Fully blank rows are skipped but do
//! not shift the numbering of later rows.
//!
//! **Cell values:** workbook cells keep their type (numbers stay numbers,
//! date cells become `YYYY-MM-DD` text). CSV cells are always text and are
//! passed through verbatim, so `00123` or `20.50` arrive unchanged.

use crate::error::{MigrateError, MigrateResult};
use crate::models::{RawRow, SourceRow};
use calamine::{open_workbook_auto, Data, ExcelDateTime, Reader};
use chrono::Timelike;
use serde_json::{Number, Value};
use std::collections::HashSet;
use std::path::Path;

/// Reader options
#[derive(Debug, Clone)]
pub struct ReaderOptions {
    /// Treat the first non-blank row as the header row
    pub has_headers: bool,
    /// Worksheet to read; defaults to the first sheet
    pub sheet: Option<String>,
}

impl Default for ReaderOptions {
    fn default() -> Self {
        Self {
            has_headers: true,
            sheet: None,
        }
    }
}

/// Read every data row of a spreadsheet file
pub fn read_rows(path: &Path, options: &ReaderOptions) -> MigrateResult<Vec<SourceRow>> {
    if !path.exists() {
        return Err(MigrateError::Read(format!(
            "source file not found: {}",
            path.display()
        )));
    }

    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase())
        .unwrap_or_default();

    let rows = match extension.as_str() {
        "csv" => read_csv(path, options)?,
        "xlsx" | "xlsm" | "xlsb" | "xls" | "ods" => read_workbook(path, options)?,
        other => {
            return Err(MigrateError::Read(format!(
                "unsupported spreadsheet format '{}': {}",
                other,
                path.display()
            )))
        }
    };

    tracing::info!(
        file = %path.display(),
        rows = rows.len(),
        "Loaded source rows"
    );

    Ok(rows)
}

fn read_workbook(path: &Path, options: &ReaderOptions) -> MigrateResult<Vec<SourceRow>> {
    let read_error = |e: calamine::Error| MigrateError::Read(format!("{}: {}", path.display(), e));

    let mut workbook = open_workbook_auto(path).map_err(read_error)?;

    let sheet_name = match &options.sheet {
        Some(name) => name.clone(),
        None => workbook.sheet_names().first().cloned().ok_or_else(|| {
            MigrateError::Read(format!("{}: workbook has no sheets", path.display()))
        })?,
    };

    let range = workbook.worksheet_range(&sheet_name).map_err(read_error)?;

    // Range coordinates are 0-based and start at the first used cell
    let first_row = range.start().map(|(row, _)| row as usize).unwrap_or(0);

    let cells = range
        .rows()
        .enumerate()
        .map(|(index, row)| (first_row + index + 1, row.iter().map(workbook_cell).collect()));

    Ok(assemble_rows(cells, options.has_headers))
}

fn read_csv(path: &Path, options: &ReaderOptions) -> MigrateResult<Vec<SourceRow>> {
    let read_error = |e: csv::Error| MigrateError::Read(format!("{}: {}", path.display(), e));

    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_path(path)
        .map_err(read_error)?;

    let mut cells = Vec::new();
    for (index, record) in reader.records().enumerate() {
        let record = record.map_err(read_error)?;
        let line = record
            .position()
            .map(|p| p.line() as usize)
            .unwrap_or(index + 1);
        cells.push((line, record.iter().map(csv_cell).collect::<Vec<_>>()));
    }

    Ok(assemble_rows(cells, options.has_headers))
}

/// Turn positioned cell rows into keyed source rows
fn assemble_rows<I>(cells: I, has_headers: bool) -> Vec<SourceRow>
where
    I: IntoIterator<Item = (usize, Vec<Option<Value>>)>,
{
    let mut headers: Option<Vec<String>> = None;
    let mut rows = Vec::new();

    for (row_number, values) in cells {
        if values.iter().all(Option::is_none) {
            continue;
        }

        if has_headers && headers.is_none() {
            headers = Some(header_names(&values));
            continue;
        }

        let mut data = RawRow::new();
        for (column, value) in values.into_iter().enumerate() {
            let Some(value) = value else { continue };
            let key = match &headers {
                Some(names) => match names.get(column) {
                    Some(name) => name.clone(),
                    None => column_letter(column),
                },
                None => column_letter(column),
            };
            data.insert(key, value);
        }

        rows.push(SourceRow::new(row_number, data));
    }

    rows
}

/// Header cell texts; blank headers become `__EMPTY`, duplicates get a suffix
fn header_names(values: &[Option<Value>]) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut names = Vec::with_capacity(values.len());

    for value in values {
        let base = match value {
            Some(Value::String(s)) => s.clone(),
            Some(other) => crate::services::row_normalizer::value_to_string(other),
            None => "__EMPTY".to_string(),
        };

        let mut name = base.clone();
        let mut suffix = 1;
        while !seen.insert(name.clone()) {
            name = format!("{}_{}", base, suffix);
            suffix += 1;
        }
        names.push(name);
    }

    names
}

/// Spreadsheet-style column name: 0 → A, 25 → Z, 26 → AA
fn column_letter(index: usize) -> String {
    let mut n = index + 1;
    let mut name = Vec::new();
    while n > 0 {
        let rem = (n - 1) % 26;
        name.push(b'A' + rem as u8);
        n = (n - 1) / 26;
    }
    name.reverse();
    String::from_utf8_lossy(&name).into_owned()
}

fn workbook_cell(cell: &Data) -> Option<Value> {
    match cell {
        Data::Empty | Data::Error(_) => None,
        Data::String(s) if s.is_empty() => None,
        Data::String(s) => Some(Value::String(s.clone())),
        Data::Int(i) => Some(Value::from(*i)),
        Data::Float(f) => Number::from_f64(*f).map(Value::Number),
        Data::Bool(b) => Some(Value::Bool(*b)),
        Data::DateTime(dt) => datetime_cell(dt),
        Data::DateTimeIso(s) | Data::DurationIso(s) => Some(Value::String(s.clone())),
    }
}

/// Date cells as the sheet shows them (`2023-03-15`, or with a time part
/// when it is not midnight). Durations keep their serial value.
fn datetime_cell(dt: &ExcelDateTime) -> Option<Value> {
    if dt.is_datetime() {
        if let Some(value) = dt.as_datetime() {
            let text = if value.time().num_seconds_from_midnight() == 0 {
                value.format("%Y-%m-%d").to_string()
            } else {
                value.format("%Y-%m-%d %H:%M:%S").to_string()
            };
            return Some(Value::String(text));
        }
    }
    Number::from_f64(dt.as_f64()).map(Value::Number)
}

/// CSV cells are text; they are kept exactly as written
fn csv_cell(text: &str) -> Option<Value> {
    if text.is_empty() {
        None
    } else {
        Some(Value::String(text.to_string()))
    }
}

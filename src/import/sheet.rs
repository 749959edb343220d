//! Spreadsheet reading
//!
//! Workbooks (`.xlsx`, `.xls`, `.xlsb`, `.ods`) are read through calamine,
//! first sheet only. `.csv` files are read with the csv crate and yield text
//! cells. Either way the result is a list of `RawRow`s numbered the way a
//! clerk sees them in the spreadsheet: 1-based.

use std::path::Path;

use calamine::{open_workbook_auto, Data, Reader};
use chrono::{Days, NaiveDate};
use tracing::debug;

use crate::error::{FinregError, FinregResult};
use crate::models::{Cell, RawRow};

/// Read the data rows of a spreadsheet, skipping everything before
/// `start_row` (1-based)
pub fn read_rows(path: &Path, start_row: usize) -> FinregResult<Vec<RawRow>> {
    if !path.is_file() {
        return Err(FinregError::Spreadsheet(format!(
            "file not found: {}",
            path.display()
        )));
    }

    let extension = path
        .extension()
        .and_then(|s| s.to_str())
        .unwrap_or_default()
        .to_ascii_lowercase();

    let rows = match extension.as_str() {
        "csv" => read_csv_rows(path)?,
        "xlsx" | "xlsm" | "xls" | "xlsb" | "ods" => read_workbook_rows(path)?,
        other => {
            return Err(FinregError::Spreadsheet(format!(
                "unsupported file type '.{}' (expected .xlsx, .xls, .ods or .csv)",
                other
            )))
        }
    };

    let rows: Vec<RawRow> = rows
        .into_iter()
        .filter(|row| row.row_index >= start_row)
        .collect();
    debug!(path = %path.display(), rows = rows.len(), start_row, "spreadsheet read");
    Ok(rows)
}

fn read_csv_rows(path: &Path) -> FinregResult<Vec<RawRow>> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_path(path)?;

    let mut rows = Vec::new();
    for (i, record) in reader.records().enumerate() {
        let record = record?;
        let cells = record.iter().map(Cell::from).collect();
        rows.push(RawRow::new(i + 1, cells));
    }
    Ok(rows)
}

fn read_workbook_rows(path: &Path) -> FinregResult<Vec<RawRow>> {
    let mut workbook = open_workbook_auto(path)?;
    let sheet_names = workbook.sheet_names().to_owned();
    let first_sheet = sheet_names
        .first()
        .cloned()
        .ok_or_else(|| FinregError::Spreadsheet("workbook has no sheets".into()))?;

    let range = workbook.worksheet_range(&first_sheet)?;

    // a range starts at its first used cell, not at A1
    let (first_row, first_col) = range
        .start()
        .map(|(r, c)| (r as usize, c as usize))
        .unwrap_or((0, 0));

    let rows = range
        .rows()
        .enumerate()
        .map(|(i, data)| {
            let mut cells = vec![Cell::Empty; first_col];
            cells.extend(data.iter().map(cell_from_data));
            RawRow::new(first_row + i + 1, cells)
        })
        .collect();
    Ok(rows)
}

/// Convert a calamine cell
pub fn cell_from_data(data: &Data) -> Cell {
    match data {
        Data::Empty => Cell::Empty,
        Data::String(s) => Cell::from(s.as_str()),
        Data::Float(f) => Cell::Number(*f),
        Data::Int(i) => Cell::Number(*i as f64),
        Data::Bool(b) => Cell::Bool(*b),
        Data::DateTime(dt) => {
            let serial = dt.as_f64();
            excel_serial_date(serial)
                .map(Cell::Date)
                .unwrap_or(Cell::Number(serial))
        }
        Data::DateTimeIso(s) => s
            .get(..10)
            .and_then(|d| NaiveDate::parse_from_str(d, "%Y-%m-%d").ok())
            .map(Cell::Date)
            .unwrap_or_else(|| Cell::from(s.as_str())),
        Data::DurationIso(s) => Cell::from(s.as_str()),
        Data::Error(e) => Cell::Text(format!("#{:?}", e)),
    }
}

/// Day part of an Excel serial date (1900 date system)
pub fn excel_serial_date(serial: f64) -> Option<NaiveDate> {
    if !serial.is_finite() || serial < 1.0 {
        return None;
    }
    // day 60 is the nonexistent 29.02.1900; counting from 30.12.1899 is
    // right for every date after it
    let epoch = NaiveDate::from_ymd_opt(1899, 12, 30)?;
    epoch.checked_add_days(Days::new(serial.floor() as u64))
}

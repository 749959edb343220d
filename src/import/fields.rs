//! Typed extraction of positional cells
//!
//! Every failure here is a `RowFormat` error naming the column.

use chrono::NaiveDate;

use crate::error::ImportError;
use crate::models::{Cell, Money, RawRow};

/// Cell values that mark a cancelled registration number
const CANCELLED_MARKERS: &[&str] = &["numar anulat", "număr anulat", "anulat"];

pub fn is_cancelled_marker(cell: &Cell) -> bool {
    let text = cell.text().to_lowercase();
    CANCELLED_MARKERS.contains(&text.as_str())
}

pub fn registration_number(row: &RawRow, column: usize) -> Result<i64, ImportError> {
    let invalid = || {
        ImportError::row_format(
            row.row_index,
            format!("invalid registration number '{}'", row.text(column)),
        )
    };
    let number = match row.cell(column) {
        Cell::Number(n) if n.fract() == 0.0 && n.is_finite() => *n as i64,
        Cell::Text(s) => s.trim().parse::<i64>().map_err(|_| invalid())?,
        _ => return Err(invalid()),
    };
    if number <= 0 {
        return Err(invalid());
    }
    Ok(number)
}

pub fn date(row: &RawRow, column: usize, format: &str, what: &str) -> Result<NaiveDate, ImportError> {
    match row.cell(column) {
        Cell::Date(d) => Ok(*d),
        Cell::Text(s) => NaiveDate::parse_from_str(s.trim(), format).map_err(|_| {
            ImportError::row_format(row.row_index, format!("invalid {} '{}'", what, s.trim()))
        }),
        Cell::Empty => Err(ImportError::row_format(
            row.row_index,
            format!("missing {}", what),
        )),
        other => Err(ImportError::row_format(
            row.row_index,
            format!("invalid {} '{}'", what, other.text()),
        )),
    }
}

/// A date cell that may be left blank
pub fn optional_date(
    row: &RawRow,
    column: usize,
    format: &str,
    what: &str,
) -> Result<Option<NaiveDate>, ImportError> {
    if row.is_blank(column) {
        return Ok(None);
    }
    date(row, column, format, what).map(Some)
}

pub fn money(row: &RawRow, column: usize) -> Result<Money, ImportError> {
    let parsed = match row.cell(column) {
        Cell::Number(n) => Money::from_f64(*n),
        Cell::Text(s) if !s.trim().is_empty() => Money::parse(s),
        _ => {
            return Err(ImportError::row_format(row.row_index, "missing value"));
        }
    };
    parsed.map_err(|e| ImportError::row_format(row.row_index, e.to_string()))
}

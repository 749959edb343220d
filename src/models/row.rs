//! Raw spreadsheet rows
//!
//! A `RawRow` is what the sheet reader hands to the row parsers: positional
//! untyped cells plus the 1-based row number used in error messages.

use chrono::NaiveDate;
use std::fmt;

/// An untyped spreadsheet cell
#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    Empty,
    Text(String),
    Number(f64),
    Bool(bool),
    Date(NaiveDate),
}

impl Cell {
    /// Blank cells are empty or whitespace-only text
    pub fn is_blank(&self) -> bool {
        match self {
            Cell::Empty => true,
            Cell::Text(s) => s.trim().is_empty(),
            _ => false,
        }
    }

    /// The cell rendered as trimmed text; empty string for blank cells
    pub fn text(&self) -> String {
        match self {
            Cell::Empty => String::new(),
            Cell::Text(s) => s.trim().to_string(),
            Cell::Number(n) => n.to_string(),
            Cell::Bool(b) => b.to_string(),
            Cell::Date(d) => d.format("%d.%m.%Y").to_string(),
        }
    }

    /// The cell as text, or None when blank
    pub fn presence(&self) -> Option<String> {
        if self.is_blank() {
            None
        } else {
            Some(self.text())
        }
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.text())
    }
}

impl From<&str> for Cell {
    fn from(s: &str) -> Self {
        if s.is_empty() {
            Cell::Empty
        } else {
            Cell::Text(s.to_string())
        }
    }
}

impl From<String> for Cell {
    fn from(s: String) -> Self {
        Cell::from(s.as_str())
    }
}

impl From<f64> for Cell {
    fn from(n: f64) -> Self {
        Cell::Number(n)
    }
}

impl From<i64> for Cell {
    fn from(n: i64) -> Self {
        Cell::Number(n as f64)
    }
}

impl From<NaiveDate> for Cell {
    fn from(d: NaiveDate) -> Self {
        Cell::Date(d)
    }
}

static EMPTY: Cell = Cell::Empty;

/// One spreadsheet row; never persisted
#[derive(Debug, Clone, PartialEq)]
pub struct RawRow {
    /// 1-based row number in the sheet
    pub row_index: usize,
    pub cells: Vec<Cell>,
}

impl RawRow {
    pub fn new(row_index: usize, cells: Vec<Cell>) -> Self {
        Self { row_index, cells }
    }

    /// Cell at a column; columns past the end of the row read as empty
    pub fn cell(&self, column: usize) -> &Cell {
        self.cells.get(column).unwrap_or(&EMPTY)
    }

    pub fn text(&self, column: usize) -> String {
        self.cell(column).text()
    }

    pub fn is_blank(&self, column: usize) -> bool {
        self.cell(column).is_blank()
    }

    pub fn set(&mut self, column: usize, cell: Cell) {
        if self.cells.len() <= column {
            self.cells.resize(column + 1, Cell::Empty);
        }
        self.cells[column] = cell;
    }
}

/// Build a row from anything convertible to cells (tests and CSV input)
#[macro_export]
macro_rules! raw_row {
    ($index:expr; $($cell:expr),* $(,)?) => {
        $crate::models::RawRow::new($index, vec![$($crate::models::Cell::from($cell)),*])
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_number_text_drops_trailing_zero() {
        assert_eq!(Cell::Number(1.0).text(), "1");
        assert_eq!(Cell::Number(59.4).text(), "59.4");
        assert_eq!(Cell::Number(10.01).text(), "10.01");
    }

    #[test]
    fn test_blank_detection() {
        assert!(Cell::Empty.is_blank());
        assert!(Cell::Text("   ".into()).is_blank());
        assert!(!Cell::Number(0.0).is_blank());
        assert_eq!(Cell::Text("  x ".into()).presence(), Some("x".into()));
    }

    #[test]
    fn test_out_of_range_cells_are_empty() {
        let row = raw_row![4; "a", 2.5];
        assert_eq!(row.text(0), "a");
        assert_eq!(row.text(1), "2.5");
        assert_eq!(row.cell(14), &Cell::Empty);
        assert!(row.is_blank(9));
    }

    #[test]
    fn test_set_extends_row() {
        let mut row = raw_row![1; "a"];
        row.set(3, Cell::from("d"));
        assert_eq!(row.cells.len(), 4);
        assert_eq!(row.text(3), "d");
        assert!(row.is_blank(2));
    }

    #[test]
    fn test_date_cell_text() {
        let date = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();
        assert_eq!(Cell::Date(date).text(), "01.03.2024");
    }
}

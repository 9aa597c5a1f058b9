//! Document collaborator contract.
//!
//! The engine reads and annotates tabular documents through [`TableDocument`].
//! Adapters own parsing and persistence; the engine owns matching semantics.

use std::fmt;

/// A single cell's scalar content.
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    Blank,
    Number(f64),
    Text(String),
    Bool(bool),
}

impl Default for CellValue {
    fn default() -> Self {
        Self::Blank
    }
}

impl CellValue {
    /// Blank cells and empty text both count as absent.
    pub fn is_blank(&self) -> bool {
        match self {
            Self::Blank => true,
            Self::Text(s) => s.is_empty(),
            _ => false,
        }
    }

    /// Numeric content, if any. Text and booleans do not coerce.
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Self::Number(n) => Some(*n),
            _ => None,
        }
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Blank => Ok(()),
            Self::Number(n) => f.write_str(&format_number(*n)),
            Self::Text(s) => f.write_str(s),
            Self::Bool(b) => f.write_str(if *b { "TRUE" } else { "FALSE" }),
        }
    }
}

/// Integral values render without a fractional part (`10`, not `10.0`).
/// The 1e15 bound keeps the integer cast exact.
pub fn format_number(n: f64) -> String {
    if n.fract() == 0.0 && n.abs() < 1e15 {
        format!("{}", n as i64)
    } else {
        format!("{}", n)
    }
}

/// Read/annotate access to one open tabular document.
///
/// Rows and columns are 1-based. Reads outside the occupied area return
/// [`CellValue::Blank`]; writes and column inserts mutate in place.
/// Persistence is not part of this contract and stays with the adapter.
pub trait TableDocument {
    fn sheet_count(&self) -> usize;

    /// Sheet name at a 0-based position, in document order.
    fn sheet_name(&self, sheet: usize) -> Option<&str>;

    /// Inclusive occupied row extent; 0 for an empty sheet.
    fn last_row(&self, sheet: usize) -> u32;

    /// Inclusive occupied column extent; 0 for an empty sheet.
    fn last_column(&self, sheet: usize) -> u32;

    fn read_cell(&self, sheet: usize, row: u32, column: u32) -> CellValue;

    /// One full row left to right through the last column. Used for headers.
    fn read_row(&self, sheet: usize, row: u32) -> Vec<CellValue> {
        (1..=self.last_column(sheet))
            .map(|column| self.read_cell(sheet, row, column))
            .collect()
    }

    /// Writing [`CellValue::Blank`] clears the cell.
    fn write_cell(&mut self, sheet: usize, row: u32, column: u32, value: CellValue);

    /// Insert a blank column, shifting columns at or after `at` right by one.
    fn insert_column(&mut self, sheet: usize, at: u32);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blankness() {
        assert!(CellValue::Blank.is_blank());
        assert!(CellValue::Text(String::new()).is_blank());
        assert!(!CellValue::Text(" ".into()).is_blank());
        assert!(!CellValue::Number(0.0).is_blank());
        assert!(!CellValue::Bool(false).is_blank());
    }

    #[test]
    fn numeric_coercion() {
        assert_eq!(CellValue::Number(-12.5).as_number(), Some(-12.5));
        assert_eq!(CellValue::Text("12.5".into()).as_number(), None);
        assert_eq!(CellValue::Bool(true).as_number(), None);
        assert_eq!(CellValue::Blank.as_number(), None);
    }

    #[test]
    fn number_formatting() {
        assert_eq!(format_number(10.0), "10");
        assert_eq!(format_number(-10.0), "-10");
        assert_eq!(format_number(10.5), "10.5");
        assert_eq!(format_number(0.0), "0");
        assert_eq!(format_number(1e15), "1000000000000000");
        assert_eq!(format_number(1234.125), "1234.125");
    }

    #[test]
    fn display_strings() {
        assert_eq!(CellValue::Blank.to_string(), "");
        assert_eq!(CellValue::Number(42.0).to_string(), "42");
        assert_eq!(CellValue::Text("EUR".into()).to_string(), "EUR");
        assert_eq!(CellValue::Bool(true).to_string(), "TRUE");
    }
}

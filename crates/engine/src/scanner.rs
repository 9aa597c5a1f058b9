use crate::config::ScanStop;
use crate::document::TableDocument;
use crate::error::EngineError;
use crate::model::ScannedEntry;

/// Lazy row scan over one sheet's amount column.
///
/// Yields entries from the start row upward, applying the stop policy. The
/// iterator is finite and single-use; after yielding an error it is spent.
pub struct RowScanner<'a, D: TableDocument + ?Sized> {
    doc: &'a D,
    sheet: usize,
    sheet_name: String,
    column: u32,
    partition_column: Option<u32>,
    stop: ScanStop,
    next_row: u32,
    end_row: u32,
    halted: bool,
}

impl<'a, D: TableDocument + ?Sized> RowScanner<'a, D> {
    pub fn new(
        doc: &'a D,
        sheet: usize,
        sheet_name: &str,
        column: u32,
        partition_column: Option<u32>,
        start_row: u32,
        stop: ScanStop,
    ) -> Self {
        let last_row = doc.last_row(sheet);
        // A stop row past the sheet's extent clamps to the last occupied row.
        let end_row = match stop {
            ScanStop::AtRow(stop_row) => stop_row.min(last_row),
            ScanStop::OnBlank | ScanStop::EndOfSheet => last_row,
        };
        Self {
            doc,
            sheet,
            sheet_name: sheet_name.to_string(),
            column,
            partition_column,
            stop,
            next_row: start_row,
            end_row,
            halted: false,
        }
    }
}

impl<'a, D: TableDocument + ?Sized> Iterator for RowScanner<'a, D> {
    type Item = Result<ScannedEntry, EngineError>;

    fn next(&mut self) -> Option<Self::Item> {
        while !self.halted && self.next_row <= self.end_row {
            let row = self.next_row;
            self.next_row += 1;

            let cell = self.doc.read_cell(self.sheet, row, self.column);
            if cell.is_blank() {
                match self.stop {
                    ScanStop::OnBlank => {
                        self.halted = true;
                        return None;
                    }
                    // Blanks inside the window are skipped, not emitted.
                    ScanStop::EndOfSheet | ScanStop::AtRow(_) => continue,
                }
            }

            let value = match cell.as_number() {
                Some(value) => value,
                None => {
                    self.halted = true;
                    return Some(Err(EngineError::InvalidValue {
                        sheet: self.sheet_name.clone(),
                        row,
                        column: self.column,
                        value: cell.to_string(),
                    }));
                }
            };

            let partition = self
                .partition_column
                .map(|column| partition_key(self.doc, self.sheet, row, column))
                .unwrap_or_default();

            return Some(Ok(ScannedEntry { row, value, partition }));
        }
        None
    }
}

/// Grouping discriminant for one row: the partition cell's display text,
/// empty when the cell is blank. Appended verbatim to the bucket key.
fn partition_key<D: TableDocument + ?Sized>(doc: &D, sheet: usize, row: u32, column: u32) -> String {
    doc.read_cell(sheet, row, column).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::CellValue;

    /// Single-sheet dense grid; row 1 is the header.
    struct Grid(Vec<Vec<CellValue>>);

    impl TableDocument for Grid {
        fn sheet_count(&self) -> usize {
            1
        }

        fn sheet_name(&self, sheet: usize) -> Option<&str> {
            (sheet == 0).then_some("S")
        }

        fn last_row(&self, _sheet: usize) -> u32 {
            self.0.len() as u32
        }

        fn last_column(&self, _sheet: usize) -> u32 {
            self.0.iter().map(|r| r.len()).max().unwrap_or(0) as u32
        }

        fn read_cell(&self, _sheet: usize, row: u32, column: u32) -> CellValue {
            self.0
                .get(row as usize - 1)
                .and_then(|r| r.get(column as usize - 1))
                .cloned()
                .unwrap_or(CellValue::Blank)
        }

        fn write_cell(&mut self, _sheet: usize, _row: u32, _column: u32, _value: CellValue) {
            unimplemented!("scan tests never write")
        }

        fn insert_column(&mut self, _sheet: usize, _at: u32) {
            unimplemented!("scan tests never insert")
        }
    }

    fn num(n: f64) -> CellValue {
        CellValue::Number(n)
    }

    fn text(s: &str) -> CellValue {
        CellValue::Text(s.into())
    }

    /// One amount column under a header row.
    fn amounts(cells: &[CellValue]) -> Grid {
        let mut rows = vec![vec![text("Amount")]];
        rows.extend(cells.iter().map(|c| vec![c.clone()]));
        Grid(rows)
    }

    fn scan(grid: &Grid, stop: ScanStop) -> Vec<(u32, f64)> {
        RowScanner::new(grid, 0, "S", 1, None, 2, stop)
            .map(|r| r.unwrap())
            .map(|e| (e.row, e.value))
            .collect()
    }

    #[test]
    fn on_blank_halts_at_first_blank() {
        let grid = amounts(&[num(10.0), num(-10.0), CellValue::Blank, num(5.0)]);
        assert_eq!(scan(&grid, ScanStop::OnBlank), vec![(2, 10.0), (3, -10.0)]);
    }

    #[test]
    fn empty_text_counts_as_blank() {
        let grid = amounts(&[num(10.0), text(""), num(5.0)]);
        assert_eq!(scan(&grid, ScanStop::OnBlank), vec![(2, 10.0)]);
    }

    #[test]
    fn end_of_sheet_skips_blanks() {
        let grid = amounts(&[num(10.0), num(-10.0), CellValue::Blank, num(5.0)]);
        assert_eq!(
            scan(&grid, ScanStop::EndOfSheet),
            vec![(2, 10.0), (3, -10.0), (5, 5.0)]
        );
    }

    #[test]
    fn at_row_stops_inclusive() {
        let grid = amounts(&[num(10.0), num(-10.0), num(10.0), num(5.0)]);
        assert_eq!(scan(&grid, ScanStop::AtRow(3)), vec![(2, 10.0), (3, -10.0)]);
    }

    #[test]
    fn at_row_skips_blanks_inside_window() {
        let grid = amounts(&[num(10.0), CellValue::Blank, num(5.0)]);
        assert_eq!(scan(&grid, ScanStop::AtRow(4)), vec![(2, 10.0), (4, 5.0)]);
    }

    #[test]
    fn at_row_clamps_to_sheet_extent() {
        let grid = amounts(&[num(1.0), num(2.0)]);
        assert_eq!(scan(&grid, ScanStop::AtRow(99)), vec![(2, 1.0), (3, 2.0)]);
    }

    #[test]
    fn start_row_beyond_extent_yields_nothing() {
        let grid = amounts(&[num(1.0)]);
        let entries: Vec<_> = RowScanner::new(&grid, 0, "S", 1, None, 10, ScanStop::EndOfSheet)
            .collect();
        assert!(entries.is_empty());
    }

    #[test]
    fn invalid_value_halts_with_position() {
        let grid = amounts(&[num(10.0), text("n/a"), num(5.0)]);
        let mut scanner = RowScanner::new(&grid, 0, "Ledger", 1, None, 2, ScanStop::EndOfSheet);
        assert!(scanner.next().unwrap().is_ok());
        let err = scanner.next().unwrap().unwrap_err();
        match err {
            EngineError::InvalidValue { sheet, row, column, value } => {
                assert_eq!(sheet, "Ledger");
                assert_eq!(row, 3);
                assert_eq!(column, 1);
                assert_eq!(value, "n/a");
            }
            other => panic!("expected InvalidValue, got {other:?}"),
        }
        // Spent after the error.
        assert!(scanner.next().is_none());
    }

    #[test]
    fn boolean_amounts_are_invalid() {
        let grid = amounts(&[CellValue::Bool(true)]);
        let mut scanner = RowScanner::new(&grid, 0, "S", 1, None, 2, ScanStop::OnBlank);
        assert!(scanner.next().unwrap().is_err());
    }

    #[test]
    fn partition_column_feeds_keys() {
        let grid = Grid(vec![
            vec![text("Amount"), text("Entity")],
            vec![num(10.0), text("A")],
            vec![num(-10.0), CellValue::Blank],
            vec![num(3.0), num(7.0)],
        ]);
        let entries: Vec<_> = RowScanner::new(&grid, 0, "S", 1, Some(2), 2, ScanStop::EndOfSheet)
            .map(|r| r.unwrap())
            .collect();
        let keys: Vec<&str> = entries.iter().map(|e| e.partition.as_str()).collect();
        assert_eq!(keys, vec!["A", "", "7"]);
    }
}

//! In-memory workbook model.
//!
//! Sparse cell storage: only occupied cells are kept, keyed by 1-based
//! (row, column). This is the document the engine reads and annotates;
//! the format adapters load into it and save out of it.

use std::collections::HashMap;

use pairoff_engine::{CellValue, TableDocument};

#[derive(Debug, Clone, Default)]
pub struct Sheet {
    name: String,
    cells: HashMap<(u32, u32), CellValue>,
    rows: u32,
    cols: u32,
}

impl Sheet {
    pub fn new(name: &str) -> Self {
        Self { name: name.to_string(), ..Default::default() }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Inclusive occupied extents; 0 when empty.
    pub fn last_row(&self) -> u32 {
        self.rows
    }

    pub fn last_column(&self) -> u32 {
        self.cols
    }

    pub fn cell_count(&self) -> usize {
        self.cells.len()
    }

    pub fn get(&self, row: u32, column: u32) -> CellValue {
        self.cells.get(&(row, column)).cloned().unwrap_or(CellValue::Blank)
    }

    /// Writing a blank removes the cell. Extents grow on non-blank writes
    /// and never shrink.
    pub fn set(&mut self, row: u32, column: u32, value: CellValue) {
        if value.is_blank() {
            self.cells.remove(&(row, column));
        } else {
            self.cells.insert((row, column), value);
            self.rows = self.rows.max(row);
            self.cols = self.cols.max(column);
        }
    }

    /// Insert a blank column at `at`, shifting occupied cells at or right of
    /// it one step right.
    pub fn insert_column(&mut self, at: u32) {
        let shifted: Vec<_> = self
            .cells
            .iter()
            .filter(|((_, column), _)| *column >= at)
            .map(|(&key, cell)| (key, cell.clone()))
            .collect();
        for (key, _) in &shifted {
            self.cells.remove(key);
        }
        for ((row, column), cell) in shifted {
            self.cells.insert((row, column + 1), cell);
        }
        self.cols = if at > self.cols { at } else { self.cols + 1 };
    }

    /// Occupied cells in arbitrary order.
    pub fn cells(&self) -> impl Iterator<Item = (u32, u32, &CellValue)> {
        self.cells.iter().map(|(&(row, column), value)| (row, column, value))
    }
}

#[derive(Debug, Clone, Default)]
pub struct Workbook {
    sheets: Vec<Sheet>,
}

impl Workbook {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, sheet: Sheet) {
        self.sheets.push(sheet);
    }

    pub fn sheets(&self) -> &[Sheet] {
        &self.sheets
    }

    pub fn sheet(&self, index: usize) -> Option<&Sheet> {
        self.sheets.get(index)
    }

    pub fn sheet_mut(&mut self, index: usize) -> Option<&mut Sheet> {
        self.sheets.get_mut(index)
    }

    pub fn is_empty(&self) -> bool {
        self.sheets.is_empty()
    }

    pub fn cell_count(&self) -> usize {
        self.sheets.iter().map(Sheet::cell_count).sum()
    }
}

impl TableDocument for Workbook {
    fn sheet_count(&self) -> usize {
        self.sheets.len()
    }

    fn sheet_name(&self, sheet: usize) -> Option<&str> {
        self.sheets.get(sheet).map(Sheet::name)
    }

    fn last_row(&self, sheet: usize) -> u32 {
        self.sheets.get(sheet).map_or(0, Sheet::last_row)
    }

    fn last_column(&self, sheet: usize) -> u32 {
        self.sheets.get(sheet).map_or(0, Sheet::last_column)
    }

    fn read_cell(&self, sheet: usize, row: u32, column: u32) -> CellValue {
        self.sheets
            .get(sheet)
            .map_or(CellValue::Blank, |s| s.get(row, column))
    }

    fn write_cell(&mut self, sheet: usize, row: u32, column: u32, value: CellValue) {
        if let Some(s) = self.sheets.get_mut(sheet) {
            s.set(row, column, value);
        }
    }

    fn insert_column(&mut self, sheet: usize, at: u32) {
        if let Some(s) = self.sheets.get_mut(sheet) {
            s.insert_column(at);
        }
    }
}

// Excel document import (xlsx, xlsm, xlsb, xls, ods) and export (xlsx only)
//
// Import is one-way: files are converted to the in-memory workbook model.
// Styles, formulas and merged regions are not carried over; the matcher
// only needs cell values.

use std::path::Path;

use calamine::{open_workbook_auto, Data, Reader};
use pairoff_engine::CellValue;
use rust_xlsxwriter::Workbook as XlsxWorkbook;

use crate::workbook::{Sheet, Workbook};

/// Import any Excel-family file, dispatching on its signature.
pub fn import(path: &Path) -> Result<Workbook, String> {
    let mut source = open_workbook_auto(path)
        .map_err(|e| format!("Failed to open '{}': {}", path.display(), e))?;

    let sheet_names: Vec<String> = source.sheet_names().to_vec();
    let mut workbook = Workbook::new();

    for sheet_name in &sheet_names {
        let range = source
            .worksheet_range(sheet_name)
            .map_err(|e| format!("Failed to read sheet '{}': {}", sheet_name, e))?;

        let mut sheet = Sheet::new(sheet_name);

        // The used range can start below/right of A1; keep absolute positions.
        let (start_row, start_col) = range.start().unwrap_or((0, 0));

        for (row_idx, row) in range.rows().enumerate() {
            let target_row = start_row + row_idx as u32 + 1;
            for (col_idx, cell) in row.iter().enumerate() {
                let target_col = start_col + col_idx as u32 + 1;
                let value = match cell {
                    Data::Empty => continue,
                    Data::String(s) => {
                        if s.is_empty() {
                            continue;
                        }
                        CellValue::Text(s.clone())
                    }
                    Data::Float(n) => CellValue::Number(*n),
                    Data::Int(n) => CellValue::Number(*n as f64),
                    Data::Bool(b) => CellValue::Bool(*b),
                    // Serial number; the matcher treats dates as plain numbers.
                    Data::DateTime(dt) => CellValue::Number(dt.as_f64()),
                    Data::DateTimeIso(s) | Data::DurationIso(s) => CellValue::Text(s.clone()),
                    Data::Error(e) => CellValue::Text(format!("#{:?}", e)),
                };
                sheet.set(target_row, target_col, value);
            }
        }

        workbook.push(sheet);
    }

    if workbook.is_empty() {
        return Err(format!("'{}' contains no sheets", path.display()));
    }
    Ok(workbook)
}

/// Export to xlsx. Blank cells are simply absent from the output.
pub fn export(workbook: &Workbook, path: &Path) -> Result<(), String> {
    let mut xlsx = XlsxWorkbook::new();

    for sheet in workbook.sheets() {
        let worksheet = xlsx
            .add_worksheet()
            .set_name(sheet.name())
            .map_err(|e| format!("Failed to create sheet '{}': {}", sheet.name(), e))?;

        for (row, column, value) in sheet.cells() {
            let r = row - 1;
            let c = (column - 1) as u16;
            match value {
                CellValue::Number(n) => {
                    worksheet
                        .write_number(r, c, *n)
                        .map_err(|e| format!("Failed to write sheet '{}': {}", sheet.name(), e))?;
                }
                CellValue::Text(s) => {
                    worksheet
                        .write_string(r, c, s)
                        .map_err(|e| format!("Failed to write sheet '{}': {}", sheet.name(), e))?;
                }
                CellValue::Bool(b) => {
                    worksheet
                        .write_boolean(r, c, *b)
                        .map_err(|e| format!("Failed to write sheet '{}': {}", sheet.name(), e))?;
                }
                CellValue::Blank => {}
            }
        }
    }

    xlsx.save(path)
        .map_err(|e| format!("Failed to save XLSX file: {}", e))?;
    Ok(())
}

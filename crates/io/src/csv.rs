// CSV/TSV import/export

use std::path::Path;

use pairoff_engine::CellValue;

use crate::workbook::{Sheet, Workbook};

pub fn import(path: &Path) -> Result<Workbook, String> {
    let content = read_file_as_utf8(path)?;
    let delimiter = sniff_delimiter(&content);
    import_from_string(&content, delimiter, sheet_name_for(path))
}

pub fn import_tsv(path: &Path) -> Result<Workbook, String> {
    let content = read_file_as_utf8(path)?;
    import_from_string(&content, b'\t', sheet_name_for(path))
}

fn sheet_name_for(path: &Path) -> &str {
    path.file_stem().and_then(|s| s.to_str()).unwrap_or("Sheet1")
}

/// Guess the field delimiter from the first ten lines.
///
/// Candidates (tab, semicolon, comma, pipe) are scored by how many sample
/// lines repeat the first line's field count, weighted by that count. A
/// candidate that leaves the first line as a single field is skipped; ties
/// keep the earlier candidate.
fn sniff_delimiter(content: &str) -> u8 {
    let sample: Vec<&str> = content.lines().take(10).collect();
    if sample.is_empty() {
        return b',';
    }

    let mut best = (b',', 0u64);
    for &delim in &[b'\t', b';', b',', b'|'] {
        let widths: Vec<usize> = sample.iter().map(|line| field_count(line, delim)).collect();
        let first = widths[0];
        if first <= 1 {
            continue;
        }
        let consistent = widths.iter().filter(|&&w| w == first).count() as u64;
        let score = consistent * first as u64;
        if score > best.1 {
            best = (delim, score);
        }
    }
    best.0
}

/// Field count of one line under a candidate delimiter, quoting respected.
fn field_count(line: &str, delimiter: u8) -> usize {
    csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .has_headers(false)
        .flexible(true)
        .from_reader(line.as_bytes())
        .records()
        .next()
        .and_then(|record| record.ok())
        .map(|record| record.len())
        .unwrap_or(1)
}

/// Read a text file, decoding Windows-1252 when the bytes are not UTF-8.
fn read_file_as_utf8(path: &Path) -> Result<String, String> {
    let bytes = std::fs::read(path)
        .map_err(|e| format!("Failed to read '{}': {}", path.display(), e))?;
    match String::from_utf8(bytes) {
        Ok(text) => Ok(text),
        Err(err) => {
            // Legacy Excel exports are typically Windows-1252.
            let bytes = err.into_bytes();
            let (decoded, _, _) = encoding_rs::WINDOWS_1252.decode(&bytes);
            Ok(decoded.into_owned())
        }
    }
}

fn import_from_string(content: &str, delimiter: u8, name: &str) -> Result<Workbook, String> {
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .has_headers(false)
        .flexible(true)
        .from_reader(content.as_bytes());

    let mut sheet = Sheet::new(name);

    for (row_idx, result) in reader.records().enumerate() {
        let record = result.map_err(|e| e.to_string())?;
        for (col_idx, field) in record.iter().enumerate() {
            if field.is_empty() {
                continue;
            }
            let value = match parse_number(field) {
                Some(n) => CellValue::Number(n),
                None => CellValue::Text(field.to_string()),
            };
            sheet.set(row_idx as u32 + 1, col_idx as u32 + 1, value);
        }
    }

    let mut workbook = Workbook::new();
    workbook.push(sheet);
    Ok(workbook)
}

// Literal NaN/inf fields stay text; they are not usable as amounts.
fn parse_number(field: &str) -> Option<f64> {
    field.trim().parse::<f64>().ok().filter(|n| n.is_finite())
}

pub fn export(workbook: &Workbook, path: &Path) -> Result<(), String> {
    export_with_delimiter(workbook, path, b',')
}

pub fn export_tsv(workbook: &Workbook, path: &Path) -> Result<(), String> {
    export_with_delimiter(workbook, path, b'\t')
}

fn export_with_delimiter(workbook: &Workbook, path: &Path, delimiter: u8) -> Result<(), String> {
    let sheets = workbook.sheets();
    if sheets.len() != 1 {
        return Err(format!(
            "CSV export requires a single sheet (workbook has {})",
            sheets.len()
        ));
    }
    let sheet = &sheets[0];

    // Rows may be variable width because trailing empties are omitted,
    // so different rows can have different field counts.
    let mut writer = csv::WriterBuilder::new()
        .delimiter(delimiter)
        .flexible(true)
        .from_path(path)
        .map_err(|e| e.to_string())?;

    for row in 1..=sheet.last_row() {
        let mut record: Vec<String> = Vec::new();
        let mut last_non_empty = 0;

        for col in 1..=sheet.last_column() {
            let value = sheet.get(row, col).to_string();
            if !value.is_empty() {
                last_non_empty = col;
            }
            record.push(value);
        }

        // Blank rows become empty records so row numbers survive a round trip.
        record.truncate(last_non_empty.max(1) as usize);
        writer.write_record(&record).map_err(|e| e.to_string())?;
    }

    writer.flush().map_err(|e| e.to_string())?;
    Ok(())
}

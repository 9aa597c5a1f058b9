use std::collections::HashSet;

use crate::annotate;
use crate::buckets;
use crate::columns;
use crate::config::{MatchConfig, SheetSelection};
use crate::document::TableDocument;
use crate::error::EngineError;
use crate::model::{RunMeta, RunReport, ScannedEntry, SheetReport};
use crate::scanner::RowScanner;

/// Run the matcher over every selected sheet of the document.
///
/// Validates the config, resolves the tab selection, then preflights amount
/// column resolution on every selected sheet before the first mutation. Any
/// error fails the whole run; the caller must not persist the document after
/// a failure.
pub fn run<D: TableDocument + ?Sized>(
    doc: &mut D,
    config: &MatchConfig,
) -> Result<RunReport, EngineError> {
    config.validate()?;
    let (selected, warnings) = resolve_selection(doc, &config.sheets)?;

    for &sheet in &selected {
        let name = sheet_label(doc, sheet);
        let header = doc.read_row(sheet, 1);
        columns::resolve_target(&name, &header, &config.target_column)?;
    }

    let mut sheets = Vec::with_capacity(selected.len());
    for &sheet in &selected {
        sheets.push(run_sheet(doc, sheet, config)?);
    }

    Ok(RunReport { meta: RunMeta::now(), sheets, warnings })
}

/// One sheet's pass: scan, pair, place, annotate. All matching state lives
/// and dies here; nothing carries over between sheets.
pub fn run_sheet<D: TableDocument + ?Sized>(
    doc: &mut D,
    sheet: usize,
    config: &MatchConfig,
) -> Result<SheetReport, EngineError> {
    let name = sheet_label(doc, sheet);
    let header = doc.read_row(sheet, 1);
    let target_column = columns::resolve_target(&name, &header, &config.target_column)?;
    let stop = config.scan_stop()?;

    let entries: Vec<ScannedEntry> = RowScanner::new(
        &*doc,
        sheet,
        &name,
        target_column,
        config.partition_column,
        config.start_row,
        stop,
    )
    .collect::<Result<_, _>>()?;

    let pairing = buckets::pair_entries(&entries);
    let result_column = annotate::resolve_result_column(doc, sheet, target_column, config)?;
    annotate::write_annotations(doc, sheet, result_column, &pairing.annotations);

    Ok(SheetReport {
        sheet: name,
        target_column,
        result_column,
        rows_scanned: entries.len(),
        buckets: pairing.bucket_count,
        pairs: pairing.pair_count,
        unmatched: pairing.unmatched_count,
    })
}

fn sheet_label<D: TableDocument + ?Sized>(doc: &D, sheet: usize) -> String {
    doc.sheet_name(sheet).unwrap_or("?").to_string()
}

/// Resolve the configured tab selection to 0-based sheet positions in
/// document order. Unknown names and out-of-range positions produce warnings;
/// an empty resolution is an error.
fn resolve_selection<D: TableDocument + ?Sized>(
    doc: &D,
    selection: &SheetSelection,
) -> Result<(Vec<usize>, Vec<String>), EngineError> {
    let mut warnings = Vec::new();
    let mut wanted: HashSet<String> = selection.names.iter().cloned().collect();

    let count = doc.sheet_count();
    for &position in &selection.positions {
        match doc.sheet_name(position as usize - 1) {
            Some(name) => {
                wanted.insert(name.to_string());
            }
            None => warnings.push(format!(
                "tab position {position} out of range (document has {count} sheet{})",
                if count == 1 { "" } else { "s" }
            )),
        }
    }

    let mut selected = Vec::new();
    for sheet in 0..count {
        if let Some(name) = doc.sheet_name(sheet) {
            if wanted.remove(name) {
                selected.push(sheet);
            }
        }
    }

    let mut missing: Vec<String> = wanted.into_iter().collect();
    missing.sort();
    for name in missing {
        warnings.push(format!("tab '{name}' not found"));
    }

    if selected.is_empty() {
        let mut requested = selection.names.clone();
        requested.extend(selection.positions.iter().map(|p| format!("#{p}")));
        return Err(EngineError::SheetNotFound(format!(
            "no requested tab found in the document (requested {})",
            requested.join(", ")
        )));
    }
    Ok((selected, warnings))
}

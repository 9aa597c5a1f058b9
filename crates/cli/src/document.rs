//! Extension-based format routing between the CLI and the io adapters.

use std::path::{Path, PathBuf};

use pairoff_io::Workbook;

use crate::console::Console;
use crate::CliError;

/// Formats the CLI can write. Reading additionally covers xlsm, xlsb,
/// xls and ods through the Excel importer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SaveFormat {
    Xlsx,
    Csv,
    Tsv,
}

fn extension_of(path: &Path) -> Option<String> {
    path.extension().and_then(|e| e.to_str()).map(|e| e.to_lowercase())
}

fn save_format(path: &Path) -> Result<SaveFormat, CliError> {
    let ext = extension_of(path);
    match ext.as_deref() {
        Some("xlsx") => Ok(SaveFormat::Xlsx),
        Some("csv") => Ok(SaveFormat::Csv),
        Some("tsv") => Ok(SaveFormat::Tsv),
        _ => Err(CliError::usage(format!(
            "cannot write format {:?}",
            ext.as_deref().unwrap_or("(none)")
        ))
        .with_hint("writable formats: xlsx, csv, tsv")),
    }
}

pub fn load_document(path: &Path) -> Result<Workbook, CliError> {
    let ext = extension_of(path);
    let result = match ext.as_deref() {
        Some("csv") => pairoff_io::csv::import(path),
        Some("tsv") => pairoff_io::csv::import_tsv(path),
        Some("xlsx") | Some("xlsm") | Some("xlsb") | Some("xls") | Some("ods") => {
            pairoff_io::xlsx::import(path)
        }
        _ => {
            return Err(CliError::usage(format!(
                "cannot infer format from extension {:?}",
                ext.as_deref().unwrap_or("(none)")
            ))
            .with_hint("supported inputs: xlsx, xlsm, xlsb, xls, ods, csv, tsv"))
        }
    };
    result.map_err(CliError::io)
}

pub fn save_document(workbook: &Workbook, path: &Path) -> Result<(), CliError> {
    let result = match save_format(path)? {
        SaveFormat::Xlsx => pairoff_io::xlsx::export(workbook, path),
        SaveFormat::Csv => pairoff_io::csv::export(workbook, path),
        SaveFormat::Tsv => pairoff_io::csv::export_tsv(workbook, path),
    };
    result.map_err(CliError::io)
}

/// Pick the save path for a match run. Default is in-place; inputs in a
/// read-only format (xlsb, xls, xlsm, ods) switch to a sibling .xlsx.
pub fn resolve_output(
    input: &Path,
    output: Option<PathBuf>,
    console: &Console,
) -> Result<PathBuf, CliError> {
    if let Some(path) = output {
        save_format(&path)?;
        return Ok(path);
    }

    match save_format(input) {
        Ok(_) => Ok(input.to_path_buf()),
        Err(_) => {
            let converted = input.with_extension("xlsx");
            console.info(&format!(
                "'{}' cannot be written in place; output goes to '{}'",
                input.display(),
                converted.display()
            ));
            Ok(converted)
        }
    }
}

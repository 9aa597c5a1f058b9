use crate::config::{MatchConfig, ResultStrategy};
use crate::document::{CellValue, TableDocument};
use crate::error::EngineError;
use crate::model::Annotation;

/// Decide which column receives annotations, inserting one when the strategy
/// calls for it. Runs once per sheet, after all reading has completed:
/// insertion shifts every column at or right of the insert point.
pub fn resolve_result_column<D: TableDocument + ?Sized>(
    doc: &mut D,
    sheet: usize,
    target_column: u32,
    config: &MatchConfig,
) -> Result<u32, EngineError> {
    match config.result_strategy {
        ResultStrategy::InsertRight => {
            let at = target_column + 1;
            doc.insert_column(sheet, at);
            Ok(at)
        }
        ResultStrategy::AddEnd => {
            let at = doc.last_column(sheet) + 1;
            doc.insert_column(sheet, at);
            Ok(at)
        }
        ResultStrategy::ExplicitIndex => config.result_column.ok_or_else(|| {
            EngineError::ConfigValidation(
                "result_column must be set when result_strategy is explicit_index".into(),
            )
        }),
    }
}

/// Write each scanned row's outcome: the match index as a number, or blank
/// (clearing whatever the cell held). Rows the scanner never emitted are
/// left untouched.
pub fn write_annotations<D: TableDocument + ?Sized>(
    doc: &mut D,
    sheet: usize,
    result_column: u32,
    annotations: &[Annotation],
) {
    for annotation in annotations {
        let value = match annotation.match_index {
            Some(index) => CellValue::Number(index as f64),
            None => CellValue::Blank,
        };
        doc.write_cell(sheet, annotation.row, result_column, value);
    }
}

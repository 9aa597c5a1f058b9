use regex::Regex;

use crate::config::TargetColumn;
use crate::document::CellValue;
use crate::error::EngineError;

/// Resolve the 1-based index of the amount column from a sheet's header row.
///
/// Explicit indices are bounds-checked against the header; patterns take the
/// first header whose text matches at the start of the string. Resolution is
/// per sheet: the same header may sit at a different index on another sheet.
pub fn resolve_target(
    sheet: &str,
    header: &[CellValue],
    target: &TargetColumn,
) -> Result<u32, EngineError> {
    match target {
        TargetColumn::Index(index) => {
            if *index >= 1 && (*index as usize) <= header.len() {
                Ok(*index)
            } else {
                Err(EngineError::ColumnNotFound {
                    sheet: sheet.to_string(),
                    selector: format!("{target} (header has {} columns)", header.len()),
                })
            }
        }
        TargetColumn::Pattern(pattern) => {
            let re = Regex::new(pattern).map_err(|e| {
                EngineError::ConfigValidation(format!("invalid column pattern '{pattern}': {e}"))
            })?;
            for (position, cell) in header.iter().enumerate() {
                if matches_at_start(&re, &cell.to_string()) {
                    return Ok(position as u32 + 1);
                }
            }
            Err(EngineError::ColumnNotFound {
                sheet: sheet.to_string(),
                selector: target.to_string(),
            })
        }
    }
}

/// Anchored-at-start match: the leftmost match must begin at offset 0.
fn matches_at_start(re: &Regex, text: &str) -> bool {
    re.find(text).map_or(false, |m| m.start() == 0)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn header(cells: &[&str]) -> Vec<CellValue> {
        cells.iter().map(|s| CellValue::Text(s.to_string())).collect()
    }

    fn pattern(p: &str) -> TargetColumn {
        TargetColumn::Pattern(p.to_string())
    }

    #[test]
    fn pattern_resolves_first_start_anchored_match() {
        let h = header(&["ID", "Amount USD", "Note"]);
        assert_eq!(resolve_target("S", &h, &pattern("^Amount.*")).unwrap(), 2);
    }

    #[test]
    fn pattern_takes_leftmost_of_several_candidates() {
        let h = header(&["ID", "Amount USD", "Amount EUR"]);
        assert_eq!(resolve_target("S", &h, &pattern("Amount")).unwrap(), 2);
    }

    #[test]
    fn interior_match_does_not_count() {
        // "USD" occurs inside "Amount USD" but not at the start.
        let h = header(&["ID", "Amount USD"]);
        let err = resolve_target("Ledger", &h, &pattern("USD")).unwrap_err();
        assert!(matches!(err, EngineError::ColumnNotFound { .. }));
        assert!(err.to_string().contains("Ledger"));
        assert!(err.to_string().contains("USD"));
    }

    #[test]
    fn numeric_headers_match_through_display_text() {
        let h = vec![CellValue::Text("ID".into()), CellValue::Number(2024.0)];
        assert_eq!(resolve_target("S", &h, &pattern("^2024")).unwrap(), 2);
    }

    #[test]
    fn blank_headers_are_passed_over() {
        let h = vec![CellValue::Blank, CellValue::Text("Amount".into())];
        assert_eq!(resolve_target("S", &h, &pattern("^Amount")).unwrap(), 2);
    }

    #[test]
    fn explicit_index_in_bounds() {
        let h = header(&["A", "B", "C"]);
        assert_eq!(resolve_target("S", &h, &TargetColumn::Index(3)).unwrap(), 3);
    }

    #[test]
    fn explicit_index_out_of_bounds() {
        let h = header(&["A", "B"]);
        let err = resolve_target("S", &h, &TargetColumn::Index(3)).unwrap_err();
        assert!(err.to_string().contains("index 3"));
        assert!(err.to_string().contains("2 columns"));
    }

    #[test]
    fn explicit_index_zero_is_out_of_bounds() {
        let h = header(&["A"]);
        assert!(resolve_target("S", &h, &TargetColumn::Index(0)).is_err());
    }
}

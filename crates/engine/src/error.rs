use std::fmt;

#[derive(Debug)]
pub enum EngineError {
    /// TOML parse / deserialization error.
    ConfigParse(String),
    /// Config validation error (mutually-dependent options misused, bad bounds).
    ConfigValidation(String),
    /// Explicit index out of header bounds, or no header matches the pattern.
    ColumnNotFound { sheet: String, selector: String },
    /// Non-blank, non-numeric cell in the amount column.
    InvalidValue { sheet: String, row: u32, column: u32, value: String },
    /// No requested tab exists in the document.
    SheetNotFound(String),
}

impl fmt::Display for EngineError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ConfigParse(msg) => write!(f, "config parse error: {msg}"),
            Self::ConfigValidation(msg) => write!(f, "config validation error: {msg}"),
            Self::ColumnNotFound { sheet, selector } => {
                write!(f, "sheet '{sheet}': no column matching {selector}")
            }
            Self::InvalidValue { sheet, row, column, value } => {
                write!(f, "sheet '{sheet}', row {row}, column {column}: cannot parse amount '{value}'")
            }
            Self::SheetNotFound(msg) => write!(f, "sheet not found: {msg}"),
        }
    }
}

impl std::error::Error for EngineError {}

//! CLI exit code registry
//!
//! Every code the binary can return is declared here. Exit codes are shell
//! contract; scripts branch on them, so existing values never change meaning.
//!
//! | Code | Description                                    |
//! |------|------------------------------------------------|
//! | 0    | Success                                        |
//! | 1    | General error (unspecified)                    |
//! | 2    | Usage or job config error                      |
//! | 3    | File I/O error (open, read, save)              |
//! | 4    | None of the requested tabs exist               |
//! | 5    | Amount column not found on a tab               |
//! | 6    | Unusable amount cell inside the scanned range  |

use pairoff_engine::EngineError;

/// Success - command completed without errors.
pub const EXIT_SUCCESS: u8 = 0;

/// General error - unspecified failure.
/// Avoid using this; prefer a specific error code.
pub const EXIT_ERROR: u8 = 1;

/// Usage error - bad arguments, contradictory flags, invalid job config.
pub const EXIT_USAGE: u8 = 2;

/// File could not be opened, read, or saved.
pub const EXIT_IO: u8 = 3;

/// Tab selection resolved to nothing - none of the requested tabs exist.
pub const EXIT_NO_TABS: u8 = 4;

/// No header on a selected tab satisfied the amount column selector.
pub const EXIT_NO_COLUMN: u8 = 5;

/// A cell inside the scanned range could not be read as an amount.
pub const EXIT_BAD_VALUE: u8 = 6;

/// Map an engine error to its exit code.
pub fn engine_exit_code(err: &EngineError) -> u8 {
    match err {
        EngineError::ConfigParse(_) | EngineError::ConfigValidation(_) => EXIT_USAGE,
        EngineError::SheetNotFound(_) => EXIT_NO_TABS,
        EngineError::ColumnNotFound { .. } => EXIT_NO_COLUMN,
        EngineError::InvalidValue { .. } => EXIT_BAD_VALUE,
    }
}

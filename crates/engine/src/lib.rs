//! `pairoff-engine` — Opposite-amount pair matching for tabular documents.
//!
//! Pure engine crate: reads and annotates documents through the
//! [`TableDocument`] trait. No file or CLI dependencies.

pub mod annotate;
pub mod buckets;
pub mod columns;
pub mod config;
pub mod document;
pub mod engine;
pub mod error;
pub mod model;
pub mod scanner;

pub use config::{
    MatchConfig, ResultStrategy, ScanStop, SheetSelection, StopStrategy, TargetColumn,
};
pub use document::{CellValue, TableDocument};
pub use engine::{run, run_sheet};
pub use error::EngineError;
pub use model::{RunReport, SheetReport};

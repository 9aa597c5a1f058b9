// File I/O operations

pub mod csv;
pub mod workbook;
pub mod xlsx;

pub use workbook::{Sheet, Workbook};

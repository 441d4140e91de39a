use thiserror::Error;

use crate::domain::entities::table::Table;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ParseError {
    #[error("no file selected")]
    NoFileSelected,
    #[error("the spreadsheet is empty")]
    Empty,
    #[error("not a recognizable spreadsheet: {0}")]
    Unrecognized(String),
    #[error("the workbook has no sheets")]
    NoSheet,
    #[error("failed to read the first sheet: {0}")]
    Sheet(String),
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ExportError {
    #[error("failed to build workbook: {0}")]
    Workbook(String),
    #[error("too many {axis} for a worksheet: {count}")]
    TooLarge { axis: &'static str, count: usize },
}

/// Turns spreadsheet bytes into a row table and back.
///
/// Implementations read the first sheet only and take column keys from the
/// header row. `serialize` writes a single sheet and never reorders the first
/// row's keys.
pub trait SheetCodec: Send + Sync {
    fn parse(&self, bytes: &[u8]) -> Result<Table, ParseError>;
    fn serialize(&self, table: &Table) -> Result<Vec<u8>, ExportError>;
}

use std::io;
use std::path::PathBuf;

use thiserror::Error;

use crate::types::RowIndex;

/// Error type for import, update, and export failures.
#[derive(Debug, Error)]
pub enum LabelerError {
    #[error("unsupported file type '{}': expected .xlsx, .xls or .csv", path.display())]
    UnsupportedFormat { path: PathBuf },
    #[error("failed to parse '{source_name}': {reason}")]
    Parse { source_name: String, reason: String },
    #[error("workbook '{}' does not contain any worksheets", path.display())]
    NoSheets { path: PathBuf },
    #[error("row {index} is out of range for {len} records")]
    RowOutOfRange { index: RowIndex, len: usize },
    #[error("contribution score {score} for row {index} is outside 1-10")]
    InvalidScore { index: RowIndex, score: u8 },
    #[error("configuration error: {0}")]
    Configuration(String),
    #[error(transparent)]
    Io(#[from] io::Error),
    #[error(transparent)]
    Csv(#[from] csv::Error),
    #[error(transparent)]
    Json(#[from] serde_json::Error),
    #[error(transparent)]
    Xlsx(#[from] rust_xlsxwriter::XlsxError),
}

use std::io;
use std::path::{Path, PathBuf};
use std::thread::{self, JoinHandle};

use calamine::{DataType, Reader, open_workbook_auto};
use tracing::{debug, info, warn};

use crate::data::{Cell, RawTable, Record};
use crate::errors::LabelerError;
use crate::normalize::RowNormalizer;
use crate::transport::fs::{extension_of, is_supported_import};

/// Container format of an importable file.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SheetFormat {
    /// Comma-separated text.
    Csv,
    /// Office Open XML workbook.
    Xlsx,
    /// Legacy binary workbook.
    Xls,
}

impl SheetFormat {
    /// Detect the format from the file extension, case-insensitively.
    pub fn from_path(path: &Path) -> Result<Self, LabelerError> {
        let unsupported = || LabelerError::UnsupportedFormat {
            path: path.to_path_buf(),
        };
        if !is_supported_import(path) {
            return Err(unsupported());
        }
        match extension_of(path).as_deref() {
            Some("csv") => Ok(SheetFormat::Csv),
            Some("xlsx") => Ok(SheetFormat::Xlsx),
            Some("xls") => Ok(SheetFormat::Xls),
            _ => Err(unsupported()),
        }
    }
}

/// Read the raw grid of `path`: the whole CSV, or the first worksheet of a workbook.
pub fn read_table(path: &Path) -> Result<RawTable, LabelerError> {
    let format = SheetFormat::from_path(path)?;
    let table = match format {
        SheetFormat::Csv => {
            let file = std::fs::File::open(path)?;
            read_csv(file, &path.display().to_string())?
        }
        SheetFormat::Xlsx | SheetFormat::Xls => read_workbook(path)?,
    };
    debug!(
        path = %path.display(),
        format = ?format,
        rows = table.rows.len(),
        "raw table read"
    );
    Ok(table)
}

/// Parse CSV text into a raw grid. The first record becomes the header.
pub fn read_csv<R: io::Read>(reader: R, source_name: &str) -> Result<RawTable, LabelerError> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(reader);
    let mut grid = Vec::new();
    for result in csv_reader.records() {
        let record = result.map_err(|err| LabelerError::Parse {
            source_name: source_name.to_string(),
            reason: err.to_string(),
        })?;
        grid.push(record.iter().map(Cell::text).collect());
    }
    Ok(RawTable::from_grid(grid))
}

fn read_workbook(path: &Path) -> Result<RawTable, LabelerError> {
    let parse_error = |reason: String| LabelerError::Parse {
        source_name: path.display().to_string(),
        reason,
    };
    let mut workbook = open_workbook_auto(path).map_err(|err| parse_error(err.to_string()))?;
    let sheet_name = workbook
        .sheet_names()
        .first()
        .cloned()
        .ok_or_else(|| LabelerError::NoSheets {
            path: path.to_path_buf(),
        })?;
    let range = workbook
        .worksheet_range(&sheet_name)
        .ok_or_else(|| parse_error(format!("worksheet '{sheet_name}' is missing")))?
        .map_err(|err| parse_error(err.to_string()))?;
    let grid = range
        .rows()
        .map(|row| row.iter().map(cell_from_data).collect())
        .collect();
    Ok(RawTable::from_grid(grid))
}

fn cell_from_data(value: &DataType) -> Cell {
    match value {
        DataType::Empty => Cell::Empty,
        DataType::String(text) => Cell::text(text.as_str()),
        DataType::Float(number) => Cell::Number(*number),
        DataType::Int(number) => Cell::Number(*number as f64),
        DataType::Bool(flag) => Cell::Bool(*flag),
        other => Cell::text(other.to_string()),
    }
}

/// Read and normalize `path` into records.
pub fn import_records(path: &Path, normalizer: &RowNormalizer) -> Result<Vec<Record>, LabelerError> {
    let table = read_table(path)?;
    let records = normalizer.normalize_table(&table);
    info!(
        path = %path.display(),
        raw_rows = table.rows.len(),
        records = records.len(),
        "import complete"
    );
    Ok(records)
}

/// Import running on a background thread.
///
/// The caller keeps its current data until [`PendingImport::wait`] hands back
/// the outcome; nothing is shared with the worker.
pub struct PendingImport {
    path: PathBuf,
    handle: JoinHandle<Result<Vec<Record>, LabelerError>>,
}

impl PendingImport {
    /// Start importing `path` on a worker thread.
    pub fn spawn(path: impl Into<PathBuf>, normalizer: RowNormalizer) -> Self {
        let path = path.into();
        let worker_path = path.clone();
        let handle = thread::spawn(move || import_records(&worker_path, &normalizer));
        Self { path, handle }
    }

    /// File being imported.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Block until the import finishes and return its outcome.
    pub fn wait(self) -> Result<Vec<Record>, LabelerError> {
        match self.handle.join() {
            Ok(outcome) => outcome,
            Err(_) => {
                warn!(path = %self.path.display(), "import worker panicked");
                Err(LabelerError::Parse {
                    source_name: self.path.display().to_string(),
                    reason: "import worker panicked".to_string(),
                })
            }
        }
    }
}

/// Filesystem helpers and export sinks.
pub mod fs;
/// Spreadsheet and CSV import.
pub mod spreadsheet;

pub use fs::{DirectorySink, FileSink, is_supported_import};
pub use spreadsheet::{PendingImport, SheetFormat, import_records, read_csv, read_table};

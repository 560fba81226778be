//! Export transformers: flat CSV/XLSX and grouped JSON.

use std::path::PathBuf;

use tracing::info;

use crate::config::ExportNames;
use crate::data::Record;
use crate::errors::LabelerError;
use crate::transport::fs::FileSink;

/// Flat CSV and workbook writers.
pub mod flat;
/// Grouped JSON document builder.
pub mod grouped;

pub use flat::{FlatRow, csv_bytes, sanitize, sanitize_records, xlsx_bytes};
pub use grouped::{
    GroupedComment, GroupedDocument, GroupedItem, GroupedTotals, build_grouped_export,
};

/// Output format for an export.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ExportFormat {
    /// One row per record, comma separated.
    Csv,
    /// One row per record in a single-sheet workbook.
    Xlsx,
    /// One item per summary file, nested comments.
    GroupedJson,
}

impl ExportFormat {
    /// File name used for this format when the caller gives none.
    pub fn default_file_name<'a>(&self, names: &'a ExportNames) -> &'a str {
        match self {
            ExportFormat::Csv => &names.csv_file,
            ExportFormat::Xlsx => &names.xlsx_file,
            ExportFormat::GroupedJson => &names.json_file,
        }
    }
}

/// Render `records` in `format`.
///
/// Records are sanitized before any format sees them, so the grouped
/// document reflects the same label repairs as the flat exports.
pub fn render(
    records: &[Record],
    format: ExportFormat,
    names: &ExportNames,
) -> Result<Vec<u8>, LabelerError> {
    let records = sanitize_records(records);
    match format {
        ExportFormat::Csv => csv_bytes(&records),
        ExportFormat::Xlsx => xlsx_bytes(&records, &names.sheet_name),
        ExportFormat::GroupedJson => {
            let document = build_grouped_export(&records);
            Ok(grouped::to_json_pretty(&document)?.into_bytes())
        }
    }
}

/// Render `records` and hand the bytes to `sink`.
///
/// `file_name` overrides the configured default for the format.
pub fn export_to<S: FileSink + ?Sized>(
    sink: &S,
    records: &[Record],
    format: ExportFormat,
    names: &ExportNames,
    file_name: Option<&str>,
) -> Result<PathBuf, LabelerError> {
    let bytes = render(records, format, names)?;
    let name = file_name.unwrap_or_else(|| format.default_file_name(names));
    let path = sink.deliver(name, &bytes)?;
    info!(
        format = ?format,
        records = records.len(),
        path = %path.display(),
        "export complete"
    );
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::Contribution;
    use crate::transport::fs::DirectorySink;
    use tempfile::tempdir;

    fn zero_score_record() -> Record {
        Record {
            summary_file: "doc".to_string(),
            summary: "s".to_string(),
            comment: "c".to_string(),
            contribution: Some(Contribution::Constructive),
            contribution_score: Some(0),
            ..Record::default()
        }
    }

    #[test]
    fn grouped_render_applies_sanitization() {
        let bytes = render(
            &[zero_score_record()],
            ExportFormat::GroupedJson,
            &ExportNames::default(),
        )
        .unwrap();
        let value: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(value["items"][0]["comments"][0]["contribution"], 0);
    }

    #[test]
    fn export_uses_default_names() {
        let temp = tempdir().unwrap();
        let sink = DirectorySink::new(temp.path());
        let names = ExportNames::default();
        let csv = export_to(&sink, &[], ExportFormat::Csv, &names, None).unwrap();
        let xlsx = export_to(&sink, &[], ExportFormat::Xlsx, &names, None).unwrap();
        let json = export_to(&sink, &[], ExportFormat::GroupedJson, &names, None).unwrap();
        assert!(csv.ends_with("labeled_data.csv"));
        assert!(xlsx.ends_with("labeled_data.xlsx"));
        assert!(json.ends_with("comment_labeling.json"));
    }

    #[test]
    fn explicit_file_name_wins() {
        let temp = tempdir().unwrap();
        let sink = DirectorySink::new(temp.path());
        let path = export_to(
            &sink,
            &[zero_score_record()],
            ExportFormat::Csv,
            &ExportNames::default(),
            Some("custom.csv"),
        )
        .unwrap();
        assert_eq!(path, temp.path().join("custom.csv"));
        let text = std::fs::read_to_string(path).unwrap();
        assert!(text.lines().nth(1).unwrap().ends_with(",0,0"));
    }
}

use std::io;

use rust_xlsxwriter::{Format, Workbook};
use serde::Serialize;

use crate::constants::columns::FLAT_COLUMNS;
use crate::data::{Contribution, Record};
use crate::errors::LabelerError;

/// Repair score/contribution drift before serialization.
///
/// A score explicitly cleared to `0` forces the contribution to generic.
pub fn sanitize(record: &Record) -> Record {
    let mut row = record.clone();
    if row.contribution_score == Some(0) {
        row.contribution = Some(Contribution::Generic);
    }
    row
}

/// Sanitize every record, preserving order.
pub fn sanitize_records(records: &[Record]) -> Vec<Record> {
    records.iter().map(sanitize).collect()
}

/// One flat export row, columns in canonical order.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct FlatRow {
    #[serde(rename = "Summary_File")]
    pub summary_file: String,
    #[serde(rename = "Similarity_Score")]
    pub similarity_score: Option<f64>,
    #[serde(rename = "Reference_Summary")]
    pub reference_summary: String,
    #[serde(rename = "Generated_Summary")]
    pub generated_summary: String,
    #[serde(rename = "Summary")]
    pub summary: String,
    #[serde(rename = "Comment")]
    pub comment: String,
    #[serde(rename = "Relevance")]
    pub relevance: Option<u8>,
    #[serde(rename = "Contribution")]
    pub contribution: Option<u8>,
    #[serde(rename = "Contribution_Score")]
    pub contribution_score: Option<u8>,
}

impl From<&Record> for FlatRow {
    fn from(record: &Record) -> Self {
        let record = sanitize(record);
        Self {
            summary_file: record.summary_file,
            similarity_score: record.similarity_score,
            reference_summary: record.reference_summary,
            generated_summary: record.generated_summary,
            summary: record.summary,
            comment: record.comment,
            relevance: record.relevance.map(|value| value.code()),
            contribution: record.contribution.map(|value| value.code()),
            contribution_score: record.contribution_score,
        }
    }
}

/// Sanitized flat rows for `records`.
pub fn flat_rows(records: &[Record]) -> Vec<FlatRow> {
    records.iter().map(FlatRow::from).collect()
}

/// Write `records` as CSV with a header row, even when there are no records.
///
/// Fields containing a comma, quote, or newline are quoted with embedded
/// quotes doubled.
pub fn write_csv<W: io::Write>(records: &[Record], writer: W) -> Result<(), LabelerError> {
    let mut csv_writer = csv::WriterBuilder::new()
        .has_headers(false)
        .quote_style(csv::QuoteStyle::Necessary)
        .from_writer(writer);
    csv_writer.write_record(FLAT_COLUMNS)?;
    for row in flat_rows(records) {
        csv_writer.serialize(row)?;
    }
    csv_writer.flush()?;
    Ok(())
}

/// CSV export as bytes.
pub fn csv_bytes(records: &[Record]) -> Result<Vec<u8>, LabelerError> {
    let mut buffer = Vec::new();
    write_csv(records, &mut buffer)?;
    Ok(buffer)
}

/// Single-sheet workbook export as bytes. Unset values are left as blank cells.
pub fn xlsx_bytes(records: &[Record], sheet_name: &str) -> Result<Vec<u8>, LabelerError> {
    let mut workbook = Workbook::new();
    let sheet = workbook.add_worksheet();
    sheet.set_name(sheet_name)?;

    let header_format = Format::new().set_bold();
    for (col, header) in FLAT_COLUMNS.iter().enumerate() {
        sheet.write_string_with_format(0, col as u16, *header, &header_format)?;
    }

    for (idx, row) in flat_rows(records).into_iter().enumerate() {
        let line = (idx + 1) as u32;
        sheet.write_string(line, 0, &row.summary_file)?;
        if let Some(score) = row.similarity_score {
            sheet.write_number(line, 1, score)?;
        }
        sheet.write_string(line, 2, &row.reference_summary)?;
        sheet.write_string(line, 3, &row.generated_summary)?;
        sheet.write_string(line, 4, &row.summary)?;
        sheet.write_string(line, 5, &row.comment)?;
        let labels = [row.relevance, row.contribution, row.contribution_score];
        for (offset, value) in labels.into_iter().enumerate() {
            if let Some(value) = value {
                sheet.write_number(line, 6 + offset as u16, f64::from(value))?;
            }
        }
    }

    Ok(workbook.save_to_buffer()?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::Relevance;

    fn record(comment: &str) -> Record {
        Record {
            summary_file: "doc_1".to_string(),
            similarity_score: Some(0.5),
            reference_summary: "ref".to_string(),
            generated_summary: "gen".to_string(),
            summary: "sum".to_string(),
            comment: comment.to_string(),
            relevance: Some(Relevance::Mapping),
            contribution: Some(Contribution::Constructive),
            contribution_score: Some(6),
        }
    }

    #[test]
    fn sanitize_forces_generic_when_score_is_zero() {
        let mut row = record("c");
        row.contribution_score = Some(0);
        let cleaned = sanitize(&row);
        assert_eq!(cleaned.contribution, Some(Contribution::Generic));
        assert_eq!(cleaned.contribution_score, Some(0));
        assert_eq!(sanitize(&record("c")), record("c"));
    }

    #[test]
    fn sanitize_sets_contribution_when_unset() {
        let mut row = record("c");
        row.contribution = None;
        row.contribution_score = Some(0);
        assert_eq!(sanitize(&row).contribution, Some(Contribution::Generic));
    }

    #[test]
    fn csv_has_canonical_header_even_when_empty() {
        let bytes = csv_bytes(&[]).unwrap();
        let text = String::from_utf8(bytes).unwrap();
        assert_eq!(
            text,
            "Summary_File,Similarity_Score,Reference_Summary,Generated_Summary,Summary,Comment,Relevance,Contribution,Contribution_Score\n"
        );
    }

    #[test]
    fn csv_quotes_special_characters() {
        let mut row = record("says \"hi\", then\nleaves");
        row.relevance = None;
        let text = String::from_utf8(csv_bytes(&[row]).unwrap()).unwrap();
        let body = text.lines().skip(1).collect::<Vec<_>>().join("\n");
        assert_eq!(
            body,
            "doc_1,0.5,ref,gen,sum,\"says \"\"hi\"\", then\nleaves\",,1,6"
        );
    }

    #[test]
    fn flat_rows_emit_integer_codes() {
        let rows = flat_rows(&[record("c")]);
        assert_eq!(rows[0].relevance, Some(0));
        assert_eq!(rows[0].contribution, Some(1));
        assert_eq!(rows[0].contribution_score, Some(6));
    }

    #[test]
    fn xlsx_export_produces_a_zip_container() {
        let bytes = xlsx_bytes(&[record("c")], "Labeled Data").unwrap();
        assert!(bytes.starts_with(b"PK"));
        let empty = xlsx_bytes(&[], "Labeled Data").unwrap();
        assert!(empty.starts_with(b"PK"));
    }
}

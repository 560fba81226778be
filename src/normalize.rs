//! Row normalization: raw spreadsheet rows into typed, sorted [`Record`]s.
//!
//! Column resolution is header-first: every logical field is looked up by
//! alias among the header cells, and falls back to its canonical position
//! when no header matches. Cell coercion never fails; unparseable values
//! become `None` and the row is kept. Only rows whose `Summary_File` is empty
//! are dropped.

use std::collections::HashSet;

use tracing::debug;

use crate::config::{ColumnAliases, LabelerConfig, RecordField};
use crate::constants::labels::{PERCENT_SCALE_MAX, SCORE_MAX, SCORE_MIN};
use crate::data::{Cell, Contribution, RawTable, Record, Relevance};
use crate::types::HeaderKey;
use crate::utils::{natural_cmp, normalize_header_key, normalize_header_key_case_sensitive};

/// Where a logical field's values are read from.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ColumnSource {
    /// Matched a header alias at this column.
    Header(usize),
    /// No header matched; canonical position used.
    Positional(usize),
    /// No header matched and the canonical position belongs to another field.
    Absent,
}

impl ColumnSource {
    /// Column index to read from, `None` when the field is absent.
    pub fn index(self) -> Option<usize> {
        match self {
            ColumnSource::Header(idx) | ColumnSource::Positional(idx) => Some(idx),
            ColumnSource::Absent => None,
        }
    }
}

/// Resolved column index per logical field.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ColumnMapping {
    sources: [ColumnSource; 9],
}

impl ColumnMapping {
    /// Resolve every field against `header` using `aliases`.
    ///
    /// A header column is claimed by at most one field; fields are resolved in
    /// canonical order. A field without a header match reads its canonical
    /// position unless another field claimed that column by header.
    pub fn resolve(header: &[Cell], aliases: &ColumnAliases, case_sensitive: bool) -> Self {
        let normalize = |value: &str| -> HeaderKey {
            if case_sensitive {
                normalize_header_key_case_sensitive(value)
            } else {
                normalize_header_key(value)
            }
        };
        let header_keys: Vec<HeaderKey> = header
            .iter()
            .map(|cell| normalize(cell.as_text().as_str()))
            .collect();

        let mut consumed: HashSet<usize> = HashSet::new();
        let matched = RecordField::ALL.map(|field| {
            let wanted: HashSet<HeaderKey> = aliases
                .for_field(field)
                .iter()
                .map(|alias| normalize(alias.as_ref()))
                .filter(|key| !key.is_empty())
                .collect();
            let idx = header_keys
                .iter()
                .enumerate()
                .find(|(idx, key)| !consumed.contains(idx) && wanted.contains(*key))
                .map(|(idx, _)| idx)?;
            consumed.insert(idx);
            Some(idx)
        });

        // Positions are assigned only after every header match is known.
        let mut sources = [ColumnSource::Absent; 9];
        for (field, matched) in RecordField::ALL.into_iter().zip(matched) {
            sources[field.fallback_index()] = match matched {
                Some(idx) => ColumnSource::Header(idx),
                None => {
                    let idx = field.fallback_index();
                    if consumed.contains(&idx) {
                        debug!(
                            field = ?field,
                            column = idx,
                            "header not found; positional column claimed by another field"
                        );
                        ColumnSource::Absent
                    } else {
                        debug!(
                            field = ?field,
                            column = idx,
                            "header not found; using positional column"
                        );
                        ColumnSource::Positional(idx)
                    }
                }
            };
        }

        Self { sources }
    }

    /// Canonical positional layout (`Summary_File` at 0 ... `Contribution_Score` at 8).
    pub fn positional() -> Self {
        Self {
            sources: RecordField::ALL.map(|field| ColumnSource::Positional(field.fallback_index())),
        }
    }

    /// Source column for `field`.
    pub fn source(&self, field: RecordField) -> ColumnSource {
        self.sources[field.fallback_index()]
    }

    fn cell<'a>(&self, row: &'a [Cell], field: RecordField) -> Option<&'a Cell> {
        self.source(field).index().and_then(|idx| row.get(idx))
    }
}

/// Map a raw contribution score onto the 1-10 scale.
///
/// - `1..=10` is kept;
/// - multiples of ten in `11..=100` are read as percentages (`80` -> `8`);
/// - anything else above ten clamps to `10`;
/// - values below one become `None`.
pub fn normalize_contribution_score(raw: i64) -> Option<u8> {
    let normalized = if (SCORE_MIN..=SCORE_MAX).contains(&raw) {
        raw
    } else if raw > SCORE_MAX && raw <= PERCENT_SCALE_MAX && raw % 10 == 0 {
        ((raw as f64) / 10.0).round().clamp(SCORE_MIN as f64, SCORE_MAX as f64) as i64
    } else if raw > SCORE_MAX {
        SCORE_MAX
    } else {
        return None;
    };
    u8::try_from(normalized).ok()
}

/// Converts raw tabular rows into sorted, typed records.
#[derive(Clone, Debug, Default)]
pub struct RowNormalizer {
    config: LabelerConfig,
}

impl RowNormalizer {
    /// Build a normalizer using `config` aliases and header matching rules.
    pub fn new(config: LabelerConfig) -> Self {
        Self { config }
    }

    /// Resolve the column mapping for `header`.
    pub fn mapping_for(&self, header: &[Cell]) -> ColumnMapping {
        ColumnMapping::resolve(
            header,
            &self.config.aliases,
            self.config.case_sensitive_headers,
        )
    }

    /// Normalize a whole table.
    pub fn normalize_table(&self, table: &RawTable) -> Vec<Record> {
        self.normalize(&table.header, &table.rows)
    }

    /// Normalize `rows` using column positions resolved from `header`.
    ///
    /// Rows with an empty `Summary_File` are skipped. The result is stably
    /// sorted by trimmed `Summary_File` using numeric-aware, case-insensitive
    /// ordering.
    pub fn normalize(&self, header: &[Cell], rows: &[Vec<Cell>]) -> Vec<Record> {
        let mapping = self.mapping_for(header);
        let mut skipped = 0usize;
        let mut records: Vec<Record> = rows
            .iter()
            .filter_map(|row| {
                let record = record_from_row(&mapping, row);
                if record.summary_file.trim().is_empty() {
                    skipped += 1;
                    None
                } else {
                    Some(record)
                }
            })
            .collect();

        records.sort_by(|left, right| {
            natural_cmp(left.summary_file.trim(), right.summary_file.trim())
        });

        debug!(
            rows = rows.len(),
            records = records.len(),
            skipped_blank = skipped,
            "normalized rows"
        );
        records
    }
}

/// Normalize with the default configuration.
pub fn normalize(header: &[Cell], rows: &[Vec<Cell>]) -> Vec<Record> {
    RowNormalizer::default().normalize(header, rows)
}

/// Coerce one raw row into a record using `mapping`.
pub fn record_from_row(mapping: &ColumnMapping, row: &[Cell]) -> Record {
    let text = |field: RecordField| {
        mapping
            .cell(row, field)
            .map(Cell::as_text)
            .unwrap_or_default()
    };
    let int = |field: RecordField| mapping.cell(row, field).and_then(Cell::as_int);

    Record {
        summary_file: text(RecordField::SummaryFile),
        similarity_score: mapping
            .cell(row, RecordField::SimilarityScore)
            .and_then(Cell::as_float),
        reference_summary: text(RecordField::ReferenceSummary),
        generated_summary: text(RecordField::GeneratedSummary),
        summary: text(RecordField::Summary),
        comment: text(RecordField::Comment),
        relevance: int(RecordField::Relevance).and_then(Relevance::from_code),
        contribution: int(RecordField::Contribution).and_then(Contribution::from_code),
        contribution_score: int(RecordField::ContributionScore)
            .and_then(normalize_contribution_score),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cells(values: &[&str]) -> Vec<Cell> {
        values.iter().map(|value| Cell::from(*value)).collect()
    }

    fn canonical_header() -> Vec<Cell> {
        cells(&[
            "Summary_File",
            "Similarity_Score",
            "Reference_Summary",
            "Generated_Summary",
            "Summary",
            "Comment",
            "Relevance",
            "Contribution",
            "Contribution_Score",
        ])
    }

    #[test]
    fn score_normalization_handles_percent_scale() {
        assert_eq!(normalize_contribution_score(8), Some(8));
        assert_eq!(normalize_contribution_score(1), Some(1));
        assert_eq!(normalize_contribution_score(10), Some(10));
        assert_eq!(normalize_contribution_score(80), Some(8));
        assert_eq!(normalize_contribution_score(100), Some(10));
        assert_eq!(normalize_contribution_score(20), Some(2));
        assert_eq!(normalize_contribution_score(11), Some(10));
        assert_eq!(normalize_contribution_score(85), Some(10));
        assert_eq!(normalize_contribution_score(110), Some(10));
        assert_eq!(normalize_contribution_score(0), None);
        assert_eq!(normalize_contribution_score(-4), None);
    }

    #[test]
    fn score_cells_normalize_from_text() {
        let header = canonical_header();
        let row = |score: &str| cells(&["f", "", "", "", "S", "C", "0", "1", score]);
        let records = normalize(&header, &[row("80"), row("11"), row("0"), row("abc")]);
        let scores: Vec<Option<u8>> = records.iter().map(|r| r.contribution_score).collect();
        assert_eq!(scores, vec![Some(8), Some(10), None, None]);
    }

    #[test]
    fn header_aliases_resolve_out_of_order_columns() {
        let header = cells(&["comment", "SCORE", "summary file", "Summary", "relevance"]);
        let mapping = ColumnMapping::resolve(&header, &ColumnAliases::default(), false);
        assert_eq!(mapping.source(RecordField::Comment), ColumnSource::Header(0));
        assert_eq!(
            mapping.source(RecordField::ContributionScore),
            ColumnSource::Header(1)
        );
        assert_eq!(mapping.source(RecordField::SummaryFile), ColumnSource::Header(2));
        assert_eq!(mapping.source(RecordField::Summary), ColumnSource::Header(3));
        assert_eq!(mapping.source(RecordField::Relevance), ColumnSource::Header(4));
        assert_eq!(
            mapping.source(RecordField::Contribution),
            ColumnSource::Positional(7)
        );

        let records = normalize(
            &header,
            &[cells(&["looks fine", "9", "doc_3", "the summary", "1"])],
        );
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].summary_file, "doc_3");
        assert_eq!(records[0].comment, "looks fine");
        assert_eq!(records[0].contribution_score, Some(9));
        assert_eq!(records[0].relevance, Some(Relevance::NotMapping));
    }

    #[test]
    fn missing_headers_fall_back_to_positions() {
        let header = cells(&["a", "b", "c", "d", "e", "f", "g", "h", "i"]);
        assert_eq!(
            ColumnMapping::resolve(&header, &ColumnAliases::default(), false),
            ColumnMapping::positional()
        );
        let records = normalize(
            &header,
            &[cells(&["doc", "0.4", "ref", "gen", "sum", "com", "1", "0", ""])],
        );
        let record = &records[0];
        assert_eq!(record.similarity_score, Some(0.4));
        assert_eq!(record.reference_summary, "ref");
        assert_eq!(record.generated_summary, "gen");
        assert_eq!(record.relevance, Some(Relevance::NotMapping));
        assert_eq!(record.contribution, Some(Contribution::Generic));
        assert_eq!(record.contribution_score, None);
    }

    #[test]
    fn positional_fallback_skips_columns_claimed_by_headers() {
        let header = cells(&["Summary_File", "Summary", "Comment", "Relevance", "Contribution"]);
        let mapping = ColumnMapping::resolve(&header, &ColumnAliases::default(), false);
        assert_eq!(mapping.source(RecordField::SimilarityScore), ColumnSource::Absent);
        assert_eq!(mapping.source(RecordField::ReferenceSummary), ColumnSource::Absent);
        assert_eq!(mapping.source(RecordField::GeneratedSummary), ColumnSource::Absent);
        assert_eq!(
            mapping.source(RecordField::ContributionScore),
            ColumnSource::Positional(8)
        );

        let records = normalize(
            &header,
            &[cells(&["doc_1", "3 findings", "nice work", "1", "0"])],
        );
        let record = &records[0];
        assert_eq!(record.similarity_score, None);
        assert_eq!(record.reference_summary, "");
        assert_eq!(record.generated_summary, "");
        assert_eq!(record.summary, "3 findings");
        assert_eq!(record.comment, "nice work");
        assert_eq!(record.relevance, Some(Relevance::NotMapping));
        assert_eq!(record.contribution, Some(Contribution::Generic));
    }

    #[test]
    fn case_sensitive_matching_rejects_other_casing() {
        let header = cells(&["COMMENT", "Summary_File"]);
        let mapping = ColumnMapping::resolve(&header, &ColumnAliases::default(), true);
        assert_eq!(mapping.source(RecordField::Comment), ColumnSource::Positional(5));
        let mapping = ColumnMapping::resolve(&header, &ColumnAliases::default(), false);
        assert_eq!(mapping.source(RecordField::Comment), ColumnSource::Header(0));
    }

    #[test]
    fn coercion_failures_keep_the_row() {
        let records = normalize(
            &canonical_header(),
            &[cells(&["doc", "n/a", "", "", "S", "", "yes", "2", "x"])],
        );
        assert_eq!(records.len(), 1);
        let record = &records[0];
        assert_eq!(record.similarity_score, None);
        assert_eq!(record.relevance, None);
        assert_eq!(record.contribution, None);
        assert_eq!(record.contribution_score, None);
    }

    #[test]
    fn blank_summary_file_rows_are_dropped_and_short_rows_padded() {
        let records = normalize(
            &canonical_header(),
            &[
                cells(&["", "0.1", "", "", "S", "C"]),
                Vec::new(),
                cells(&["doc_1"]),
            ],
        );
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].summary_file, "doc_1");
        assert_eq!(records[0].summary, "");
        assert_eq!(records[0].relevance, None);
    }

    #[test]
    fn numeric_cells_and_numeric_strings_produce_same_record() {
        let header = canonical_header();
        let text_row = cells(&["doc", "0.5", "", "", "S", "C", "1", "1", "7"]);
        let numeric_row = vec![
            Cell::from("doc"),
            Cell::from(0.5),
            Cell::Empty,
            Cell::Empty,
            Cell::from("S"),
            Cell::from("C"),
            Cell::from(1.0),
            Cell::from(1.0),
            Cell::from(7.0),
        ];
        assert_eq!(normalize(&header, &[text_row]), normalize(&header, &[numeric_row]));
    }

    #[test]
    fn records_sort_by_summary_file_numerically() {
        let header = canonical_header();
        let rows: Vec<Vec<Cell>> = ["file10", " file2", "File1", "file2"]
            .iter()
            .enumerate()
            .map(|(idx, name)| cells(&[*name, "", "", "", "S", format!("c{idx}").as_str()]))
            .collect();
        let records = normalize(&header, &rows);
        let order: Vec<&str> = records.iter().map(|r| r.comment.as_str()).collect();
        assert_eq!(order, vec!["c2", "c1", "c3", "c0"]);
    }
}

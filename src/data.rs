use serde::{Deserialize, Serialize};

use crate::utils::{parse_leading_float, parse_leading_int};

pub use crate::types::{CommentText, SummaryFileKey, SummaryText};

/// One raw cell handed over by the tabular codec.
///
/// Spreadsheets deliver numbers and numeric strings interchangeably depending
/// on the import path; the coercion helpers treat both the same.
#[derive(Clone, Debug, Default, PartialEq)]
pub enum Cell {
    /// Missing or blank cell.
    #[default]
    Empty,
    /// Text cell, possibly holding a numeric string.
    Text(String),
    /// Numeric cell.
    Number(f64),
    /// Boolean cell.
    Bool(bool),
}

impl Cell {
    /// Build a cell from text, mapping the empty string to [`Cell::Empty`].
    pub fn text(value: impl Into<String>) -> Self {
        let value = value.into();
        if value.is_empty() {
            Cell::Empty
        } else {
            Cell::Text(value)
        }
    }

    /// True for [`Cell::Empty`] and whitespace-only text.
    pub fn is_blank(&self) -> bool {
        match self {
            Cell::Empty => true,
            Cell::Text(text) => text.trim().is_empty(),
            Cell::Number(_) | Cell::Bool(_) => false,
        }
    }

    /// Text rendering used for free-text fields; empty for blank cells.
    pub fn as_text(&self) -> String {
        match self {
            Cell::Empty => String::new(),
            Cell::Text(text) => text.clone(),
            Cell::Number(value) => format_number(*value),
            Cell::Bool(value) => value.to_string(),
        }
    }

    /// Lenient integer coercion: numbers truncate, text parses its leading integer.
    pub fn as_int(&self) -> Option<i64> {
        match self {
            Cell::Empty | Cell::Bool(_) => None,
            Cell::Text(text) => parse_leading_int(text),
            Cell::Number(value) if value.is_finite() => Some(value.trunc() as i64),
            Cell::Number(_) => None,
        }
    }

    /// Lenient float coercion: text parses its leading decimal number.
    pub fn as_float(&self) -> Option<f64> {
        match self {
            Cell::Empty | Cell::Bool(_) => None,
            Cell::Text(text) => parse_leading_float(text),
            Cell::Number(value) if value.is_finite() => Some(*value),
            Cell::Number(_) => None,
        }
    }
}

impl From<&str> for Cell {
    fn from(value: &str) -> Self {
        Cell::text(value)
    }
}

impl From<String> for Cell {
    fn from(value: String) -> Self {
        Cell::text(value)
    }
}

impl From<f64> for Cell {
    fn from(value: f64) -> Self {
        Cell::Number(value)
    }
}

impl From<i64> for Cell {
    fn from(value: i64) -> Self {
        Cell::Number(value as f64)
    }
}

/// Raw tabular payload produced by the spreadsheet codec.
///
/// `header` is the first sheet row; `rows` holds every following row as read.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct RawTable {
    /// Header cells.
    pub header: Vec<Cell>,
    /// Data rows, possibly ragged.
    pub rows: Vec<Vec<Cell>>,
}

impl RawTable {
    /// Split a 2D grid into header and data rows; an empty grid yields an empty table.
    pub fn from_grid(mut grid: Vec<Vec<Cell>>) -> Self {
        if grid.is_empty() {
            return Self::default();
        }
        let header = grid.remove(0);
        Self { header, rows: grid }
    }
}

fn format_number(value: f64) -> String {
    if value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{}", value as i64)
    } else {
        value.to_string()
    }
}

/// Relevance label: does the comment map onto the summary.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "u8", try_from = "u8")]
pub enum Relevance {
    /// `0` - the comment maps onto the summary.
    Mapping,
    /// `1` - the comment does not map onto the summary.
    NotMapping,
}

impl Relevance {
    /// Integer code used in flat files.
    pub fn code(self) -> u8 {
        match self {
            Relevance::Mapping => 0,
            Relevance::NotMapping => 1,
        }
    }

    /// Decode an integer label, `None` outside `{0, 1}`.
    pub fn from_code(code: i64) -> Option<Self> {
        match code {
            0 => Some(Relevance::Mapping),
            1 => Some(Relevance::NotMapping),
            _ => None,
        }
    }

    /// Display label shown next to the code.
    pub fn label(self) -> &'static str {
        match self {
            Relevance::Mapping => "Mapping",
            Relevance::NotMapping => "Not Mapping",
        }
    }
}

impl From<Relevance> for u8 {
    fn from(value: Relevance) -> Self {
        value.code()
    }
}

impl TryFrom<u8> for Relevance {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Relevance::from_code(i64::from(value))
            .ok_or_else(|| format!("relevance must be 0 or 1, got {value}"))
    }
}

/// Contribution label: is the comment generic or constructive.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "u8", try_from = "u8")]
pub enum Contribution {
    /// `0` - generic comment; no score is expected.
    Generic,
    /// `1` - constructive comment; requires a 1-10 score.
    Constructive,
}

impl Contribution {
    /// Integer code used in flat files.
    pub fn code(self) -> u8 {
        match self {
            Contribution::Generic => 0,
            Contribution::Constructive => 1,
        }
    }

    /// Decode an integer label, `None` outside `{0, 1}`.
    pub fn from_code(code: i64) -> Option<Self> {
        match code {
            0 => Some(Contribution::Generic),
            1 => Some(Contribution::Constructive),
            _ => None,
        }
    }

    /// Display label shown next to the code.
    pub fn label(self) -> &'static str {
        match self {
            Contribution::Generic => "Generic",
            Contribution::Constructive => "Constructive",
        }
    }
}

impl From<Contribution> for u8 {
    fn from(value: Contribution) -> Self {
        value.code()
    }
}

impl TryFrom<u8> for Contribution {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Contribution::from_code(i64::from(value))
            .ok_or_else(|| format!("contribution must be 0 or 1, got {value}"))
    }
}

/// One labeling row: a single comment tied to a summary.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Record {
    /// Source summary document; export grouping key.
    pub summary_file: SummaryFileKey,
    /// Similarity score, `None` when the cell was blank or unparseable.
    pub similarity_score: Option<f64>,
    /// Human-written reference summary.
    pub reference_summary: String,
    /// Model-generated summary.
    pub generated_summary: String,
    /// Summary shown to the annotator; navigation grouping key.
    pub summary: SummaryText,
    /// Reviewer comment being labeled.
    pub comment: CommentText,
    /// Relevance label, `None` when unset.
    pub relevance: Option<Relevance>,
    /// Contribution label, `None` when unset.
    pub contribution: Option<Contribution>,
    /// Contribution score. Set values are 1-10; `0` marks an explicitly cleared score.
    pub contribution_score: Option<u8>,
}

impl Record {
    /// Apply `patch` on top of this record and return the merged result.
    pub fn merged(&self, patch: &RecordPatch) -> Record {
        let mut next = self.clone();
        next.merge(patch);
        next
    }

    /// Apply `patch` in place. Patch fields override; unspecified fields are kept.
    pub fn merge(&mut self, patch: &RecordPatch) {
        if let Some(value) = &patch.summary_file {
            self.summary_file = value.clone();
        }
        if let Some(value) = patch.similarity_score {
            self.similarity_score = value;
        }
        if let Some(value) = &patch.reference_summary {
            self.reference_summary = value.clone();
        }
        if let Some(value) = &patch.generated_summary {
            self.generated_summary = value.clone();
        }
        if let Some(value) = &patch.summary {
            self.summary = value.clone();
        }
        if let Some(value) = &patch.comment {
            self.comment = value.clone();
        }
        if let Some(value) = patch.relevance {
            self.relevance = value;
        }
        if let Some(value) = patch.contribution {
            self.contribution = value;
        }
        if let Some(value) = patch.contribution_score {
            self.contribution_score = value;
        }
    }
}

/// Typed partial update for a [`Record`].
///
/// Outer `None` leaves the field untouched; `Some(None)` clears an optional
/// label back to unset.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct RecordPatch {
    /// Replacement summary file.
    pub summary_file: Option<SummaryFileKey>,
    /// Replacement similarity score.
    pub similarity_score: Option<Option<f64>>,
    /// Replacement reference summary.
    pub reference_summary: Option<String>,
    /// Replacement generated summary.
    pub generated_summary: Option<String>,
    /// Replacement summary text.
    pub summary: Option<SummaryText>,
    /// Replacement comment text.
    pub comment: Option<CommentText>,
    /// Replacement relevance label.
    pub relevance: Option<Option<Relevance>>,
    /// Replacement contribution label.
    pub contribution: Option<Option<Contribution>>,
    /// Replacement contribution score.
    pub contribution_score: Option<Option<u8>>,
}

impl RecordPatch {
    /// Empty patch; merging it is a no-op.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set or clear the relevance label.
    pub fn with_relevance(mut self, relevance: Option<Relevance>) -> Self {
        self.relevance = Some(relevance);
        self
    }

    /// Set or clear the contribution label.
    pub fn with_contribution(mut self, contribution: Option<Contribution>) -> Self {
        self.contribution = Some(contribution);
        self
    }

    /// Set or clear the contribution score.
    pub fn with_contribution_score(mut self, score: Option<u8>) -> Self {
        self.contribution_score = Some(score);
        self
    }

    /// Replace the comment text.
    pub fn with_comment(mut self, comment: impl Into<CommentText>) -> Self {
        self.comment = Some(comment.into());
        self
    }

    /// True when the patch changes nothing.
    pub fn is_empty(&self) -> bool {
        self == &RecordPatch::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn labeled_record() -> Record {
        Record {
            summary_file: "doc_1".to_string(),
            similarity_score: Some(0.5),
            summary: "A".to_string(),
            comment: "needs ablation".to_string(),
            relevance: Some(Relevance::Mapping),
            contribution: Some(Contribution::Constructive),
            contribution_score: Some(7),
            ..Record::default()
        }
    }

    #[test]
    fn numeric_string_and_number_cells_coerce_identically() {
        assert_eq!(Cell::from("1").as_int(), Cell::from(1.0).as_int());
        assert_eq!(Cell::from(" 7 ").as_int(), Some(7));
        assert_eq!(Cell::from(7.9).as_int(), Some(7));
        assert_eq!(Cell::from("0.75").as_float(), Cell::from(0.75).as_float());
        assert_eq!(Cell::Empty.as_int(), None);
        assert_eq!(Cell::Bool(true).as_int(), None);
    }

    #[test]
    fn cell_text_renders_integral_numbers_without_fraction() {
        assert_eq!(Cell::from(12.0).as_text(), "12");
        assert_eq!(Cell::from(0.25).as_text(), "0.25");
        assert_eq!(Cell::from("").as_text(), "");
        assert!(Cell::from("   ").is_blank());
        assert!(!Cell::from(0.0).is_blank());
    }

    #[test]
    fn raw_table_splits_header_from_rows() {
        let table = RawTable::from_grid(vec![
            vec![Cell::from("Summary_File")],
            vec![Cell::from("doc_1")],
        ]);
        assert_eq!(table.header, vec![Cell::from("Summary_File")]);
        assert_eq!(table.rows.len(), 1);
        assert_eq!(RawTable::from_grid(Vec::new()), RawTable::default());
    }

    #[test]
    fn label_codes_round_trip_through_integers() {
        assert_eq!(Relevance::from_code(0), Some(Relevance::Mapping));
        assert_eq!(Relevance::from_code(2), None);
        assert_eq!(Contribution::from_code(1), Some(Contribution::Constructive));
        assert_eq!(Contribution::Generic.label(), "Generic");
        assert_eq!(Relevance::NotMapping.label(), "Not Mapping");
    }

    #[test]
    fn labels_serialize_as_integers() {
        let json = serde_json::to_string(&labeled_record()).unwrap();
        assert!(json.contains("\"relevance\":0"));
        assert!(json.contains("\"contribution\":1"));
        let back: Record = serde_json::from_str(&json).unwrap();
        assert_eq!(back, labeled_record());
        assert!(serde_json::from_str::<Relevance>("3").is_err());
    }

    #[test]
    fn merge_overrides_only_patched_fields() {
        let base = labeled_record();
        let patch = RecordPatch::new().with_contribution(Some(Contribution::Generic));
        let merged = base.merged(&patch);
        assert_eq!(merged.contribution, Some(Contribution::Generic));
        assert_eq!(merged.contribution_score, Some(7));
        assert_eq!(merged.comment, base.comment);
        assert_eq!(merged.relevance, base.relevance);
    }

    #[test]
    fn merge_can_clear_labels() {
        let base = labeled_record();
        let patch = RecordPatch::new()
            .with_relevance(None)
            .with_contribution_score(None);
        let merged = base.merged(&patch);
        assert_eq!(merged.relevance, None);
        assert_eq!(merged.contribution_score, None);
        assert_eq!(merged.contribution, Some(Contribution::Constructive));
    }

    #[test]
    fn empty_patch_is_noop() {
        let patch = RecordPatch::new();
        assert!(patch.is_empty());
        assert_eq!(labeled_record().merged(&patch), labeled_record());
        assert!(!RecordPatch::new().with_comment("x").is_empty());
    }
}

use std::borrow::Cow;

use crate::constants::files::{
    DEFAULT_CSV_NAME, DEFAULT_JSON_NAME, DEFAULT_SHEET_NAME, DEFAULT_XLSX_NAME,
};

/// Logical record fields, in canonical column order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum RecordField {
    /// `Summary_File`
    SummaryFile,
    /// `Similarity_Score`
    SimilarityScore,
    /// `Reference_Summary`
    ReferenceSummary,
    /// `Generated_Summary`
    GeneratedSummary,
    /// `Summary`
    Summary,
    /// `Comment`
    Comment,
    /// `Relevance`
    Relevance,
    /// `Contribution`
    Contribution,
    /// `Contribution_Score`
    ContributionScore,
}

impl RecordField {
    /// All fields in canonical column order.
    pub const ALL: [RecordField; 9] = [
        RecordField::SummaryFile,
        RecordField::SimilarityScore,
        RecordField::ReferenceSummary,
        RecordField::GeneratedSummary,
        RecordField::Summary,
        RecordField::Comment,
        RecordField::Relevance,
        RecordField::Contribution,
        RecordField::ContributionScore,
    ];

    /// Positional column used when no header alias matches.
    pub fn fallback_index(self) -> usize {
        match self {
            RecordField::SummaryFile => 0,
            RecordField::SimilarityScore => 1,
            RecordField::ReferenceSummary => 2,
            RecordField::GeneratedSummary => 3,
            RecordField::Summary => 4,
            RecordField::Comment => 5,
            RecordField::Relevance => 6,
            RecordField::Contribution => 7,
            RecordField::ContributionScore => 8,
        }
    }
}

/// Accepted header spellings per logical field.
///
/// Matching ignores case and every non-alphanumeric character, so
/// `"contribution score"` and `"Contribution_Score"` are the same alias.
#[derive(Clone, Debug)]
pub struct ColumnAliases {
    /// Aliases for [`RecordField::SummaryFile`].
    pub summary_file: Vec<Cow<'static, str>>,
    /// Aliases for [`RecordField::SimilarityScore`].
    pub similarity_score: Vec<Cow<'static, str>>,
    /// Aliases for [`RecordField::ReferenceSummary`].
    pub reference_summary: Vec<Cow<'static, str>>,
    /// Aliases for [`RecordField::GeneratedSummary`].
    pub generated_summary: Vec<Cow<'static, str>>,
    /// Aliases for [`RecordField::Summary`].
    pub summary: Vec<Cow<'static, str>>,
    /// Aliases for [`RecordField::Comment`].
    pub comment: Vec<Cow<'static, str>>,
    /// Aliases for [`RecordField::Relevance`].
    pub relevance: Vec<Cow<'static, str>>,
    /// Aliases for [`RecordField::Contribution`].
    pub contribution: Vec<Cow<'static, str>>,
    /// Aliases for [`RecordField::ContributionScore`].
    pub contribution_score: Vec<Cow<'static, str>>,
}

impl ColumnAliases {
    /// Aliases registered for `field`.
    pub fn for_field(&self, field: RecordField) -> &[Cow<'static, str>] {
        match field {
            RecordField::SummaryFile => &self.summary_file,
            RecordField::SimilarityScore => &self.similarity_score,
            RecordField::ReferenceSummary => &self.reference_summary,
            RecordField::GeneratedSummary => &self.generated_summary,
            RecordField::Summary => &self.summary,
            RecordField::Comment => &self.comment,
            RecordField::Relevance => &self.relevance,
            RecordField::Contribution => &self.contribution,
            RecordField::ContributionScore => &self.contribution_score,
        }
    }
}

impl Default for ColumnAliases {
    fn default() -> Self {
        Self {
            summary_file: vec!["summary_file".into(), "summary file".into(), "file".into()],
            similarity_score: vec![
                "similarity_score".into(),
                "similarity score".into(),
                "similarity".into(),
            ],
            reference_summary: vec![
                "reference_summary".into(),
                "reference summary".into(),
                "reference".into(),
            ],
            generated_summary: vec![
                "generated_summary".into(),
                "generated summary".into(),
                "generated".into(),
            ],
            summary: vec!["summary".into()],
            comment: vec!["comment".into(), "comments".into()],
            relevance: vec!["relevance".into()],
            contribution: vec!["contribution".into()],
            contribution_score: vec![
                "contribution_score".into(),
                "contribution score".into(),
                "score".into(),
            ],
        }
    }
}

/// Default output names used by exporters when the caller gives none.
#[derive(Clone, Debug)]
pub struct ExportNames {
    /// Flat workbook file name.
    pub xlsx_file: Cow<'static, str>,
    /// Flat CSV file name.
    pub csv_file: Cow<'static, str>,
    /// Grouped JSON file name.
    pub json_file: Cow<'static, str>,
    /// Worksheet name inside the flat workbook.
    pub sheet_name: Cow<'static, str>,
}

impl Default for ExportNames {
    fn default() -> Self {
        Self {
            xlsx_file: DEFAULT_XLSX_NAME.into(),
            csv_file: DEFAULT_CSV_NAME.into(),
            json_file: DEFAULT_JSON_NAME.into(),
            sheet_name: DEFAULT_SHEET_NAME.into(),
        }
    }
}

/// Top-level labeler configuration.
#[derive(Clone, Debug)]
pub struct LabelerConfig {
    /// Header aliases used to resolve import columns.
    pub aliases: ColumnAliases,
    /// Match header aliases case-sensitively when true.
    pub case_sensitive_headers: bool,
    /// Default export file and sheet names.
    pub export: ExportNames,
}

impl Default for LabelerConfig {
    fn default() -> Self {
        Self {
            aliases: ColumnAliases::default(),
            case_sensitive_headers: false,
            export: ExportNames::default(),
        }
    }
}

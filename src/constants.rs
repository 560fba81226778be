//! Centralized constants for column layout, label domains, and export defaults.

/// Canonical flat column names, in export order.
pub mod columns {
    /// Source summary document identifier.
    pub const SUMMARY_FILE: &str = "Summary_File";
    /// Similarity between reference and generated summary.
    pub const SIMILARITY_SCORE: &str = "Similarity_Score";
    /// Human-written reference summary.
    pub const REFERENCE_SUMMARY: &str = "Reference_Summary";
    /// Model-generated summary.
    pub const GENERATED_SUMMARY: &str = "Generated_Summary";
    /// Summary text shown to the annotator.
    pub const SUMMARY: &str = "Summary";
    /// Reviewer comment being labeled.
    pub const COMMENT: &str = "Comment";
    /// Relevance label column.
    pub const RELEVANCE: &str = "Relevance";
    /// Contribution label column.
    pub const CONTRIBUTION: &str = "Contribution";
    /// Contribution score column (1-10).
    pub const CONTRIBUTION_SCORE: &str = "Contribution_Score";

    /// All flat columns in canonical order. Positional fallback uses these indices.
    pub const FLAT_COLUMNS: [&str; 9] = [
        SUMMARY_FILE,
        SIMILARITY_SCORE,
        REFERENCE_SUMMARY,
        GENERATED_SUMMARY,
        SUMMARY,
        COMMENT,
        RELEVANCE,
        CONTRIBUTION,
        CONTRIBUTION_SCORE,
    ];
}

/// Label domain bounds.
pub mod labels {
    /// Lowest valid contribution score.
    pub const SCORE_MIN: i64 = 1;
    /// Highest valid contribution score.
    pub const SCORE_MAX: i64 = 10;
    /// Upper bound of the legacy percent scale (80 -> 8, 100 -> 10).
    pub const PERCENT_SCALE_MAX: i64 = 100;
    /// Decimal places kept on averaged similarity scores.
    pub const AVERAGE_DECIMALS: i32 = 6;
}

/// Import/export file defaults.
pub mod files {
    /// Extensions accepted by the import codec (compared case-insensitively).
    pub const IMPORT_EXTENSIONS: [&str; 3] = ["xlsx", "xls", "csv"];
    /// Default flat workbook file name.
    pub const DEFAULT_XLSX_NAME: &str = "labeled_data.xlsx";
    /// Default flat CSV file name.
    pub const DEFAULT_CSV_NAME: &str = "labeled_data.csv";
    /// Default grouped JSON file name.
    pub const DEFAULT_JSON_NAME: &str = "comment_labeling.json";
    /// Worksheet name used for flat workbook exports.
    pub const DEFAULT_SHEET_NAME: &str = "Labeled Data";
}

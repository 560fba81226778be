/// Identifier of the source summary document; stable grouping key for export.
/// Example: `doc_0012.txt`
pub type SummaryFileKey = String;
/// Free-text summary shown to the annotator; grouping key for navigation.
/// Example: `The paper proposes a retrieval-augmented summarizer.`
pub type SummaryText = String;
/// Free-text reviewer comment attached to one summary.
/// Example: `The method section lacks an ablation.`
pub type CommentText = String;
/// Header text lowered and stripped of non-alphanumeric characters.
/// Example: `contributionscore`
pub type HeaderKey = String;
/// Zero-based position of a record inside the working set.
pub type RowIndex = usize;

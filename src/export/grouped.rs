//! Grouped export: one item per `summary_file` with nested comments.

use serde::{Deserialize, Serialize};

use crate::constants::labels::AVERAGE_DECIMALS;
use crate::data::{Contribution, Record, Relevance};
use crate::grouping::{GroupKeySelector, group_records};
use crate::types::{CommentText, SummaryFileKey};
use crate::utils::round_to;

/// One comment nested under its summary file.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GroupedComment {
    pub comment: CommentText,
    pub relevance: Option<Relevance>,
    pub contribution: Option<Contribution>,
}

/// Aggregated view of every record sharing a summary file.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GroupedItem {
    pub summary_file: SummaryFileKey,
    pub reference_summary: String,
    pub generated_summary: String,
    pub summary: String,
    /// Mean of the members' similarity scores, rounded to six places; `None`
    /// when no member has a score.
    pub average_similarity_score: Option<f64>,
    pub comments: Vec<GroupedComment>,
    pub comment_count: usize,
    pub has_multiple_comments: bool,
}

/// Document-level counts.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupedTotals {
    pub rows: usize,
    pub groups: usize,
    pub multi_comment_groups: usize,
}

/// Nested export document.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GroupedDocument {
    pub items: Vec<GroupedItem>,
    /// Summary files with more than one comment, in item order.
    #[serde(rename = "multi_comment_summaries")]
    pub multi_comment_summary_files: Vec<SummaryFileKey>,
    pub totals: GroupedTotals,
}

/// Fold `records` into one item per distinct `summary_file`, first-seen order.
pub fn build_grouped_export(records: &[Record]) -> GroupedDocument {
    let items: Vec<GroupedItem> = group_records(records, GroupKeySelector::SummaryFile)
        .into_iter()
        .map(|group| {
            let base = group.members[0];
            let comments: Vec<GroupedComment> = group
                .members
                .iter()
                .map(|member| GroupedComment {
                    comment: member.comment.clone(),
                    relevance: member.relevance,
                    contribution: member.contribution,
                })
                .collect();
            let comment_count = comments.len();
            GroupedItem {
                summary_file: base.summary_file.clone(),
                reference_summary: base.reference_summary.clone(),
                generated_summary: base.generated_summary.clone(),
                summary: base.summary.clone(),
                average_similarity_score: average_similarity(&group.members),
                comments,
                comment_count,
                has_multiple_comments: comment_count > 1,
            }
        })
        .collect();

    let multi_comment_summary_files: Vec<SummaryFileKey> = items
        .iter()
        .filter(|item| item.has_multiple_comments)
        .map(|item| item.summary_file.clone())
        .collect();

    GroupedDocument {
        totals: GroupedTotals {
            rows: records.len(),
            groups: items.len(),
            multi_comment_groups: multi_comment_summary_files.len(),
        },
        items,
        multi_comment_summary_files,
    }
}

fn average_similarity(members: &[&Record]) -> Option<f64> {
    let scores: Vec<f64> = members
        .iter()
        .filter_map(|member| member.similarity_score)
        .collect();
    if scores.is_empty() {
        return None;
    }
    let mean = scores.iter().sum::<f64>() / scores.len() as f64;
    Some(round_to(mean, AVERAGE_DECIMALS))
}

/// Indented JSON rendering with struct field order as key order.
pub fn to_json_pretty(document: &GroupedDocument) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(document)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(file: &str, comment: &str, score: Option<f64>) -> Record {
        Record {
            summary_file: file.to_string(),
            similarity_score: score,
            reference_summary: format!("ref {file}"),
            generated_summary: format!("gen {file}"),
            summary: format!("sum {file}"),
            comment: comment.to_string(),
            relevance: Some(Relevance::Mapping),
            contribution: Some(Contribution::Constructive),
            contribution_score: Some(4),
        }
    }

    #[test]
    fn groups_by_summary_file_with_averages() {
        let records = vec![
            record("doc_2", "x", Some(0.2)),
            record("doc_1", "a", Some(0.1)),
            record("doc_2", "y", None),
            record("doc_2", "z", Some(0.3)),
        ];
        let doc = build_grouped_export(&records);
        assert_eq!(doc.items.len(), 2);
        assert_eq!(doc.items[0].summary_file, "doc_2");
        assert_eq!(doc.items[0].comment_count, 3);
        assert!(doc.items[0].has_multiple_comments);
        assert_eq!(doc.items[0].average_similarity_score, Some(0.25));
        assert_eq!(doc.items[1].average_similarity_score, Some(0.1));
        assert!(!doc.items[1].has_multiple_comments);
        assert_eq!(doc.multi_comment_summary_files, vec!["doc_2".to_string()]);
        assert_eq!(
            doc.totals,
            GroupedTotals {
                rows: 4,
                groups: 2,
                multi_comment_groups: 1
            }
        );
    }

    #[test]
    fn average_is_none_without_scores_and_rounded_otherwise() {
        let doc = build_grouped_export(&[record("a", "c", None)]);
        assert_eq!(doc.items[0].average_similarity_score, None);

        let doc = build_grouped_export(&[
            record("b", "c1", Some(1.0)),
            record("b", "c2", Some(0.0)),
            record("b", "c3", Some(0.0)),
        ]);
        assert_eq!(doc.items[0].average_similarity_score, Some(0.333333));
    }

    #[test]
    fn comment_totals_match_row_count() {
        let records: Vec<Record> = (0..17)
            .map(|idx| record(&format!("doc_{}", idx % 5), "c", Some(idx as f64)))
            .collect();
        let doc = build_grouped_export(&records);
        let comments: usize = doc.items.iter().map(|item| item.comments.len()).sum();
        assert_eq!(comments, doc.totals.rows);
        assert_eq!(doc.items.len(), doc.totals.groups);
        assert_eq!(doc.totals.rows, 17);
    }

    #[test]
    fn empty_input_is_well_formed() {
        let doc = build_grouped_export(&[]);
        assert!(doc.items.is_empty());
        let json = to_json_pretty(&doc).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["totals"]["rows"], 0);
        assert_eq!(value["multi_comment_summaries"], serde_json::json!([]));
    }

    #[test]
    fn json_keeps_key_order_and_omits_scores_from_comments() {
        let json = to_json_pretty(&build_grouped_export(&[record("doc", "c", Some(0.5))])).unwrap();
        let items_at = json.find("\"items\"").unwrap();
        let multi_at = json.find("\"multi_comment_summaries\"").unwrap();
        let totals_at = json.find("\"totals\"").unwrap();
        assert!(items_at < multi_at && multi_at < totals_at);
        assert!(!json.contains("contribution_score"));
        assert!(json.contains("\n  "));
    }
}

use serde::Serialize;

use crate::completeness::{is_group_labeled, is_labeled};
use crate::data::Record;
use crate::grouping::{GroupKeySelector, group_records};

/// Aggregate labeling progress over a record set.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct LabelingProgress {
    pub total: usize,
    pub labeled: usize,
    pub unlabeled: usize,
    /// Share of labeled records in percent; `0.0` for an empty set.
    pub percent: f64,
    /// Distinct summary groups.
    pub groups: usize,
    pub labeled_groups: usize,
}

/// Compute progress counts for `records`. Groups are keyed by summary text.
pub fn labeling_progress(records: &[Record]) -> LabelingProgress {
    let total = records.len();
    let labeled = records.iter().filter(|record| is_labeled(record)).count();
    let groups = group_records(records, GroupKeySelector::Summary);
    let labeled_groups = groups
        .iter()
        .filter(|group| is_group_labeled(group.members.iter().copied()))
        .count();
    let percent = if total == 0 {
        0.0
    } else {
        labeled as f64 / total as f64 * 100.0
    };
    LabelingProgress {
        total,
        labeled,
        unlabeled: total - labeled,
        percent,
        groups: groups.len(),
        labeled_groups,
    }
}

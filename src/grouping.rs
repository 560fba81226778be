//! Order-preserving grouping of records by a caller-chosen key.
//!
//! The first occurrence of a key opens a group at that position (its anchor);
//! later occurrences join the existing group even when other keys appear in
//! between. Navigation groups by `summary`, export groups by `summary_file`,
//! so the key is a parameter rather than a fixed field.

use std::hash::Hash;

use indexmap::IndexMap;

use crate::data::Record;
use crate::types::RowIndex;

/// One group of items sharing a key.
#[derive(Clone, Debug, PartialEq)]
pub struct Group<'a, T, K> {
    /// Shared key.
    pub key: K,
    /// Index of the first member in the source sequence.
    pub anchor_index: RowIndex,
    /// Source indices of every member, ascending.
    pub indices: Vec<RowIndex>,
    /// Members in source order.
    pub members: Vec<&'a T>,
}

impl<T, K> Group<'_, T, K> {
    /// Number of members.
    pub fn len(&self) -> usize {
        self.members.len()
    }

    /// True when the group has no members. Never the case for built groups.
    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    /// True when `index` belongs to this group.
    pub fn contains_index(&self, index: RowIndex) -> bool {
        self.indices.binary_search(&index).is_ok()
    }
}

/// Group `items` by `key_fn` in a single pass, ordered by first appearance.
pub fn build_groups<'a, T, K, F>(items: &'a [T], key_fn: F) -> Vec<Group<'a, T, K>>
where
    K: Hash + Eq + Clone,
    F: Fn(&'a T) -> K,
{
    let mut groups: IndexMap<K, Group<'a, T, K>> = IndexMap::new();
    for (idx, item) in items.iter().enumerate() {
        let key = key_fn(item);
        let group = groups.entry(key.clone()).or_insert_with(|| Group {
            key,
            anchor_index: idx,
            indices: Vec::new(),
            members: Vec::new(),
        });
        group.indices.push(idx);
        group.members.push(item);
    }
    groups.into_values().collect()
}

/// Record field used as a grouping key.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GroupKeySelector {
    /// Group by summary text (navigation, labeling panel).
    Summary,
    /// Group by summary file (grouped export).
    SummaryFile,
}

impl GroupKeySelector {
    /// Borrow the key of `record`.
    pub fn key<'r>(self, record: &'r Record) -> &'r str {
        match self {
            GroupKeySelector::Summary => &record.summary,
            GroupKeySelector::SummaryFile => &record.summary_file,
        }
    }
}

/// Group records by the field chosen with `selector`.
pub fn group_records<'a>(
    records: &'a [Record],
    selector: GroupKeySelector,
) -> Vec<Group<'a, Record, &'a str>> {
    build_groups(records, |record| selector.key(record))
}

/// Position of the group containing `index`, if any.
pub fn group_position<T, K>(groups: &[Group<'_, T, K>], index: RowIndex) -> Option<usize> {
    groups.iter().position(|group| group.contains_index(index))
}

//! Labeling-completeness predicates.

use crate::constants::labels::{SCORE_MAX, SCORE_MIN};
use crate::data::{Contribution, Record};

/// True when `score` is a set value on the 1-10 scale.
pub fn is_valid_score(score: Option<u8>) -> bool {
    score.is_some_and(|value| (SCORE_MIN..=SCORE_MAX).contains(&i64::from(value)))
}

/// A record is labeled when relevance and contribution are set and, for
/// constructive comments, the score is in 1-10.
pub fn is_labeled(record: &Record) -> bool {
    match (record.relevance, record.contribution) {
        (Some(_), Some(Contribution::Constructive)) => is_valid_score(record.contribution_score),
        (Some(_), Some(Contribution::Generic)) => true,
        _ => false,
    }
}

/// A group is labeled when every member is labeled. Empty groups count as labeled.
pub fn is_group_labeled<'a, I>(records: I) -> bool
where
    I: IntoIterator<Item = &'a Record>,
{
    records.into_iter().all(is_labeled)
}

//! Group-aware cursor over the record sequence.
//!
//! Groups here are keyed by `summary`. Moves always land on a group's anchor
//! (its first record in sequence order), except `next_group`, which lands on
//! the first record after the current contiguous run.
//!
//! Every operation is a no-op on empty data or when no target exists; records
//! are never mutated.

use crate::completeness::is_group_labeled;
use crate::data::Record;
use crate::grouping::{GroupKeySelector, group_position, group_records};
use crate::types::RowIndex;

/// Navigation request issued by the presentation layer.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NavigateCommand {
    /// Move to the anchor of the preceding summary group.
    Previous,
    /// Move to the first record of the following summary group.
    Next,
    /// Move to the anchor of the next group with an unlabeled record, wrapping once.
    FindNextUnlabeled,
    /// Jump to an explicit row, clamped to the data.
    Jump(RowIndex),
}

/// Cursor state for group navigation.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Navigator {
    cursor: RowIndex,
}

impl Navigator {
    /// Cursor at the first record.
    pub fn new() -> Self {
        Self::default()
    }

    /// Cursor at `cursor`.
    pub fn at(cursor: RowIndex) -> Self {
        Self { cursor }
    }

    /// Current cursor position.
    pub fn cursor(&self) -> RowIndex {
        self.cursor
    }

    /// Move the cursor back to the first record.
    pub fn reset(&mut self) {
        self.cursor = 0;
    }

    /// Execute `command`; returns true when the cursor moved.
    pub fn navigate(&mut self, records: &[Record], command: NavigateCommand) -> bool {
        let target = match command {
            NavigateCommand::Previous => self.peek_previous_group(records),
            NavigateCommand::Next => self.peek_next_group(records),
            NavigateCommand::FindNextUnlabeled => self.peek_next_unlabeled(records),
            NavigateCommand::Jump(index) => {
                (!records.is_empty()).then(|| index.min(records.len() - 1))
            }
        };
        self.move_to(target)
    }

    /// Move to the anchor of the preceding group.
    pub fn previous_group(&mut self, records: &[Record]) -> bool {
        self.navigate(records, NavigateCommand::Previous)
    }

    /// Move to the start of the following group.
    pub fn next_group(&mut self, records: &[Record]) -> bool {
        self.navigate(records, NavigateCommand::Next)
    }

    /// Move to the anchor of the next group that still needs labels.
    pub fn find_next_unlabeled(&mut self, records: &[Record]) -> bool {
        self.navigate(records, NavigateCommand::FindNextUnlabeled)
    }

    /// True when [`Navigator::previous_group`] would move.
    pub fn can_go_previous(&self, records: &[Record]) -> bool {
        self.peek_previous_group(records).is_some()
    }

    /// True when [`Navigator::next_group`] would move.
    pub fn can_go_next(&self, records: &[Record]) -> bool {
        self.peek_next_group(records).is_some()
    }

    /// Target of a previous-group move, if any.
    ///
    /// Scans backward past the current summary; the target is the anchor of the
    /// summary found there, not the scan position, since groups may be split.
    pub fn peek_previous_group(&self, records: &[Record]) -> Option<RowIndex> {
        let current = &records.get(self.cursor)?.summary;
        let previous = records[..self.cursor]
            .iter()
            .rev()
            .find(|record| &record.summary != current)?;
        records
            .iter()
            .position(|record| record.summary == previous.summary)
    }

    /// Target of a next-group move, if any.
    pub fn peek_next_group(&self, records: &[Record]) -> Option<RowIndex> {
        let current = &records.get(self.cursor)?.summary;
        records
            .iter()
            .enumerate()
            .skip(self.cursor + 1)
            .find(|(_, record)| &record.summary != current)
            .map(|(idx, _)| idx)
    }

    /// Target of a find-next-unlabeled move, if any.
    ///
    /// Searches the groups after the current one, then wraps to the start and
    /// searches up to, but not including, the current group. `None` when no
    /// other group needs labels.
    pub fn peek_next_unlabeled(&self, records: &[Record]) -> Option<RowIndex> {
        if records.is_empty() {
            return None;
        }
        let groups = group_records(records, GroupKeySelector::Summary);
        let current = group_position(&groups, self.cursor);
        let start = current.map_or(0, |pos| pos + 1);
        let unlabeled_anchor = |range: std::ops::Range<usize>| {
            groups[range]
                .iter()
                .find(|group| !is_group_labeled(group.members.iter().copied()))
                .map(|group| group.anchor_index)
        };

        unlabeled_anchor(start..groups.len())
            .or_else(|| current.and_then(|pos| unlabeled_anchor(0..pos)))
    }

    fn move_to(&mut self, target: Option<RowIndex>) -> bool {
        match target {
            Some(index) if index != self.cursor => {
                self.cursor = index;
                true
            }
            _ => false,
        }
    }
}

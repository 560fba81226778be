//! Application state: the record sequence plus the navigation cursor.
//!
//! All mutations go through [`LabelStore::apply`]. Updates merge a patch into
//! the latest stored record, so rapid successive edits to different fields of
//! one row never drop each other.

use tracing::{debug, info, warn};

use crate::completeness::{is_group_labeled, is_valid_score};
use crate::data::{Record, RecordPatch};
use crate::errors::LabelerError;
use crate::export::{GroupedDocument, build_grouped_export, sanitize_records};
use crate::metrics::{LabelingProgress, labeling_progress};
use crate::navigator::{NavigateCommand, Navigator};
use crate::types::RowIndex;

/// Serialized state change.
#[derive(Debug)]
pub enum Command {
    /// Outcome of a finished import. Failures leave the store untouched.
    Import(Result<Vec<Record>, LabelerError>),
    /// Merge `patch` into the record at `index`.
    UpdateRecord {
        /// Target row.
        index: RowIndex,
        /// Fields to overwrite.
        patch: RecordPatch,
    },
    /// Move the cursor.
    Navigate(NavigateCommand),
}

/// What a command changed.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Transition {
    /// Records were replaced by an import and the cursor reset.
    Replaced {
        /// New record count.
        records: usize,
    },
    /// One record was rewritten.
    Updated {
        /// Rewritten row.
        index: RowIndex,
    },
    /// The cursor moved.
    Moved {
        /// Previous cursor.
        from: RowIndex,
        /// New cursor.
        to: RowIndex,
    },
    /// Nothing changed.
    Unchanged,
}

/// Owns the records and the cursor.
#[derive(Clone, Debug, Default)]
pub struct LabelStore {
    records: Vec<Record>,
    navigator: Navigator,
}

impl LabelStore {
    /// Empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Store seeded with already normalized `records`.
    pub fn with_records(records: Vec<Record>) -> Self {
        Self {
            records,
            navigator: Navigator::new(),
        }
    }

    /// Apply `command`.
    ///
    /// A failed import is logged and reported as [`Transition::Unchanged`];
    /// the previous records and cursor stay in place. An update addressed to
    /// a row that does not exist fails with [`LabelerError::RowOutOfRange`];
    /// a contribution score above 10 fails with [`LabelerError::InvalidScore`].
    pub fn apply(&mut self, command: Command) -> Result<Transition, LabelerError> {
        match command {
            Command::Import(Ok(records)) => {
                let count = records.len();
                self.records = records;
                self.navigator.reset();
                info!(records = count, "records replaced");
                Ok(Transition::Replaced { records: count })
            }
            Command::Import(Err(err)) => {
                warn!(error = %err, records = self.records.len(), "import failed; keeping current data");
                Ok(Transition::Unchanged)
            }
            Command::UpdateRecord { index, patch } => self.update_record(index, &patch),
            Command::Navigate(nav) => {
                let from = self.navigator.cursor();
                if self.navigator.navigate(&self.records, nav) {
                    let to = self.navigator.cursor();
                    debug!(command = ?nav, from, to, "cursor moved");
                    Ok(Transition::Moved { from, to })
                } else {
                    Ok(Transition::Unchanged)
                }
            }
        }
    }

    /// Merge `patch` into the record at `index`.
    pub fn update_record(
        &mut self,
        index: RowIndex,
        patch: &RecordPatch,
    ) -> Result<Transition, LabelerError> {
        let len = self.records.len();
        let record = self
            .records
            .get_mut(index)
            .ok_or(LabelerError::RowOutOfRange { index, len })?;
        if patch.is_empty() {
            return Ok(Transition::Unchanged);
        }
        // `0` is the cleared-score marker; anything else must be on the 1-10 scale.
        if let Some(Some(score)) = patch.contribution_score {
            if score != 0 && !is_valid_score(Some(score)) {
                warn!(index, score, "rejected contribution score");
                return Err(LabelerError::InvalidScore { index, score });
            }
        }
        record.merge(patch);
        debug!(index, "record updated");
        Ok(Transition::Updated { index })
    }

    /// All records in display order.
    pub fn records(&self) -> &[Record] {
        &self.records
    }

    /// True when no records are loaded.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Cursor position.
    pub fn cursor(&self) -> RowIndex {
        self.navigator.cursor()
    }

    /// Record under the cursor.
    pub fn current(&self) -> Option<&Record> {
        self.records.get(self.cursor())
    }

    /// Every record sharing the current summary, with its row index.
    pub fn current_group(&self) -> Vec<(RowIndex, &Record)> {
        let Some(current) = self.current() else {
            return Vec::new();
        };
        self.records
            .iter()
            .enumerate()
            .filter(|(_, record)| record.summary == current.summary)
            .collect()
    }

    /// True when every record of the current group is labeled.
    pub fn is_current_group_labeled(&self) -> bool {
        is_group_labeled(self.current_group().into_iter().map(|(_, record)| record))
    }

    /// One-based cursor position and record count; `(0, 0)` when empty.
    pub fn position(&self) -> (usize, usize) {
        if self.records.is_empty() {
            (0, 0)
        } else {
            (self.cursor() + 1, self.records.len())
        }
    }

    /// True when a previous-group move would succeed.
    pub fn can_go_previous(&self) -> bool {
        self.navigator.can_go_previous(&self.records)
    }

    /// True when a next-group move would succeed.
    pub fn can_go_next(&self) -> bool {
        self.navigator.can_go_next(&self.records)
    }

    /// Labeling progress over all records.
    pub fn progress(&self) -> LabelingProgress {
        labeling_progress(&self.records)
    }

    /// Grouped export document of the sanitized records.
    pub fn grouped_export(&self) -> GroupedDocument {
        build_grouped_export(&sanitize_records(&self.records))
    }
}

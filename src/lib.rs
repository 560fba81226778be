#![doc = include_str!("../README.md")]
#![warn(missing_docs)]

/// Command-line front-end.
pub mod app;
/// Label-completeness predicates.
pub mod completeness;
/// Labeler configuration types.
pub mod config;
/// Canonical column names, label bounds, and default output names.
pub mod constants;
/// Cells, records, labels, and record patches.
pub mod data;
/// Flat and grouped export transformers.
pub mod export;
/// Order-preserving grouping of records.
pub mod grouping;
/// Labeling progress aggregates.
pub mod metrics;
/// Group-aware cursor movement.
pub mod navigator;
/// Raw rows to typed records.
pub mod normalize;
/// Record and cursor state container.
pub mod store;
/// Spreadsheet import and export file sinks.
pub mod transport;
/// Shared type aliases.
pub mod types;
/// Header keys, natural ordering, and lenient number parsing.
pub mod utils;

mod errors;

pub use completeness::{is_group_labeled, is_labeled, is_valid_score};
pub use config::{ColumnAliases, ExportNames, LabelerConfig, RecordField};
pub use data::{Cell, Contribution, RawTable, Record, RecordPatch, Relevance};
pub use errors::LabelerError;
pub use export::{ExportFormat, GroupedDocument, build_grouped_export, render, sanitize};
pub use grouping::{Group, GroupKeySelector, build_groups, group_records};
pub use metrics::{LabelingProgress, labeling_progress};
pub use navigator::{NavigateCommand, Navigator};
pub use normalize::{ColumnMapping, RowNormalizer, normalize};
pub use store::{Command, LabelStore, Transition};
pub use transport::{DirectorySink, FileSink, PendingImport, import_records, read_table};
pub use types::{CommentText, HeaderKey, RowIndex, SummaryFileKey, SummaryText};

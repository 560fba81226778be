//! Command-line front-end over the labeling core.

use std::error::Error;
use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand, ValueEnum, error::ErrorKind};
use tracing_subscriber::EnvFilter;

use crate::completeness::is_labeled;
use crate::config::LabelerConfig;
use crate::data::Record;
use crate::export::{ExportFormat, export_to};
use crate::navigator::{NavigateCommand, Navigator};
use crate::normalize::RowNormalizer;
use crate::store::{Command, LabelStore};
use crate::transport::fs::DirectorySink;
use crate::transport::spreadsheet::{PendingImport, SheetFormat};

#[derive(Debug, Clone, Copy, ValueEnum)]
enum FormatArg {
    Csv,
    Xlsx,
    Json,
}

impl From<FormatArg> for ExportFormat {
    fn from(value: FormatArg) -> Self {
        match value {
            FormatArg::Csv => ExportFormat::Csv,
            FormatArg::Xlsx => ExportFormat::Xlsx,
            FormatArg::Json => ExportFormat::GroupedJson,
        }
    }
}

#[derive(Debug, Parser)]
#[command(
    name = "comment-labeler",
    disable_help_subcommand = true,
    about = "Summary/comment labeling tools",
    long_about = "Import summary/comment spreadsheets, report labeling progress, locate unlabeled groups, and export labeled data.",
    after_help = "Set RUST_LOG=comment_labeler=debug for import and export diagnostics."
)]
struct LabelerCli {
    #[arg(
        long = "case-sensitive-headers",
        global = true,
        help = "Match header aliases case-sensitively"
    )]
    case_sensitive_headers: bool,
    #[command(subcommand)]
    command: LabelerCommand,
}

#[derive(Debug, Subcommand)]
enum LabelerCommand {
    /// Print labeling progress for a spreadsheet.
    Progress {
        #[arg(value_name = "FILE", help = "Spreadsheet to read (.xlsx, .xls or .csv)")]
        file: PathBuf,
    },
    /// Export a spreadsheet as flat CSV, flat XLSX, or grouped JSON.
    Export {
        #[arg(value_name = "FILE", help = "Spreadsheet to read (.xlsx, .xls or .csv)")]
        file: PathBuf,
        #[arg(long, value_enum, default_value = "csv", help = "Output format")]
        format: FormatArg,
        #[arg(
            long,
            value_name = "PATH",
            help = "Output path (defaults to the configured name in the current directory)"
        )]
        out: Option<PathBuf>,
    },
    /// Convert a CSV file into the grouped JSON document.
    Convert {
        #[arg(value_name = "CSV", help = "CSV file to convert")]
        file: PathBuf,
        #[arg(long, value_name = "PATH", help = "Output JSON path")]
        out: Option<PathBuf>,
    },
    /// Locate the next summary group that still needs labels.
    NextUnlabeled {
        #[arg(value_name = "FILE", help = "Spreadsheet to read (.xlsx, .xls or .csv)")]
        file: PathBuf,
        #[arg(
            long,
            value_name = "ROW",
            default_value_t = 1,
            value_parser = parse_positive_usize,
            help = "One-based row to start searching from"
        )]
        from: usize,
    },
}

/// Parse `args_iter` (without the program name) and run the selected subcommand.
pub fn run_cli<I>(args_iter: I) -> Result<(), Box<dyn Error>>
where
    I: Iterator<Item = String>,
{
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .try_init();

    let Some(cli) =
        parse_cli::<LabelerCli, _>(std::iter::once("comment-labeler".to_string()).chain(args_iter))?
    else {
        return Ok(());
    };

    let config = LabelerConfig {
        case_sensitive_headers: cli.case_sensitive_headers,
        ..LabelerConfig::default()
    };

    match cli.command {
        LabelerCommand::Progress { file } => {
            let store = load_store(&file, &config)?;
            let progress = store.progress();
            println!("=== labeling progress ===");
            println!("file: {}", file.display());
            println!("records: {}", progress.total);
            println!("labeled: {}", progress.labeled);
            println!("unlabeled: {}", progress.unlabeled);
            println!("percent: {:.1}%", progress.percent);
            println!(
                "groups labeled: {}/{}",
                progress.labeled_groups, progress.groups
            );
        }
        LabelerCommand::Export { file, format, out } => {
            let store = load_store(&file, &config)?;
            let path = write_export(store.records(), format.into(), out.as_deref(), &config)?;
            println!("wrote {} records to {}", store.records().len(), path.display());
        }
        LabelerCommand::Convert { file, out } => {
            if SheetFormat::from_path(&file)? != SheetFormat::Csv {
                return Err(format!("convert expects a .csv file, got '{}'", file.display()).into());
            }
            let store = load_store(&file, &config)?;
            let document = store.grouped_export();
            let path = write_export(
                store.records(),
                ExportFormat::GroupedJson,
                out.as_deref(),
                &config,
            )?;
            println!(
                "wrote {} groups ({} with multiple comments) from {} rows to {}",
                document.totals.groups,
                document.totals.multi_comment_groups,
                document.totals.rows,
                path.display()
            );
        }
        LabelerCommand::NextUnlabeled { file, from } => {
            let store = load_store(&file, &config)?;
            if store.is_empty() {
                println!("no records");
                return Ok(());
            }
            let mut navigator = Navigator::new();
            navigator.navigate(store.records(), NavigateCommand::Jump(from - 1));
            match navigator.peek_next_unlabeled(store.records()) {
                Some(index) => {
                    let record = &store.records()[index];
                    println!("row {} of {}", index + 1, store.records().len());
                    println!("summary file: {}", record.summary_file);
                    println!("summary: {}", record.summary);
                    for (member, comment) in store
                        .records()
                        .iter()
                        .enumerate()
                        .filter(|(_, other)| other.summary == record.summary)
                    {
                        println!("{}", describe_labels(member, comment));
                    }
                }
                None => println!("all groups are labeled"),
            }
        }
    }
    Ok(())
}

fn load_store(path: &Path, config: &LabelerConfig) -> Result<LabelStore, Box<dyn Error>> {
    let records = PendingImport::spawn(path, RowNormalizer::new(config.clone())).wait()?;
    let mut store = LabelStore::new();
    store.apply(Command::Import(Ok(records)))?;
    Ok(store)
}

fn write_export(
    records: &[Record],
    format: ExportFormat,
    out: Option<&Path>,
    config: &LabelerConfig,
) -> Result<PathBuf, Box<dyn Error>> {
    let (dir, file_name) = match out {
        Some(path) => {
            let file_name = path
                .file_name()
                .and_then(|name| name.to_str())
                .ok_or_else(|| format!("invalid output path '{}'", path.display()))?;
            let dir = path.parent().map(Path::to_path_buf).unwrap_or_default();
            (dir, Some(file_name))
        }
        None => (PathBuf::new(), None),
    };
    let sink = DirectorySink::new(dir);
    Ok(export_to(&sink, records, format, &config.export, file_name)?)
}

fn describe_labels(index: usize, record: &Record) -> String {
    let relevance = record.relevance.map_or("unset", |value| value.label());
    let contribution = record.contribution.map_or("unset", |value| value.label());
    let score = record
        .contribution_score
        .map_or_else(|| "-".to_string(), |value| value.to_string());
    let status = if is_labeled(record) { "labeled" } else { "pending" };
    format!(
        "  row {}: [{status}] relevance={relevance} contribution={contribution} score={score}",
        index + 1
    )
}

fn parse_cli<T, I>(args: I) -> Result<Option<T>, Box<dyn Error>>
where
    T: Parser,
    I: IntoIterator,
    I::Item: Into<std::ffi::OsString> + Clone,
{
    match T::try_parse_from(args) {
        Ok(cli) => Ok(Some(cli)),
        Err(err) => match err.kind() {
            ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => {
                err.print()?;
                Ok(None)
            }
            _ => Err(err.into()),
        },
    }
}

fn parse_positive_usize(raw: &str) -> Result<usize, String> {
    let parsed = raw
        .parse::<usize>()
        .map_err(|_| format!("invalid value '{raw}': expected a positive integer"))?;
    if parsed == 0 {
        return Err(format!("invalid value '{raw}': must be greater than zero"));
    }
    Ok(parsed)
}

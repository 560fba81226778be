use std::fs;
use std::path::{Component, Path, PathBuf};

use tracing::debug;

use crate::constants::files::IMPORT_EXTENSIONS;
use crate::errors::LabelerError;

/// Lowercased extension of `path`, if any.
pub fn extension_of(path: &Path) -> Option<String> {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.to_ascii_lowercase())
}

/// True if the path has an importable extension (`.xlsx`, `.xls`, `.csv`, any case).
pub fn is_supported_import(path: &Path) -> bool {
    extension_of(path)
        .map(|ext| IMPORT_EXTENSIONS.contains(&ext.as_str()))
        .unwrap_or(false)
}

/// Destination for rendered export files.
pub trait FileSink {
    /// Store `bytes` under `file_name`; returns where the file ended up.
    fn deliver(&self, file_name: &str, bytes: &[u8]) -> Result<PathBuf, LabelerError>;
}

/// Filesystem sink writing into a directory.
#[derive(Clone, Debug)]
pub struct DirectorySink {
    dir: PathBuf,
    create_dirs: bool,
}

impl DirectorySink {
    /// Sink rooted at `dir`.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            create_dirs: true,
        }
    }

    /// Configure whether missing parent directories are created.
    pub fn with_create_dirs(mut self, create_dirs: bool) -> Self {
        self.create_dirs = create_dirs;
        self
    }
}

impl FileSink for DirectorySink {
    fn deliver(&self, file_name: &str, bytes: &[u8]) -> Result<PathBuf, LabelerError> {
        let mut components = Path::new(file_name).components();
        let single_name = matches!(
            (components.next(), components.next()),
            (Some(Component::Normal(_)), None)
        );
        if !single_name {
            return Err(LabelerError::Configuration(format!(
                "invalid export file name '{file_name}'"
            )));
        }
        if self.create_dirs && !self.dir.as_os_str().is_empty() {
            fs::create_dir_all(&self.dir)?;
        }
        let path = self.dir.join(file_name);
        // Write to a sibling temp file first so a failed write never leaves a truncated export.
        let tmp = path.with_extension("tmp");
        fs::write(&tmp, bytes)?;
        fs::rename(&tmp, &path)?;
        debug!(path = %path.display(), bytes = bytes.len(), "export written");
        Ok(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn supported_extensions_are_case_insensitive() {
        assert!(is_supported_import(Path::new("data.xlsx")));
        assert!(is_supported_import(Path::new("data.XLS")));
        assert!(is_supported_import(Path::new("dir/data.Csv")));
        assert!(!is_supported_import(Path::new("data.json")));
        assert!(!is_supported_import(Path::new("xlsx")));
    }

    #[test]
    fn directory_sink_writes_and_creates_dirs() {
        let temp = tempdir().unwrap();
        let sink = DirectorySink::new(temp.path().join("nested/out"));
        let path = sink.deliver("labeled_data.csv", b"a,b\n").unwrap();
        assert_eq!(path, temp.path().join("nested/out/labeled_data.csv"));
        assert_eq!(fs::read(&path).unwrap(), b"a,b\n");
        assert!(!temp.path().join("nested/out/labeled_data.tmp").exists());
    }

    #[test]
    fn directory_sink_rejects_empty_names() {
        let temp = tempdir().unwrap();
        let sink = DirectorySink::new(temp.path()).with_create_dirs(false);
        let err = sink.deliver("", b"x").unwrap_err();
        assert!(matches!(err, LabelerError::Configuration(msg) if msg.contains("invalid")));
    }

    #[test]
    fn directory_sink_rejects_names_leaving_the_directory() {
        let temp = tempdir().unwrap();
        let sink = DirectorySink::new(temp.path().join("out"));
        for name in ["../x.csv", "nested/x.csv", "/tmp/x.csv", ".", ".."] {
            let err = sink.deliver(name, b"x").unwrap_err();
            assert!(matches!(err, LabelerError::Configuration(_)), "{name}");
        }
        assert!(!temp.path().join("x.csv").exists());
        assert!(sink.deliver("x.csv", b"x").is_ok());
    }
}

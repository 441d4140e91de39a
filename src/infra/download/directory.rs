use std::path::{Component, Path, PathBuf};

use crate::usecase::ports::sink::{DownloadSink, SinkError};

/// Drops exported files into one directory, the way a browser download lands
/// in the downloads folder. Existing files with the same name are replaced.
#[derive(Debug, Clone)]
pub struct DirectorySink {
    dir: PathBuf,
}

impl DirectorySink {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }
}

fn is_plain_file_name(name: &str) -> bool {
    let mut components = Path::new(name).components();
    matches!(
        (components.next(), components.next()),
        (Some(Component::Normal(_)), None)
    )
}

impl DownloadSink for DirectorySink {
    fn save(&self, file_name: &str, bytes: &[u8]) -> Result<PathBuf, SinkError> {
        if !is_plain_file_name(file_name) {
            return Err(SinkError::InvalidName(file_name.to_string()));
        }

        std::fs::create_dir_all(&self.dir).map_err(|source| SinkError::Write {
            path: self.dir.clone(),
            source,
        })?;
        let path = self.dir.join(file_name);
        std::fs::write(&path, bytes).map_err(|source| SinkError::Write {
            path: path.clone(),
            source,
        })?;
        tracing::info!(path = %path.display(), bytes = bytes.len(), "saved export");
        Ok(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn writes_into_nested_missing_dir() {
        let temp_dir = tempfile::tempdir().expect("should create temp dir");
        let sink = DirectorySink::new(temp_dir.path().join("exports"));

        let path = sink
            .save("report_modified.xlsx", b"abc")
            .expect("save should succeed");

        assert_eq!(path, temp_dir.path().join("exports").join("report_modified.xlsx"));
        assert_eq!(std::fs::read(&path).expect("file should exist"), b"abc");
    }

    #[test]
    fn rejects_names_with_directories() {
        let temp_dir = tempfile::tempdir().expect("should create temp dir");
        let sink = DirectorySink::new(temp_dir.path());

        for name in ["../escape.xlsx", "nested/file.xlsx", "", ".."] {
            assert!(
                matches!(sink.save(name, b""), Err(SinkError::InvalidName(_))),
                "{name:?} should be rejected"
            );
        }
    }
}

use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context, Result};
use directories::{ProjectDirs, UserDirs};

use crate::usecase::services::edit_service::DEFAULT_PAGE_SIZE;

pub const APP_QUALIFIER: &str = "com";
pub const APP_ORGANIZATION: &str = "caresheet";
pub const APP_NAME: &str = "caresheet";
pub const EXPORT_SUFFIX: &str = "_modified";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub data_dir: PathBuf,
    pub log_dir: PathBuf,
    pub export_dir: PathBuf,
    pub page_size: usize,
    pub export_suffix: String,
}

impl Settings {
    /// Resolves per-user directories. Exports go to the Downloads folder when
    /// the platform has one.
    pub fn resolve() -> Result<Self> {
        let project_dirs = ProjectDirs::from(APP_QUALIFIER, APP_ORGANIZATION, APP_NAME)
            .ok_or_else(|| anyhow!("unable to resolve data directory"))?;
        let download_dir = UserDirs::new().and_then(|dirs| dirs.download_dir().map(Path::to_path_buf));
        Ok(Self::from_dirs(project_dirs.data_local_dir(), download_dir))
    }

    pub fn from_dirs(data_dir: &Path, download_dir: Option<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.to_path_buf(),
            log_dir: data_dir.join("logs"),
            export_dir: download_dir.unwrap_or_else(|| data_dir.join("exports")),
            page_size: DEFAULT_PAGE_SIZE,
            export_suffix: EXPORT_SUFFIX.to_string(),
        }
    }

    pub fn ensure_webview_data_dir(&self) -> Result<PathBuf> {
        let webview_data_dir = self.data_dir.join("webview2");
        std::fs::create_dir_all(&webview_data_dir).with_context(|| {
            format!(
                "failed to create webview dir: {}",
                webview_data_dir.display()
            )
        })?;
        Ok(webview_data_dir)
    }

    pub fn ensure_log_dir(&self) -> Result<&Path> {
        std::fs::create_dir_all(&self.log_dir)
            .with_context(|| format!("failed to create log dir: {}", self.log_dir.display()))?;
        Ok(&self.log_dir)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exports_fall_back_to_data_dir() {
        let settings = Settings::from_dirs(Path::new("/data/caresheet"), None);

        assert_eq!(settings.export_dir, PathBuf::from("/data/caresheet/exports"));
        assert_eq!(settings.log_dir, PathBuf::from("/data/caresheet/logs"));
        assert_eq!(settings.page_size, 20);
        assert_eq!(settings.export_suffix, "_modified");
    }

    #[test]
    fn exports_prefer_downloads() {
        let settings = Settings::from_dirs(
            Path::new("/data/caresheet"),
            Some(PathBuf::from("/home/user/Downloads")),
        );
        assert_eq!(settings.export_dir, PathBuf::from("/home/user/Downloads"));
    }

    #[test]
    fn ensure_webview_data_dir_creates_webview2_subdir() {
        let temp_dir = tempfile::tempdir().expect("should create temp dir");
        let settings = Settings::from_dirs(temp_dir.path(), None);

        let webview_dir = settings
            .ensure_webview_data_dir()
            .expect("webview data dir should be created");

        assert_eq!(webview_dir, temp_dir.path().join("webview2"));
        assert!(webview_dir.is_dir(), "webview2 directory should exist");
    }
}

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};

use crate::domain::entities::table::Table;
use crate::usecase::ports::codec::SheetCodec;
use crate::usecase::ports::sink::DownloadSink;

pub const EXPORT_EXTENSION: &str = "xlsx";

/// Strips one trailing `.xlsx` (or else `.xls`) and appends `suffix`.
pub fn export_base_name(raw_file_name: &str, suffix: &str) -> String {
    let stem = raw_file_name
        .strip_suffix(".xlsx")
        .or_else(|| raw_file_name.strip_suffix(".xls"))
        .unwrap_or(raw_file_name);
    format!("{stem}{suffix}")
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportReceipt {
    pub file_name: String,
    pub path: PathBuf,
    pub row_count: usize,
}

pub struct ExportService {
    codec: Arc<dyn SheetCodec>,
    sink: Arc<dyn DownloadSink>,
    suffix: String,
}

impl ExportService {
    pub fn new(
        codec: Arc<dyn SheetCodec>,
        sink: Arc<dyn DownloadSink>,
        suffix: impl Into<String>,
    ) -> Self {
        Self {
            codec,
            sink,
            suffix: suffix.into(),
        }
    }

    pub fn export_current_table(&self, table: &Table, raw_file_name: &str) -> Result<ExportReceipt> {
        let base_name = export_base_name(raw_file_name, &self.suffix);
        self.export_as(table, &base_name)
    }

    /// Serializes the table and saves it as `{base_name}.xlsx`.
    pub fn export_as(&self, table: &Table, base_name: &str) -> Result<ExportReceipt> {
        let file_name = format!("{base_name}.{EXPORT_EXTENSION}");
        let bytes = self
            .codec
            .serialize(table)
            .with_context(|| format!("failed to build {file_name}"))?;
        let path = self
            .sink
            .save(&file_name, &bytes)
            .with_context(|| format!("failed to save {file_name}"))?;
        tracing::info!(file = %file_name, rows = table.len(), "exported table");

        Ok(ExportReceipt {
            file_name,
            path,
            row_count: table.len(),
        })
    }
}

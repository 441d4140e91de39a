use std::sync::Arc;

use crate::domain::entities::source::{LoadedSheet, SourceFile};
use crate::usecase::ports::codec::{ParseError, SheetCodec};

pub struct ImportService {
    codec: Arc<dyn SheetCodec>,
}

impl ImportService {
    pub fn new(codec: Arc<dyn SheetCodec>) -> Self {
        Self { codec }
    }

    /// Parses the file into a new table paired with a fresh edit session.
    pub fn load(&self, source: &SourceFile) -> Result<LoadedSheet, ParseError> {
        tracing::info!(file = %source.name, bytes = source.bytes.len(), "loading spreadsheet");
        match self.codec.parse(&source.bytes) {
            Ok(table) => {
                tracing::info!(file = %source.name, rows = table.len(), "spreadsheet loaded");
                Ok(LoadedSheet::new(source.name.clone(), table))
            }
            Err(err) => {
                tracing::warn!(file = %source.name, error = %err, "spreadsheet rejected");
                Err(err)
            }
        }
    }

    pub fn load_selection(&self, source: Option<&SourceFile>) -> Result<LoadedSheet, ParseError> {
        match source {
            Some(source) => self.load(source),
            None => Err(ParseError::NoFileSelected),
        }
    }
}

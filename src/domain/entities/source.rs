use crate::domain::entities::edit::EditSession;
use crate::domain::entities::table::Table;

/// Raw bytes of a user-selected spreadsheet plus the name it was picked as.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceFile {
    pub name: String,
    pub bytes: Vec<u8>,
}

/// A freshly parsed table together with the empty session that belongs to it.
///
/// Only constructed by a successful load, so the table and session can never
/// be swapped in separately.
#[derive(Debug, Clone, PartialEq)]
pub struct LoadedSheet {
    file_name: String,
    table: Table,
    session: EditSession,
}

impl LoadedSheet {
    pub fn new(file_name: impl Into<String>, table: Table) -> Self {
        Self {
            file_name: file_name.into(),
            table,
            session: EditSession::new(),
        }
    }

    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    pub fn into_parts(self) -> (String, Table, EditSession) {
        (self.file_name, self.table, self.session)
    }
}

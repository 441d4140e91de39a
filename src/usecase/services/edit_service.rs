use std::sync::Arc;

use crate::domain::entities::edit::EditSession;
use crate::domain::entities::source::LoadedSheet;
use crate::domain::entities::table::{Row, Table};

pub const DEFAULT_PAGE_SIZE: usize = 20;

/// The loaded table, its edit session and the rows currently on screen.
///
/// Presentation code reads from it and calls its operations; table and session
/// are only ever replaced together.
#[derive(Debug, Clone, PartialEq)]
pub struct Workbench {
    file_name: Option<String>,
    table: Table,
    session: EditSession,
    page_size: usize,
    display_count: usize,
}

impl Default for Workbench {
    fn default() -> Self {
        Self::new(DEFAULT_PAGE_SIZE)
    }
}

impl Workbench {
    pub fn new(page_size: usize) -> Self {
        let page_size = page_size.max(1);
        Self {
            file_name: None,
            table: Table::new(),
            session: EditSession::new(),
            page_size,
            display_count: page_size,
        }
    }

    pub fn file_name(&self) -> Option<&str> {
        self.file_name.as_deref()
    }

    pub fn table(&self) -> &Table {
        &self.table
    }

    pub fn session(&self) -> &EditSession {
        &self.session
    }

    pub fn replace_with(&mut self, loaded: LoadedSheet) {
        let (file_name, table, session) = loaded.into_parts();
        self.file_name = Some(file_name);
        self.table = table;
        self.session = session;
        self.display_count = self.page_size;
    }

    pub fn toggle_row_edit_mode(&mut self, row: usize) {
        self.session = self.session.toggle_row_edit_mode(&self.table, row);
    }

    pub fn begin_cell_edit(&mut self, row: usize, column: &str) {
        self.session = self.session.begin_cell_edit(row, column);
    }

    pub fn cancel_cell_edit(&mut self) {
        self.session = self.session.cancel_cell_edit();
    }

    pub fn commit_cell_edit(&mut self, row: usize, column: &str, raw: &str) {
        let (table, session) = self.session.commit_cell_edit(&self.table, row, column, raw);
        self.table = table;
        self.session = session;
    }

    pub fn delete_row(&mut self, row: usize) {
        if row >= self.table.len() {
            tracing::debug!(row, len = self.table.len(), "delete_row out of range, ignored");
            return;
        }
        self.table = self.table.delete_row(row);
        self.session = self.session.reconcile_deleted_row(row);
    }

    pub fn add_row(&mut self, row: Row) {
        self.table = self.table.add_row(row);
    }

    pub fn load_more(&mut self) {
        self.display_count = self.display_count.saturating_add(self.page_size);
    }

    pub fn visible_rows(&self) -> impl Iterator<Item = (usize, &Arc<Row>)> {
        self.table.rows().iter().take(self.display_count).enumerate()
    }

    pub fn visible_count(&self) -> usize {
        self.display_count.min(self.table.len())
    }

    pub fn remaining(&self) -> usize {
        self.table.len().saturating_sub(self.display_count)
    }

    /// `Loaded: name (n rows)`, plus the edit summary while rows are editing.
    pub fn status_line(&self) -> Option<String> {
        let file_name = self.file_name.as_deref()?;
        let mut line = format!("Loaded: {file_name} ({} rows)", self.table.len());
        let editing = self.session.editing_rows().len();
        if let (true, Some(column)) = (editing > 0, self.session.editable_column()) {
            line.push_str(&format!(" • Editing {editing} row(s): {column}"));
        }
        Some(line)
    }
}

use std::collections::BTreeSet;

use crate::domain::entities::table::{CellValue, Table};

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CellKey {
    pub row: usize,
    pub column: String,
}

impl CellKey {
    pub fn new(row: usize, column: impl Into<String>) -> Self {
        Self {
            row,
            column: column.into(),
        }
    }

    fn matches(&self, row: usize, column: &str) -> bool {
        self.row == row && self.column == column
    }
}

/// How a single cell should be presented.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CellMode {
    Static,
    Editable,
    Live,
}

/// Row edit-mode state for one loaded table.
///
/// Values are immutable: every transition returns the next session. A fresh
/// session is created together with each loaded table and never outlives it.
///
/// Invariant: when `editing_cell` is set, its row is in `editing_rows` and
/// its column equals `editable_column`.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct EditSession {
    editing_rows: BTreeSet<usize>,
    editable_column: Option<String>,
    editing_cell: Option<CellKey>,
}

impl EditSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn editing_rows(&self) -> &BTreeSet<usize> {
        &self.editing_rows
    }

    pub fn editable_column(&self) -> Option<&str> {
        self.editable_column.as_deref()
    }

    pub fn editing_cell(&self) -> Option<&CellKey> {
        self.editing_cell.as_ref()
    }

    pub fn is_row_editing(&self, row: usize) -> bool {
        self.editing_rows.contains(&row)
    }

    pub fn is_column_editable(&self, row: usize, column: &str) -> bool {
        self.is_row_editing(row) && self.editable_column.as_deref() == Some(column)
    }

    pub fn is_editing_cell(&self, row: usize, column: &str) -> bool {
        self.editing_cell
            .as_ref()
            .is_some_and(|cell| cell.matches(row, column))
    }

    pub fn cell_mode(&self, row: usize, column: &str) -> CellMode {
        if !self.is_column_editable(row, column) {
            CellMode::Static
        } else if self.is_editing_cell(row, column) {
            CellMode::Live
        } else {
            CellMode::Editable
        }
    }

    /// Flips a row between viewing and editing.
    ///
    /// The editable column is derived once, from the first key of row 0, no
    /// matter which row was toggled. Any in-flight cell draft is dropped.
    pub fn toggle_row_edit_mode(&self, table: &Table, row: usize) -> EditSession {
        let mut next = self.clone();
        if !next.editing_rows.remove(&row) {
            next.editing_rows.insert(row);
            if next.editable_column.is_none() {
                next.editable_column = table.first_column_key().map(str::to_string);
            }
        }
        next.editing_cell = None;
        next
    }

    pub fn begin_cell_edit(&self, row: usize, column: &str) -> EditSession {
        if !self.is_column_editable(row, column) {
            return self.clone();
        }
        EditSession {
            editing_cell: Some(CellKey::new(row, column)),
            ..self.clone()
        }
    }

    pub fn cancel_cell_edit(&self) -> EditSession {
        EditSession {
            editing_cell: None,
            ..self.clone()
        }
    }

    /// Writes the raw input text into the table and closes the cell editor.
    ///
    /// Only the live editing cell is written, so blur and confirm firing for
    /// the same edit apply it once.
    pub fn commit_cell_edit(
        &self,
        table: &Table,
        row: usize,
        column: &str,
        raw: &str,
    ) -> (Table, EditSession) {
        let table = if self.is_editing_cell(row, column) {
            table.set_cell(row, column, CellValue::Text(raw.to_string()))
        } else {
            table.clone()
        };
        (table, self.cancel_cell_edit())
    }

    /// Adjusts row positions after `deleted` was removed from the table.
    pub fn reconcile_deleted_row(&self, deleted: usize) -> EditSession {
        let editing_rows = self
            .editing_rows
            .iter()
            .filter(|&&row| row != deleted)
            .map(|&row| if row > deleted { row - 1 } else { row })
            .collect();
        let editing_cell = self.editing_cell.as_ref().and_then(|cell| match cell.row {
            row if row == deleted => None,
            row if row > deleted => Some(CellKey::new(row - 1, cell.column.clone())),
            _ => Some(cell.clone()),
        });
        EditSession {
            editing_rows,
            editable_column: self.editable_column.clone(),
            editing_cell,
        }
    }
}

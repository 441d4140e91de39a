use std::fmt;
use std::sync::Arc;

/// A single scalar cell. Edits always land as `Text`.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum CellValue {
    #[default]
    Empty,
    Text(String),
    Number(f64),
    Bool(bool),
}

impl CellValue {
    pub fn is_empty(&self) -> bool {
        matches!(self, CellValue::Empty)
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::Empty => Ok(()),
            CellValue::Text(v) => f.write_str(v),
            CellValue::Number(v) => write!(f, "{v}"),
            CellValue::Bool(v) => write!(f, "{v}"),
        }
    }
}

impl From<&str> for CellValue {
    fn from(value: &str) -> Self {
        CellValue::Text(value.to_string())
    }
}

impl From<String> for CellValue {
    fn from(value: String) -> Self {
        CellValue::Text(value)
    }
}

impl From<f64> for CellValue {
    fn from(value: f64) -> Self {
        CellValue::Number(value)
    }
}

impl From<bool> for CellValue {
    fn from(value: bool) -> Self {
        CellValue::Bool(value)
    }
}

/// Ordered column key -> value mapping. Keys keep insertion order.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Row {
    cells: Vec<(String, CellValue)>,
}

impl Row {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, column: &str) -> Option<&CellValue> {
        self.cells
            .iter()
            .find(|(key, _)| key == column)
            .map(|(_, value)| value)
    }

    /// Overwrites in place when the key exists, appends otherwise.
    pub fn set(&mut self, column: &str, value: CellValue) {
        match self.cells.iter_mut().find(|(key, _)| key == column) {
            Some((_, slot)) => *slot = value,
            None => self.cells.push((column.to_string(), value)),
        }
    }

    #[allow(dead_code)]
    pub fn with(mut self, column: &str, value: impl Into<CellValue>) -> Self {
        self.set(column, value.into());
        self
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.cells.iter().map(|(key, _)| key.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &CellValue)> {
        self.cells.iter().map(|(key, value)| (key.as_str(), value))
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }
}

impl<K: Into<String>> FromIterator<(K, CellValue)> for Row {
    fn from_iter<I: IntoIterator<Item = (K, CellValue)>>(iter: I) -> Self {
        let mut row = Row::new();
        for (key, value) in iter {
            let key: String = key.into();
            row.set(&key, value);
        }
        row
    }
}

/// The currently loaded sheet. Row position is the only row identity.
///
/// Every update returns a new table; rows that are not touched are shared
/// with the source table.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Table {
    rows: Vec<Arc<Row>>,
}

impl Table {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_rows(rows: impl IntoIterator<Item = Row>) -> Self {
        Self {
            rows: rows.into_iter().map(Arc::new).collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn row(&self, position: usize) -> Option<&Arc<Row>> {
        self.rows.get(position)
    }

    pub fn rows(&self) -> &[Arc<Row>] {
        &self.rows
    }

    /// Display order of columns, taken from the first row.
    pub fn column_keys(&self) -> Vec<String> {
        self.rows
            .first()
            .map(|row| row.keys().map(str::to_string).collect())
            .unwrap_or_default()
    }

    pub fn first_column_key(&self) -> Option<&str> {
        self.rows.first().and_then(|row| row.keys().next())
    }

    pub fn set_cell(&self, position: usize, column: &str, value: CellValue) -> Table {
        let Some(current) = self.rows.get(position) else {
            tracing::debug!(position, len = self.len(), "set_cell out of range, ignored");
            return self.clone();
        };
        let mut updated = Row::clone(current);
        updated.set(column, value);

        let mut rows = self.rows.clone();
        rows[position] = Arc::new(updated);
        Table { rows }
    }

    #[allow(dead_code)]
    pub fn replace_row(&self, position: usize, row: Row) -> Table {
        if position >= self.rows.len() {
            tracing::debug!(position, len = self.len(), "replace_row out of range, ignored");
            return self.clone();
        }
        let mut rows = self.rows.clone();
        rows[position] = Arc::new(row);
        Table { rows }
    }

    pub fn delete_row(&self, position: usize) -> Table {
        if position >= self.rows.len() {
            tracing::debug!(position, len = self.len(), "delete_row out of range, ignored");
            return self.clone();
        }
        let mut rows = self.rows.clone();
        rows.remove(position);
        Table { rows }
    }

    pub fn add_row(&self, row: Row) -> Table {
        let mut rows = self.rows.clone();
        rows.push(Arc::new(row));
        Table { rows }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Table {
        Table::from_rows([
            Row::new().with("A", "1").with("B", "x"),
            Row::new().with("A", "2").with("B", "y"),
            Row::new().with("A", "3").with("B", "z"),
        ])
    }

    #[test]
    fn set_cell_only_touches_target_row() {
        let table = sample();
        let updated = table.set_cell(1, "B", CellValue::Number(7.0));

        assert_eq!(updated.row(1).unwrap().get("B"), Some(&CellValue::Number(7.0)));
        assert!(Arc::ptr_eq(&table.rows()[0], &updated.rows()[0]));
        assert!(Arc::ptr_eq(&table.rows()[2], &updated.rows()[2]));
        assert_eq!(
            table.row(1).unwrap().get("B"),
            Some(&CellValue::from("y")),
            "source table must not change"
        );
    }

    #[test]
    fn set_cell_new_key_appends_to_that_row_only() {
        let updated = sample().set_cell(0, "C", CellValue::Bool(true));

        let keys: Vec<&str> = updated.row(0).unwrap().keys().collect();
        assert_eq!(keys, vec!["A", "B", "C"]);
        assert_eq!(updated.row(1).unwrap().get("C"), None);
    }

    #[test]
    fn set_cell_existing_key_keeps_order() {
        let updated = sample().set_cell(0, "A", CellValue::from("99"));
        let keys: Vec<&str> = updated.row(0).unwrap().keys().collect();
        assert_eq!(keys, vec!["A", "B"]);
    }

    #[test]
    fn out_of_range_updates_are_noops() {
        let table = sample();
        assert_eq!(table.set_cell(3, "A", CellValue::from("q")), table);
        assert_eq!(table.delete_row(10), table);
        assert_eq!(table.replace_row(3, Row::new()), table);
    }

    #[test]
    fn delete_row_shifts_following_rows() {
        let table = sample();
        let updated = table.delete_row(1);

        assert_eq!(updated.len(), 2);
        assert!(Arc::ptr_eq(&updated.rows()[0], &table.rows()[0]));
        assert!(Arc::ptr_eq(&updated.rows()[1], &table.rows()[2]));
    }

    #[test]
    fn add_row_appends_at_end() {
        let table = sample();
        let updated = table.add_row(Row::new().with("A", "4"));

        assert_eq!(updated.len(), 4);
        assert_eq!(updated.row(3).unwrap().get("A"), Some(&CellValue::from("4")));
        assert_eq!(table.len(), 3);
    }

    #[test]
    fn column_keys_follow_first_row() {
        let table = Table::from_rows([
            Row::new().with("B", "1").with("A", "2"),
            Row::new().with("C", "3"),
        ]);
        assert_eq!(table.column_keys(), vec!["B".to_string(), "A".to_string()]);
        assert_eq!(table.first_column_key(), Some("B"));
        assert!(Table::new().column_keys().is_empty());
    }

    #[test]
    fn number_display_has_no_trailing_fraction() {
        assert_eq!(CellValue::Number(1.0).to_string(), "1");
        assert_eq!(CellValue::Number(2.5).to_string(), "2.5");
        assert_eq!(CellValue::Empty.to_string(), "");
        assert_eq!(CellValue::Bool(false).to_string(), "false");
    }
}

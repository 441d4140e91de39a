use std::collections::HashMap;
use std::io::Cursor;

use calamine::{open_workbook_auto_from_rs, Data, Reader, Sheets};
use rust_xlsxwriter::{Workbook, XlsxError};

use crate::domain::entities::table::{CellValue, Row, Table};
use crate::usecase::ports::codec::{ExportError, ParseError, SheetCodec};

const SHEET_NAME: &str = "Sheet1";
const EMPTY_HEADER: &str = "__EMPTY";
const MAX_ROWS: usize = 1_048_576;
const MAX_COLUMNS: usize = 16_384;

/// Spreadsheet codec backed by calamine for reading and rust_xlsxwriter for
/// writing.
#[derive(Debug, Clone, Copy, Default)]
pub struct XlsxCodec;

impl SheetCodec for XlsxCodec {
    fn parse(&self, bytes: &[u8]) -> Result<Table, ParseError> {
        if bytes.is_empty() {
            return Err(ParseError::Empty);
        }

        let mut workbook = open_workbook_auto_from_rs(Cursor::new(bytes.to_vec()))
            .map_err(|err| ParseError::Unrecognized(err.to_string()))?;
        let escaped = matches!(workbook, Sheets::Xlsx(_));
        let range = workbook
            .worksheet_range_at(0)
            .ok_or(ParseError::NoSheet)?
            .map_err(|err| ParseError::Sheet(err.to_string()))?;

        let mut rows = range.rows();
        let Some(header_row) = rows.next() else {
            return Err(ParseError::Empty);
        };
        let headers = header_keys(header_row, escaped);

        let table = Table::from_rows(
            rows.filter_map(|cells| record_from_cells(&headers, cells, escaped)),
        );
        if table.is_empty() {
            return Err(ParseError::Empty);
        }
        Ok(table)
    }

    fn serialize(&self, table: &Table) -> Result<Vec<u8>, ExportError> {
        let columns = export_columns(table);
        if table.len() + 1 > MAX_ROWS {
            return Err(ExportError::TooLarge {
                axis: "rows",
                count: table.len(),
            });
        }
        if columns.len() > MAX_COLUMNS {
            return Err(ExportError::TooLarge {
                axis: "columns",
                count: columns.len(),
            });
        }

        let mut workbook = Workbook::new();
        {
            let worksheet = workbook.add_worksheet();
            worksheet.set_name(SHEET_NAME).map_err(workbook_error)?;

            for (col_idx, column) in columns.iter().enumerate() {
                worksheet
                    .write_string(0, col_idx as u16, column.as_str())
                    .map_err(workbook_error)?;
            }

            for (row_idx, row) in table.rows().iter().enumerate() {
                let sheet_row = (row_idx + 1) as u32;
                for (col_idx, column) in columns.iter().enumerate() {
                    let sheet_col = col_idx as u16;
                    match row.get(column) {
                        None | Some(CellValue::Empty) => {}
                        Some(CellValue::Text(v)) => {
                            worksheet
                                .write_string(sheet_row, sheet_col, v.as_str())
                                .map_err(workbook_error)?;
                        }
                        Some(CellValue::Number(v)) => {
                            worksheet
                                .write_number(sheet_row, sheet_col, *v)
                                .map_err(workbook_error)?;
                        }
                        Some(CellValue::Bool(v)) => {
                            worksheet
                                .write_boolean(sheet_row, sheet_col, *v)
                                .map_err(workbook_error)?;
                        }
                    }
                }
            }
        }

        workbook.save_to_buffer().map_err(workbook_error)
    }
}

fn workbook_error(err: XlsxError) -> ExportError {
    ExportError::Workbook(err.to_string())
}

pub fn cell_to_value(cell: &Data) -> CellValue {
    match cell {
        Data::String(v) => CellValue::Text(v.clone()),
        Data::Float(v) => CellValue::Number(*v),
        Data::Int(v) => CellValue::Number(*v as f64),
        Data::Bool(v) => CellValue::Bool(*v),
        Data::DateTime(v) => CellValue::Number(v.as_f64()),
        Data::DateTimeIso(v) => CellValue::Text(v.clone()),
        Data::DurationIso(v) => CellValue::Text(v.clone()),
        Data::Error(v) => CellValue::Text(v.to_string()),
        Data::Empty => CellValue::Empty,
    }
}

/// Like [`cell_to_value`], but decodes the `_xHHHH_` escapes xlsx shared
/// strings use for control characters and literal `_xHHHH_` text.
fn sheet_cell_to_value(cell: &Data, escaped: bool) -> CellValue {
    match cell {
        Data::String(v) if escaped => CellValue::Text(decode_xml_escapes(v)),
        other => cell_to_value(other),
    }
}

fn escape_code_at(text: &str, start: usize) -> Option<u32> {
    let candidate = text.get(start..start + 7)?;
    let hex = candidate.strip_prefix("_x")?.strip_suffix('_')?;
    if hex.len() != 4 || !hex.bytes().all(|b| b.is_ascii_hexdigit()) {
        return None;
    }
    u32::from_str_radix(hex, 16).ok()
}

/// Decodes `_xHHHH_` sequences. `_x005F_` yields `_`, so `_x005F_x0041_`
/// comes back as the literal `_x0041_`. Surrogate pairs are joined; lone
/// surrogates stay as written.
pub fn decode_xml_escapes(text: &str) -> String {
    if !text.contains("_x") {
        return text.to_string();
    }

    let mut decoded = String::with_capacity(text.len());
    let mut idx = 0;
    while idx < text.len() {
        if let Some(code) = escape_code_at(text, idx) {
            if let Some(ch) = char::from_u32(code) {
                decoded.push(ch);
                idx += 7;
                continue;
            }
            if (0xD800..0xDC00).contains(&code) {
                let low = escape_code_at(text, idx + 7)
                    .filter(|low| (0xDC00..0xE000).contains(low));
                if let Some(low) = low {
                    let combined = 0x10000 + ((code - 0xD800) << 10) + (low - 0xDC00);
                    if let Some(ch) = char::from_u32(combined) {
                        decoded.push(ch);
                        idx += 14;
                        continue;
                    }
                }
            }
        }
        let Some(ch) = text[idx..].chars().next() else {
            break;
        };
        decoded.push(ch);
        idx += ch.len_utf8();
    }
    decoded
}

/// Column keys from the header row. Blank headers become `__EMPTY`, repeats
/// get `_1`, `_2`, ... appended.
pub fn header_keys(cells: &[Data], escaped: bool) -> Vec<String> {
    let mut seen: HashMap<String, usize> = HashMap::new();
    let mut keys = Vec::with_capacity(cells.len());

    for cell in cells {
        let text = sheet_cell_to_value(cell, escaped).to_string();
        let base = if text.is_empty() {
            EMPTY_HEADER.to_string()
        } else {
            text
        };

        let mut key = base.clone();
        if let Some(count) = seen.get_mut(&base) {
            loop {
                key = format!("{base}_{count}");
                *count += 1;
                if !keys.contains(&key) {
                    break;
                }
            }
        } else {
            seen.insert(base.clone(), 1);
        }
        seen.entry(key.clone()).or_insert(1);
        keys.push(key);
    }
    keys
}

/// One data row as a record holding only its non-empty cells. Blank rows
/// yield `None`.
fn record_from_cells(headers: &[String], cells: &[Data], escaped: bool) -> Option<Row> {
    let row: Row = headers
        .iter()
        .zip(cells)
        .map(|(key, cell)| (key.as_str(), sheet_cell_to_value(cell, escaped)))
        .filter(|(_, value)| !value.is_empty())
        .collect();
    (!row.is_empty()).then_some(row)
}

/// First row's keys in order, then keys that only show up in later rows.
pub fn export_columns(table: &Table) -> Vec<String> {
    let mut columns: Vec<String> = Vec::new();
    for row in table.rows() {
        for key in row.keys() {
            if !columns.iter().any(|existing| existing == key) {
                columns.push(key.to_string());
            }
        }
    }
    columns
}

#[cfg(test)]
mod tests {
    use super::*;

    fn workbook_bytes(rows: &[Vec<&str>]) -> Vec<u8> {
        let mut workbook = Workbook::new();
        let worksheet = workbook.add_worksheet();
        for (r, row) in rows.iter().enumerate() {
            for (c, value) in row.iter().enumerate() {
                if !value.is_empty() {
                    worksheet
                        .write_string(r as u32, c as u16, *value)
                        .expect("fixture cell should be written");
                }
            }
        }
        workbook.save_to_buffer().expect("fixture workbook should save")
    }

    #[test]
    fn zero_bytes_fail_with_empty() {
        assert_eq!(XlsxCodec.parse(&[]), Err(ParseError::Empty));
    }

    #[test]
    fn garbage_bytes_are_unrecognized() {
        let result = XlsxCodec.parse(b"name,city\nAlice,Paris\n");
        assert!(
            matches!(result, Err(ParseError::Unrecognized(_))),
            "csv text should not parse as a workbook: {result:?}"
        );
    }

    #[test]
    fn header_only_sheet_is_empty() {
        let bytes = workbook_bytes(&[vec!["A", "B"]]);
        assert_eq!(XlsxCodec.parse(&bytes), Err(ParseError::Empty));
    }

    #[test]
    fn first_row_becomes_keys() {
        let bytes = workbook_bytes(&[vec!["A", "B"], vec!["1", "x"], vec!["2", "y"]]);
        let table = XlsxCodec.parse(&bytes).expect("parse should succeed");

        assert_eq!(table.len(), 2);
        assert_eq!(table.column_keys(), vec!["A".to_string(), "B".to_string()]);
        assert_eq!(table.row(1).unwrap().get("B"), Some(&CellValue::from("y")));
    }

    #[test]
    fn empty_cells_and_blank_rows_are_skipped() {
        let bytes = workbook_bytes(&[
            vec!["A", "B", "C"],
            vec!["1", "", "z"],
            vec!["", "", ""],
            vec!["", "y", ""],
        ]);
        let table = XlsxCodec.parse(&bytes).expect("parse should succeed");

        assert_eq!(table.len(), 2, "blank row should be dropped");
        let first: Vec<&str> = table.row(0).unwrap().keys().collect();
        assert_eq!(first, vec!["A", "C"]);
        let second: Vec<&str> = table.row(1).unwrap().keys().collect();
        assert_eq!(second, vec!["B"]);
    }

    #[test]
    fn header_keys_name_blanks_and_duplicates() {
        let cells = vec![
            Data::String("Name".into()),
            Data::Empty,
            Data::String("Name".into()),
            Data::Empty,
            Data::Float(3.0),
            Data::String("Name".into()),
        ];
        assert_eq!(
            header_keys(&cells, true),
            vec!["Name", "__EMPTY", "Name_1", "__EMPTY_1", "3", "Name_2"]
        );
    }

    #[test]
    fn escaped_text_is_decoded() {
        assert_eq!(decode_xml_escapes("a_x000D_\nb"), "a\r\nb");
        assert_eq!(decode_xml_escapes("_x005F_x0041_"), "_x0041_");
        assert_eq!(decode_xml_escapes("_xD83D__xDE00_"), "\u{1F600}");
        assert_eq!(decode_xml_escapes("_xD83D_ alone"), "_xD83D_ alone");
        assert_eq!(decode_xml_escapes("_x12_ and _xZZZZ_"), "_x12_ and _xZZZZ_");
        assert_eq!(decode_xml_escapes("héllo_x0009_"), "héllo\t");
    }

    #[test]
    fn escaped_header_keys_are_decoded() {
        let cells = vec![Data::String("Line_x000D_Break".into())];
        assert_eq!(header_keys(&cells, true), vec!["Line\rBreak"]);
        assert_eq!(header_keys(&cells, false), vec!["Line_x000D_Break"]);
    }

    #[test]
    fn typed_cells_convert_to_values() {
        assert_eq!(cell_to_value(&Data::Int(4)), CellValue::Number(4.0));
        assert_eq!(cell_to_value(&Data::Bool(true)), CellValue::Bool(true));
        assert_eq!(cell_to_value(&Data::Empty), CellValue::Empty);
    }

    #[test]
    fn serialize_keeps_first_row_order_and_appends_late_keys() {
        let table = Table::from_rows([
            Row::new().with("Zeta", "1").with("Alpha", "2"),
            Row::new().with("Alpha", "3").with("Mid", "4"),
        ]);
        assert_eq!(export_columns(&table), vec!["Zeta", "Alpha", "Mid"]);

        let bytes = XlsxCodec.serialize(&table).expect("serialize should succeed");
        let parsed = XlsxCodec.parse(&bytes).expect("round trip should parse");
        assert_eq!(parsed.column_keys(), vec!["Zeta", "Alpha", "Mid"]);
        assert_eq!(parsed.row(1).unwrap().get("Zeta"), None);
        assert_eq!(parsed.row(1).unwrap().get("Mid"), Some(&CellValue::from("4")));
    }

    #[test]
    fn text_with_control_chars_and_escape_lookalikes_round_trips() {
        let values = ["a\r\nb", "_x0041_", "tab\there", "  padded  ", "0001", "=1+1"];
        let table = Table::from_rows(
            values
                .iter()
                .map(|value| Row::new().with("K", "k").with("V", *value)),
        );

        let bytes = XlsxCodec.serialize(&table).expect("serialize should succeed");
        let parsed = XlsxCodec.parse(&bytes).expect("parse should succeed");

        assert_eq!(parsed, table);
    }

    #[test]
    fn empty_text_comes_back_as_missing_cell() {
        let table = Table::from_rows([Row::new().with("K", "k").with("V", "")]);

        let bytes = XlsxCodec.serialize(&table).expect("serialize should succeed");
        let parsed = XlsxCodec.parse(&bytes).expect("parse should succeed");

        assert_eq!(parsed.row(0).unwrap().get("V"), None);
        assert_eq!(parsed.row(0).unwrap().get("K"), Some(&CellValue::from("k")));
    }

    #[test]
    fn serialize_does_not_touch_input() {
        let table = Table::from_rows([Row::new().with("A", 1.0)]);
        let before = table.clone();
        XlsxCodec.serialize(&table).expect("serialize should succeed");
        assert_eq!(table, before);
    }

    #[test]
    fn empty_table_still_serializes() {
        let bytes = XlsxCodec
            .serialize(&Table::new())
            .expect("empty table should serialize");
        assert!(!bytes.is_empty());
    }
}

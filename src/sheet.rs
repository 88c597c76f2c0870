//! Spreadsheet reading.
//!
//! Turns workbook bytes into a [`Table`]: one header row followed by data
//! rows whose cells are plain optional strings. Format detection is left to
//! calamine, so legacy `.xls`, `.xlsx`, `.xlsb` and `.ods` files all work.
//! Only the first worksheet is read.
//!
//! Cell values are normalized once here so the parser never has to care
//! about spreadsheet types:
//!
//! | Cell | Value |
//! |------|-------|
//! | empty, blank string, error | `None` |
//! | string | trimmed |
//! | `25.0` (integral float) | `"25"` |
//! | date | `"15/02/2025"` (`"15/02/2025 14:00"` with a time part) |
//! | time of day (no date part) | `"14:00"` |

use calamine::{Data, DataType, Reader, open_workbook_auto_from_rs};
use chrono::{NaiveDateTime, Timelike};
use std::fs;
use std::io::Cursor;
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SheetError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Unreadable spreadsheet: {0}")]
    Workbook(#[from] calamine::Error),
    #[error("Spreadsheet contains no worksheet")]
    NoWorksheet,
}

/// A header row plus data rows, all cells already normalized.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Table {
    headers: Vec<String>,
    rows: Vec<Vec<Option<String>>>,
}

impl Table {
    /// Build a table from raw header names and rows.
    ///
    /// Header names are normalized (trimmed, lowercased) so lookups through
    /// [`Table::column`] are case- and whitespace-insensitive.
    pub fn new(headers: Vec<String>, rows: Vec<Vec<Option<String>>>) -> Self {
        Self {
            headers: headers.iter().map(|h| normalize_header(h)).collect(),
            rows,
        }
    }

    /// Read the first worksheet of an in-memory workbook.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, SheetError> {
        let mut workbook = open_workbook_auto_from_rs(Cursor::new(bytes.to_vec()))?;
        let range = workbook
            .worksheet_range_at(0)
            .ok_or(SheetError::NoWorksheet)??;

        let mut rows = range.rows();
        let headers = match rows.next() {
            Some(header_row) => header_row
                .iter()
                .map(|cell| cell_to_string(cell).unwrap_or_default())
                .collect(),
            None => return Ok(Self::default()),
        };
        let rows = rows
            .map(|row| row.iter().map(cell_to_string).collect())
            .collect();

        Ok(Self::new(headers, rows))
    }

    /// Read the first worksheet of a workbook on disk.
    pub fn from_path(path: &Path) -> Result<Self, SheetError> {
        let bytes = fs::read(path)?;
        Self::from_bytes(&bytes)
    }

    /// Normalized header names, in column order.
    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    pub fn rows(&self) -> &[Vec<Option<String>>] {
        &self.rows
    }

    /// Index of the first column whose header matches `name` after
    /// trimming and lowercasing both sides.
    pub fn column(&self, name: &str) -> Option<usize> {
        let wanted = normalize_header(name);
        self.headers.iter().position(|h| *h == wanted)
    }
}

fn normalize_header(name: &str) -> String {
    name.trim().to_lowercase()
}

/// Convert a calamine cell into the parser's view of it.
fn cell_to_string(cell: &Data) -> Option<String> {
    let text = match cell {
        Data::Empty | Data::Error(_) => return None,
        Data::String(s) => s.trim().to_string(),
        Data::Float(f) if f.fract() == 0.0 && f.abs() < 1e15 => format!("{}", *f as i64),
        Data::Float(f) => f.to_string(),
        Data::Int(i) => i.to_string(),
        Data::Bool(b) => b.to_string(),
        // A serial below one day carries no date, only a time of day.
        Data::DateTime(dt) if (0.0..1.0).contains(&dt.as_f64()) => format_time_of_day(dt.as_f64()),
        Data::DateTime(_) | Data::DateTimeIso(_) => match cell.as_datetime() {
            Some(dt) => format_datetime(dt),
            None => cell.to_string(),
        },
        Data::DurationIso(s) => s.clone(),
    };
    (!text.is_empty()).then_some(text)
}

/// `0.5833…` (a day fraction) → `"14:00"`, rounded to the minute.
fn format_time_of_day(fraction: f64) -> String {
    let minutes = (fraction * 24.0 * 60.0).round() as u32 % (24 * 60);
    format!("{:02}:{:02}", minutes / 60, minutes % 60)
}

fn format_datetime(dt: NaiveDateTime) -> String {
    if dt.hour() == 0 && dt.minute() == 0 && dt.second() == 0 {
        dt.format("%d/%m/%Y").to_string()
    } else {
        dt.format("%d/%m/%Y %H:%M").to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::workbook_bytes;
    use rust_xlsxwriter::{ExcelDateTime, Format, Workbook};

    #[test]
    fn column_lookup_ignores_case_and_whitespace() {
        let table = Table::new(vec![" Titre de la ressource ".into(), "LIEN".into()], vec![]);
        assert_eq!(table.column("titre de la ressource"), Some(0));
        assert_eq!(table.column("TITRE DE LA RESSOURCE"), Some(0));
        assert_eq!(table.column("  Lien"), Some(1));
        assert_eq!(table.column("prix"), None);
    }

    #[test]
    fn duplicate_headers_resolve_to_first() {
        let table = Table::new(vec!["Lien".into(), "lien".into()], vec![]);
        assert_eq!(table.column("lien"), Some(0));
    }

    #[test]
    fn reads_header_and_rows_from_xlsx() {
        let bytes = workbook_bytes(
            &["Type de ressource", "Titre de la ressource"],
            &[&["introduction", ""], &["ressources", "  Guide  "]],
        );
        let table = Table::from_bytes(&bytes).unwrap();

        assert_eq!(table.headers(), ["type de ressource", "titre de la ressource"]);
        assert_eq!(table.rows().len(), 2);
        assert_eq!(table.rows()[0][0].as_deref(), Some("introduction"));
        assert_eq!(table.rows()[1][1].as_deref(), Some("Guide"));
    }

    #[test]
    fn empty_cells_become_none() {
        let bytes = workbook_bytes(&["Type", "Prix", "Lien"], &[&["event", "", "https://x"]]);
        let table = Table::from_bytes(&bytes).unwrap();
        assert_eq!(table.rows()[0][1], None);
    }

    #[test]
    fn integral_floats_lose_their_decimal_part() {
        assert_eq!(cell_to_string(&Data::Float(25.0)).as_deref(), Some("25"));
        assert_eq!(cell_to_string(&Data::Float(12.5)).as_deref(), Some("12.5"));
        assert_eq!(cell_to_string(&Data::Int(7)).as_deref(), Some("7"));
    }

    #[test]
    fn blank_strings_become_none() {
        assert_eq!(cell_to_string(&Data::String("   ".into())), None);
        assert_eq!(cell_to_string(&Data::Empty), None);
    }

    #[test]
    fn dates_are_formatted_day_first() {
        let date = NaiveDateTime::parse_from_str("2025-02-15 00:00:00", "%Y-%m-%d %H:%M:%S")
            .unwrap();
        assert_eq!(format_datetime(date), "15/02/2025");
        let with_time = NaiveDateTime::parse_from_str("2025-02-15 14:30:00", "%Y-%m-%d %H:%M:%S")
            .unwrap();
        assert_eq!(format_datetime(with_time), "15/02/2025 14:30");
    }

    #[test]
    fn day_fractions_are_times_of_day() {
        assert_eq!(format_time_of_day(0.0), "00:00");
        assert_eq!(format_time_of_day(14.0 / 24.0), "14:00");
        assert_eq!(format_time_of_day(19.0 / 24.0 - 1e-9), "19:00");
        assert_eq!(format_time_of_day(0.999_999), "00:00");
    }

    #[test]
    fn typed_date_and_time_cells_read_back_formatted() {
        let mut workbook = Workbook::new();
        let date_format = Format::new().set_num_format("dd/mm/yyyy");
        let time_format = Format::new().set_num_format("hh:mm");
        let stamp_format = Format::new().set_num_format("dd/mm/yyyy hh:mm");
        let sheet = workbook.add_worksheet();
        sheet.write_string(0, 0, "Date").unwrap();
        sheet.write_string(0, 1, "Horaire").unwrap();
        sheet.write_string(0, 2, "Début").unwrap();

        let date = ExcelDateTime::from_ymd(2025, 2, 15).unwrap();
        let time = ExcelDateTime::from_hms(14, 0, 0).unwrap();
        let stamp = ExcelDateTime::from_ymd(2025, 2, 15)
            .unwrap()
            .and_hms(14, 30, 0)
            .unwrap();
        sheet.write_datetime_with_format(1, 0, &date, &date_format).unwrap();
        sheet.write_datetime_with_format(1, 1, &time, &time_format).unwrap();
        sheet.write_datetime_with_format(1, 2, &stamp, &stamp_format).unwrap();
        let bytes = workbook.save_to_buffer().unwrap();

        let table = Table::from_bytes(&bytes).unwrap();
        let row = &table.rows()[0];
        assert_eq!(row[0].as_deref(), Some("15/02/2025"));
        assert_eq!(row[1].as_deref(), Some("14:00"));
        assert_eq!(row[2].as_deref(), Some("15/02/2025 14:30"));
    }

    #[test]
    fn event_time_cell_parses_as_time_of_day() {
        let mut workbook = Workbook::new();
        let time_format = Format::new().set_num_format("hh:mm");
        let sheet = workbook.add_worksheet();
        sheet.write_string(0, 0, "Type de ressource").unwrap();
        sheet.write_string(0, 1, "Horaire").unwrap();
        sheet.write_string(1, 0, "événements").unwrap();
        let time = ExcelDateTime::from_hms(19, 0, 0).unwrap();
        sheet.write_datetime_with_format(1, 1, &time, &time_format).unwrap();
        let bytes = workbook.save_to_buffer().unwrap();

        let resources =
            crate::parse::parse_bytes(&bytes, &crate::config::FieldDefaults::default()).unwrap();
        let crate::types::Resource::Event(event) = &resources[0] else {
            panic!("expected event, got {:?}", resources[0]);
        };
        assert_eq!(event.time, "19:00");
    }

    #[test]
    fn garbage_bytes_are_a_structural_error() {
        let result = Table::from_bytes(b"definitely not a spreadsheet");
        assert!(matches!(result, Err(SheetError::Workbook(_))));
    }

    #[test]
    fn missing_file_is_io_error() {
        let result = Table::from_path(Path::new("/nonexistent/newsletter.xlsx"));
        assert!(matches!(result, Err(SheetError::Io(_))));
    }
}

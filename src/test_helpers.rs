//! Shared test utilities for the curation-letter test suite.
//!
//! Builds spreadsheets in memory so tests never depend on fixture files:
//!
//! ```rust
//! use crate::test_helpers::*;
//!
//! let bytes = workbook_bytes(&["Type", "Title"], &[&["video", "Demo"]]);
//! let table = Table::from_bytes(&bytes).unwrap();
//!
//! let same = table(&["Type", "Title"], &[&["video", "Demo"]]);
//! ```

use rust_xlsxwriter::Workbook;

use crate::sample;
use crate::sheet::Table;

// =========================================================================
// Workbooks
// =========================================================================

/// An `.xlsx` workbook with one header row and string cells.
/// Empty strings are left as blank cells.
pub fn workbook_bytes(headers: &[&str], rows: &[&[&str]]) -> Vec<u8> {
    let mut workbook = Workbook::new();
    let sheet = workbook.add_worksheet();
    for (col, header) in headers.iter().enumerate() {
        sheet.write_string(0, col as u16, *header).unwrap();
    }
    for (row, values) in rows.iter().enumerate() {
        for (col, value) in values.iter().enumerate() {
            if !value.is_empty() {
                sheet.write_string(row as u32 + 1, col as u16, *value).unwrap();
            }
        }
    }
    workbook.save_to_buffer().unwrap()
}

/// The seven-row example workbook.
pub fn sample_workbook_bytes() -> Vec<u8> {
    sample::workbook_bytes().unwrap()
}

// =========================================================================
// Tables
// =========================================================================

/// A [`Table`] built directly, skipping the workbook round trip.
/// Empty strings become missing cells, as the sheet reader would produce.
pub fn table(headers: &[&str], rows: &[&[&str]]) -> Table {
    Table::new(
        headers.iter().map(|h| h.to_string()).collect(),
        rows.iter()
            .map(|row| {
                row.iter()
                    .map(|cell| (!cell.is_empty()).then(|| cell.to_string()))
                    .collect()
            })
            .collect(),
    )
}

//! XLSX workbook assembly.
//!
//! This module turns materialized tables into a multi-sheet workbook.
//! The workbook is assembled entirely in memory; nothing touches the
//! filesystem until [`WorkbookBuilder::save`] is called, so a failed
//! build leaves no partial file behind.

use std::path::Path;

use rust_xlsxwriter::{Format, Workbook, Worksheet};
use serde_json::Value as JsonValue;

use crate::error::ExportResult;
use crate::models::TableData;

/// Builds a multi-sheet workbook, one sheet per table.
pub struct WorkbookBuilder {
    workbook: Workbook,
    header_format: Format,
    sheet_count: usize,
}

impl WorkbookBuilder {
    /// Create an empty workbook.
    pub fn new() -> Self {
        Self {
            workbook: Workbook::new(),
            header_format: Format::new().set_bold(),
            sheet_count: 0,
        }
    }

    /// Add one table as a named sheet.
    ///
    /// The first row holds the column names in bold; data rows follow in
    /// the order they appear in `data.rows`. Sheet names over 31
    /// characters are rejected here; duplicate names fail at save time.
    pub fn add_table(&mut self, data: &TableData) -> ExportResult<()> {
        let worksheet = self.workbook.add_worksheet();
        worksheet.set_name(data.name.as_str())?;

        for (col, header) in data.header().iter().enumerate() {
            worksheet.write_string_with_format(0, col as u16, *header, &self.header_format)?;
        }

        for (row_idx, row) in data.rows.iter().enumerate() {
            let excel_row = (row_idx + 1) as u32;
            for (col_idx, value) in row.iter().enumerate() {
                write_cell(worksheet, excel_row, col_idx as u16, value)?;
            }
        }

        // Auto-fit columns for readability
        worksheet.autofit();

        self.sheet_count += 1;
        Ok(())
    }

    /// Number of sheets added so far.
    pub fn sheet_count(&self) -> usize {
        self.sheet_count
    }

    /// Write the workbook to disk.
    pub fn save(&mut self, path: &Path) -> ExportResult<()> {
        self.workbook.save(path)?;
        Ok(())
    }

    /// Render the workbook to raw bytes without touching the filesystem.
    pub fn save_to_buffer(&mut self) -> ExportResult<Vec<u8>> {
        Ok(self.workbook.save_to_buffer()?)
    }
}

impl Default for WorkbookBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Write one decoded value into a cell, keeping its type.
///
/// NULL leaves the cell blank, matching how database tools render NULL.
fn write_cell(
    worksheet: &mut Worksheet,
    row: u32,
    col: u16,
    value: &JsonValue,
) -> ExportResult<()> {
    match value {
        JsonValue::Null => {}
        JsonValue::Bool(b) => {
            worksheet.write_boolean(row, col, *b)?;
        }
        JsonValue::Number(n) => {
            if let Some(f) = n.as_f64() {
                worksheet.write_number(row, col, f)?;
            } else {
                worksheet.write_string(row, col, n.to_string())?;
            }
        }
        JsonValue::String(s) => {
            worksheet.write_string(row, col, s)?;
        }
        // JSON arrays and objects keep their serialized form
        other => {
            worksheet.write_string(row, col, other.to_string())?;
        }
    }
    Ok(())
}

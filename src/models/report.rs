//! Export run summary models.
//!
//! After a successful run the exporter returns an [`ExportReport`]
//! describing what was written, one [`SheetReport`] per table.

use std::path::PathBuf;

use chrono::{DateTime, Utc};
use serde::Serialize;

/// Summary for a single exported sheet.
#[derive(Debug, Clone, Serialize)]
pub struct SheetReport {
    /// Table (and sheet) name.
    pub table: String,
    /// Number of data rows written (excluding the header row).
    pub rows: usize,
    /// Number of columns written.
    pub columns: usize,
}

/// Summary of a completed export run.
#[derive(Debug, Clone, Serialize)]
pub struct ExportReport {
    /// Path the workbook was written to.
    pub output: PathBuf,
    /// Per-table summaries, in export order.
    pub sheets: Vec<SheetReport>,
    /// Size of the workbook file on disk.
    pub file_size_bytes: u64,
    /// Wall-clock duration of the run.
    pub elapsed_ms: u64,
    pub started_at: DateTime<Utc>,
}

impl ExportReport {
    /// Total data rows written across all sheets.
    pub fn total_rows(&self) -> usize {
        self.sheets.iter().map(|s| s.rows).sum()
    }

    /// Number of sheets written.
    pub fn sheet_count(&self) -> usize {
        self.sheets.len()
    }

    /// Human-readable file size.
    ///
    /// Powered by the `humansize` crate with WINDOWS preset (1024-based, KB/MB/GB units).
    pub fn formatted_size(&self) -> String {
        humansize::format_size(self.file_size_bytes, humansize::WINDOWS)
    }
}

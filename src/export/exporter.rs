//! Export orchestration.
//!
//! Reads every configured table, assembles the workbook, and writes it
//! to disk only after the last table has been added. Any failure along
//! the way leaves no output file behind.

use std::time::Instant;

use chrono::Utc;
use tracing::info;

use crate::config::Config;
use crate::db::{Database, TableReader};
use crate::error::ExportResult;
use crate::export::workbook::WorkbookBuilder;
use crate::models::{ExportReport, SheetReport};

/// Runs one export: a fixed list of tables into one workbook.
pub struct Exporter {
    config: Config,
}

impl Exporter {
    /// Create an exporter for the given configuration.
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    /// Read every configured table and write the workbook.
    pub async fn run(&self, db: &Database) -> ExportResult<ExportReport> {
        let started_at = Utc::now();
        let start = Instant::now();

        let tables = self.config.parse_tables()?;
        let reader = TableReader::new(
            self.config.query_timeout_duration(),
            self.config.decode_binary,
        );

        let mut builder = WorkbookBuilder::new();
        let mut sheets = Vec::with_capacity(tables.len());

        for table in &tables {
            let data = reader.read_table(db.pool(), table).await?;
            builder.add_table(&data)?;
            info!(
                table = %table,
                rows = data.row_count(),
                columns = data.column_count(),
                "Exported table"
            );
            sheets.push(SheetReport {
                table: table.as_str().to_string(),
                rows: data.row_count(),
                columns: data.column_count(),
            });
        }

        builder.save(&self.config.output)?;
        let file_size_bytes = std::fs::metadata(&self.config.output)
            .map(|m| m.len())
            .unwrap_or(0);

        let report = ExportReport {
            output: self.config.output.clone(),
            sheets,
            file_size_bytes,
            elapsed_ms: start.elapsed().as_millis() as u64,
            started_at,
        };

        info!(
            output = %report.output.display(),
            sheets = report.sheet_count(),
            rows = report.total_rows(),
            size = %report.formatted_size(),
            elapsed_ms = report.elapsed_ms,
            "All tables exported successfully"
        );

        Ok(report)
    }
}

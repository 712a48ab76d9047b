//! Full-table reads.
//!
//! This module reads entire tables into memory: column metadata from
//! `information_schema` first, then every row via an unprepared
//! text-protocol query. Metadata comes from `information_schema` rather
//! than the result set so empty tables still get a header row.

use std::time::Duration;

use futures_util::StreamExt;
use sqlx::MySqlPool;
use sqlx::Row;
use tokio::time::timeout;
use tracing::debug;

use crate::db::types;
use crate::error::{ExportError, ExportResult};
use crate::models::{ColumnMetadata, TableData, TableName};

/// Column metadata query.
///
/// CONVERT(... USING utf8) avoids VARBINARY results on servers where
/// information_schema columns carry a binary charset. ORDINAL_POSITION
/// order matches the column order of `SELECT *`.
const DESCRIBE_COLUMNS: &str = r#"
SELECT
    CONVERT(COLUMN_NAME USING utf8) AS COLUMN_NAME,
    CONVERT(COLUMN_TYPE USING utf8) AS COLUMN_TYPE,
    CONVERT(IS_NULLABLE USING utf8) AS IS_NULLABLE
FROM information_schema.columns
WHERE TABLE_NAME = ? AND TABLE_SCHEMA = DATABASE()
ORDER BY ORDINAL_POSITION
"#;

/// Reads whole tables from a connected pool.
#[derive(Debug, Clone)]
pub struct TableReader {
    query_timeout: Duration,
    decode_binary: bool,
}

impl TableReader {
    /// Create a reader with the given per-table timeout.
    pub fn new(query_timeout: Duration, decode_binary: bool) -> Self {
        Self {
            query_timeout,
            decode_binary,
        }
    }

    /// Fetch column metadata for a table, in column order.
    ///
    /// An empty result means the table does not exist in the connected
    /// database.
    pub async fn fetch_columns(
        &self,
        pool: &MySqlPool,
        table: &TableName,
    ) -> ExportResult<Vec<ColumnMetadata>> {
        let rows = sqlx::query(DESCRIBE_COLUMNS)
            .bind(table.as_str())
            .fetch_all(pool)
            .await?;

        Ok(rows
            .iter()
            .map(|row| {
                ColumnMetadata::new(
                    get_string(row, "COLUMN_NAME"),
                    get_string(row, "COLUMN_TYPE"),
                    get_string(row, "IS_NULLABLE") == "YES",
                )
            })
            .collect())
    }

    /// Read an entire table, rows in the order the server returns them.
    pub async fn read_table(
        &self,
        pool: &MySqlPool,
        table: &TableName,
    ) -> ExportResult<TableData> {
        let columns = self.fetch_columns(pool, table).await?;
        if columns.is_empty() {
            return Err(ExportError::schema(
                format!("Table '{}' not found", table),
                table.as_str(),
            ));
        }

        let sql = format!("SELECT * FROM {}", table.quoted());
        debug!(
            sql = %sql,
            timeout_secs = ?self.query_timeout.as_secs(),
            "Reading table"
        );

        // Unprepared text-protocol fetch; there are no parameters to bind
        let rows_future = {
            use sqlx::Executor;
            pool.fetch(sql.as_str()).collect::<Vec<_>>()
        };

        let results = match timeout(self.query_timeout, rows_future).await {
            Ok(results) => results,
            Err(_) => {
                return Err(ExportError::timeout(
                    format!("read of table '{}'", table),
                    self.query_timeout.as_secs(),
                ));
            }
        };

        let mut rows = Vec::with_capacity(results.len());
        for result in results {
            let row = result.map_err(ExportError::from)?;
            let values = types::decode_row(&row, self.decode_binary);
            // A mismatch means the table changed between the two queries
            if values.len() != columns.len() {
                return Err(ExportError::internal(format!(
                    "Column count mismatch for table '{}': metadata has {}, row has {}",
                    table,
                    columns.len(),
                    values.len()
                )));
            }
            rows.push(values);
        }

        debug!(
            table = %table,
            rows = rows.len(),
            columns = columns.len(),
            "Table read complete"
        );

        Ok(TableData::new(table.clone(), columns, rows))
    }
}

/// Safely get a string from a MySQL row.
/// MySQL may return VARBINARY instead of VARCHAR depending on charset configuration.
fn get_string(row: &sqlx::mysql::MySqlRow, column: &str) -> String {
    row.try_get::<String, _>(column)
        .ok()
        .or_else(|| {
            row.try_get::<Vec<u8>, _>(column)
                .ok()
                .and_then(|bytes| String::from_utf8(bytes).ok())
        })
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reader_settings() {
        let reader = TableReader::new(Duration::from_secs(30), false);
        assert_eq!(reader.query_timeout, Duration::from_secs(30));
        assert!(!reader.decode_binary);
    }

    #[test]
    fn test_describe_columns_orders_by_position() {
        assert!(DESCRIBE_COLUMNS.contains("ORDER BY ORDINAL_POSITION"));
    }
}

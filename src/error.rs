//! Error types for the exporter.
//!
//! This module defines all error types using `thiserror` for ergonomic error handling.
//! Each variant carries a message the operator can act on without reading source,
//! plus a suggestion where one is known.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ExportError {
    #[error("Connection failed: {message}")]
    Connection { message: String, suggestion: String },

    #[error("Database error: {message}")]
    Database {
        message: String,
        /// e.g., "42S02" for unknown table
        sql_state: Option<String>,
        suggestion: String,
    },

    #[error("Schema error: {message} (table: {table})")]
    Schema { message: String, table: String },

    #[error("Timeout: {operation} exceeded {elapsed_secs}s")]
    Timeout { operation: String, elapsed_secs: u64 },

    #[error("Invalid input: {message}")]
    InvalidInput { message: String },

    #[error("Workbook error: {message}")]
    Workbook { message: String },

    #[error("Internal error: {message}")]
    Internal { message: String },
}

impl ExportError {
    /// Create a connection error with a helpful suggestion.
    pub fn connection(message: impl Into<String>, suggestion: impl Into<String>) -> Self {
        Self::Connection {
            message: message.into(),
            suggestion: suggestion.into(),
        }
    }

    /// Create a database error with optional SQL state.
    pub fn database(
        message: impl Into<String>,
        sql_state: Option<String>,
        suggestion: impl Into<String>,
    ) -> Self {
        Self::Database {
            message: message.into(),
            sql_state,
            suggestion: suggestion.into(),
        }
    }

    /// Create a schema error.
    pub fn schema(message: impl Into<String>, table: impl Into<String>) -> Self {
        Self::Schema {
            message: message.into(),
            table: table.into(),
        }
    }

    /// Create a timeout error.
    pub fn timeout(operation: impl Into<String>, elapsed_secs: u64) -> Self {
        Self::Timeout {
            operation: operation.into(),
            elapsed_secs,
        }
    }

    /// Create an invalid input error.
    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::InvalidInput {
            message: message.into(),
        }
    }

    /// Create a workbook error.
    pub fn workbook(message: impl Into<String>) -> Self {
        Self::Workbook {
            message: message.into(),
        }
    }

    /// Create an internal error.
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }

    /// Get the suggestion for this error, if available.
    pub fn suggestion(&self) -> Option<&str> {
        match self {
            Self::Connection { suggestion, .. } => Some(suggestion),
            Self::Database { suggestion, .. } => Some(suggestion),
            _ => None,
        }
    }
}

/// Convert sqlx errors to ExportError.
impl From<sqlx::Error> for ExportError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::Configuration(msg) => ExportError::connection(
                msg.to_string(),
                "Check the connection URL format and credentials",
            ),
            sqlx::Error::Database(db_err) => {
                let code = db_err.code().map(|c| c.to_string());
                ExportError::database(
                    db_err.message(),
                    code,
                    "Check that the table exists and the account may read it",
                )
            }
            sqlx::Error::RowNotFound => ExportError::database(
                "No rows returned",
                None,
                "Verify the query conditions match existing data",
            ),
            sqlx::Error::PoolTimedOut => ExportError::timeout("connection pool acquire", 30),
            sqlx::Error::PoolClosed => {
                ExportError::connection("Connection pool is closed", "Reconnect to the database")
            }
            sqlx::Error::Io(io_err) => ExportError::connection(
                format!("I/O error: {}", io_err),
                "Check network connectivity and database server status",
            ),
            sqlx::Error::Tls(tls_err) => ExportError::connection(
                format!("TLS error: {}", tls_err),
                "Verify TLS configuration and certificates",
            ),
            sqlx::Error::Protocol(msg) => ExportError::connection(
                format!("Protocol error: {}", msg),
                "Check database server compatibility",
            ),
            sqlx::Error::ColumnNotFound(col) => {
                ExportError::internal(format!("Column not found: {}", col))
            }
            sqlx::Error::ColumnIndexOutOfBounds { index, len } => ExportError::internal(format!(
                "Column index {} out of bounds (len: {})",
                index, len
            )),
            sqlx::Error::ColumnDecode { index, source } => {
                ExportError::internal(format!("Failed to decode column {}: {}", index, source))
            }
            sqlx::Error::Decode(source) => {
                ExportError::internal(format!("Decode error: {}", source))
            }
            sqlx::Error::WorkerCrashed => ExportError::internal("Database worker crashed"),
            _ => ExportError::internal(format!("Unknown database error: {}", err)),
        }
    }
}

/// Convert workbook library errors to ExportError.
impl From<rust_xlsxwriter::XlsxError> for ExportError {
    fn from(err: rust_xlsxwriter::XlsxError) -> Self {
        ExportError::workbook(err.to_string())
    }
}

/// Result type alias for export operations.
pub type ExportResult<T> = Result<T, ExportError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = ExportError::connection("Failed to connect", "Check credentials");
        assert!(err.to_string().contains("Connection failed"));
    }

    #[test]
    fn test_error_suggestion() {
        let err = ExportError::database(
            "Unknown table 'nope'",
            Some("42S02".to_string()),
            "Check the table name",
        );
        assert_eq!(err.suggestion(), Some("Check the table name"));
    }

    #[test]
    fn test_schema_error_names_table() {
        let err = ExportError::schema("Table not found", "meal_records");
        assert!(err.to_string().contains("meal_records"));
    }

    #[test]
    fn test_timeout_display() {
        let err = ExportError::timeout("table read", 30);
        let msg = err.to_string();
        assert!(msg.contains("table read"));
        assert!(msg.contains("30s"));
    }

    #[test]
    fn test_no_suggestion_for_workbook_errors() {
        let err = ExportError::workbook("sheet name too long");
        assert_eq!(err.suggestion(), None);
    }

    #[test]
    fn test_from_xlsx_error() {
        // Sheet names over 31 characters are rejected by the library.
        let mut workbook = rust_xlsxwriter::Workbook::new();
        let worksheet = workbook.add_worksheet();
        let xlsx_err = match worksheet.set_name("x".repeat(40)) {
            Ok(_) => panic!("expected sheet name error"),
            Err(e) => e,
        };
        let err = ExportError::from(xlsx_err);
        assert!(matches!(err, ExportError::Workbook { .. }));
    }
}

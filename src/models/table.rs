//! Table-related data models.
//!
//! This module defines types for table identity, column metadata, and
//! fully materialized table contents read from the database.

use serde::Serialize;
use serde_json::Value as JsonValue;

/// Maximum length of a MySQL identifier.
pub const MAX_TABLE_NAME_LEN: usize = 64;

/// A validated table name.
///
/// Names are restricted to ASCII alphanumerics, `_` and `$`, which covers
/// unquoted MySQL identifiers. The restriction means a name can be wrapped
/// in backticks and spliced into SQL without any escaping concerns.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct TableName(String);

impl TableName {
    /// Validate and wrap a table name.
    pub fn new(name: impl Into<String>) -> Result<Self, TableNameError> {
        let name = name.into();

        if name.is_empty() {
            return Err(TableNameError::Empty);
        }
        if name.len() > MAX_TABLE_NAME_LEN {
            return Err(TableNameError::TooLong(name));
        }
        if !name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '$')
        {
            return Err(TableNameError::InvalidCharacters(name));
        }

        Ok(Self(name))
    }

    /// Get the raw table name.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Get the name wrapped in backticks for use in SQL text.
    pub fn quoted(&self) -> String {
        format!("`{}`", self.0)
    }
}

impl std::fmt::Display for TableName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl AsRef<str> for TableName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Errors that can occur when validating a table name.
#[derive(Debug, thiserror::Error)]
pub enum TableNameError {
    /// Table name is empty
    #[error("Table name cannot be empty")]
    Empty,

    /// Table name exceeds the MySQL identifier limit
    #[error("Table name exceeds {MAX_TABLE_NAME_LEN} characters: {0}")]
    TooLong(String),

    /// Table name contains characters outside [a-zA-Z0-9_$]
    #[error("Table name contains invalid characters: {0}")]
    InvalidCharacters(String),
}

#[derive(Debug, Clone, Serialize)]
pub struct ColumnMetadata {
    pub name: String,
    /// Database-specific type (e.g., "int", "varchar", "datetime")
    pub type_name: String,
    pub nullable: bool,
}

impl ColumnMetadata {
    /// Create new column metadata.
    pub fn new(name: impl Into<String>, type_name: impl Into<String>, nullable: bool) -> Self {
        Self {
            name: name.into(),
            type_name: type_name.into(),
            nullable,
        }
    }
}

/// A fully materialized table: column metadata plus every row, in the
/// order the server returned them.
///
/// Rows are positional: `rows[i][j]` is the value of column `columns[j]`
/// in row `i`. Keeping values positional (rather than keyed by column
/// name) preserves column order and tolerates duplicate column names.
#[derive(Debug, Clone, Serialize)]
pub struct TableData {
    pub name: TableName,
    pub columns: Vec<ColumnMetadata>,
    pub rows: Vec<Vec<JsonValue>>,
}

impl TableData {
    /// Create table data from columns and rows.
    pub fn new(name: TableName, columns: Vec<ColumnMetadata>, rows: Vec<Vec<JsonValue>>) -> Self {
        Self {
            name,
            columns,
            rows,
        }
    }

    /// Get the number of data rows (excluding the header).
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Get the number of columns.
    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    /// Check if the table has no data rows.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Get the column names in order, for use as a header row.
    pub fn header(&self) -> Vec<&str> {
        self.columns.iter().map(|c| c.name.as_str()).collect()
    }
}

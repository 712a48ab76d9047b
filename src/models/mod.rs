//! Data models for the export tool.
//!
//! This module re-exports all model types used throughout the application.

pub mod report;
pub mod table;

// Re-export commonly used types
pub use report::{ExportReport, SheetReport};
pub use table::{ColumnMetadata, TableData, TableName, TableNameError};

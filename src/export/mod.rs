//! Workbook generation and export orchestration.

pub mod exporter;
pub mod workbook;

pub use exporter::Exporter;
pub use workbook::WorkbookBuilder;

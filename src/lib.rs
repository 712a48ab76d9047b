//! VitaTrack Export Library
//!
//! This library reads a configured list of MySQL tables in full and
//! writes them to a multi-sheet Excel workbook, one sheet per table.

pub mod config;
pub mod db;
pub mod error;
pub mod export;
pub mod models;

pub use config::Config;
pub use error::{ExportError, ExportResult};
pub use export::Exporter;

//! Database access layer.
//!
//! This module provides the MySQL connection pool, full-table reads,
//! and value decoding.

pub mod pool;
pub mod reader;
pub mod types;

pub use pool::Database;
pub use reader::TableReader;

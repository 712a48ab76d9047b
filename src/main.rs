//! VitaTrack Export - Main entry point.
//!
//! Connects to a MySQL database, reads the configured tables in full,
//! and writes them to a multi-sheet XLSX workbook.

use clap::Parser;
use tracing::{error, info};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};
use vitatrack_export::config::Config;
use vitatrack_export::db::Database;
use vitatrack_export::error::ExportError;
use vitatrack_export::export::Exporter;

/// Initialize the tracing subscriber for logging.
fn init_tracing(config: &Config) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log_level));

    let subscriber = tracing_subscriber::registry().with(filter);

    if config.json_logs {
        subscriber.with(fmt::layer().json()).init();
    } else {
        subscriber
            .with(fmt::layer().with_target(true).with_thread_ids(false))
            .init();
    }
}

fn log_failure(e: &ExportError, context: &str) {
    match e.suggestion() {
        Some(suggestion) => error!(error = %e, suggestion = %suggestion, "{}", context),
        None => error!(error = %e, "{}", context),
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Parse configuration from command line and environment
    let config = Config::parse();

    // Initialize logging
    init_tracing(&config);

    if let Err(e) = config.validate() {
        log_failure(&e, "Invalid configuration");
        return Err(e.into());
    }

    info!(
        database = %config.database_name().unwrap_or_default(),
        tables = config.tables.len(),
        output = %config.output.display(),
        "Starting export v{}",
        env!("CARGO_PKG_VERSION")
    );

    let db = match Database::connect(&config).await {
        Ok(db) => db,
        Err(e) => {
            log_failure(&e, "Failed to connect to database");
            return Err(e.into());
        }
    };

    let exporter = Exporter::new(config);
    let result = exporter.run(&db).await;

    // The pool closes on every exit path, success or failure
    db.close().await;

    if let Err(e) = result {
        log_failure(&e, "Export failed");
        return Err(e.into());
    }

    Ok(())
}

//! Environment-driven defaults for the CLI.

use std::path::{Path, PathBuf};

use tracing::info;

use crate::error::Result;
use crate::remap::RemapTable;

/// Remap file used when no `--remap` flag is given.
pub const REMAP_PATH_ENV: &str = "BIKE_TRIPS_REMAP_PATH";

/// Where the JSON log file is written.
pub const LOG_FILE_PATH_ENV: &str = "LOG_FILE_PATH";

pub const DEFAULT_LOG_FILE_PATH: &str = "logs/bike_trips.log";

/// Picks the remap file: the explicit path first, then `BIKE_TRIPS_REMAP_PATH`.
pub fn remap_path(explicit: Option<&Path>) -> Option<PathBuf> {
    explicit.map(Path::to_path_buf).or_else(|| {
        std::env::var_os(REMAP_PATH_ENV)
            .filter(|v| !v.is_empty())
            .map(PathBuf::from)
    })
}

/// Loads the configured remap table, falling back to the built-in one.
pub fn load_remap(explicit: Option<&Path>) -> Result<RemapTable> {
    match remap_path(explicit) {
        Some(path) => {
            let table = RemapTable::load(&path)?;
            info!(path = %path.display(), entries = table.len(), "Using remap config");
            Ok(table)
        }
        None => {
            let table = RemapTable::default();
            info!(entries = table.len(), "Using built-in remap table");
            Ok(table)
        }
    }
}

pub fn log_file_path() -> PathBuf {
    std::env::var_os(LOG_FILE_PATH_ENV)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_LOG_FILE_PATH))
}

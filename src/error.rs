//! Error types surfaced by the trip pipeline.

use std::path::PathBuf;

use thiserror::Error;

use crate::types::StationId;

/// Result alias used across the library.
pub type Result<T, E = PipelineError> = std::result::Result<T, E>;

#[derive(Error, Debug)]
pub enum PipelineError {
    /// A timestamp matched none of the accepted formats.
    #[error("row {row}: cannot parse {column} value {value:?} as a timestamp")]
    Parse {
        row: usize,
        column: &'static str,
        value: String,
    },

    #[error("failed to decode CSV: {0}")]
    Csv(#[from] csv::Error),

    #[error("failed to write {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to serialize JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// The remap table maps an old id onto another old id.
    #[error("remap table is chained: {from} -> {to}, but {to} is itself remapped")]
    ChainedRemap { from: StationId, to: StationId },

    #[error("invalid remap config {path}: {reason}")]
    RemapConfig { path: PathBuf, reason: String },

    #[error("station id {id} appears more than once in the station table")]
    DuplicateStation { id: StationId },
}

impl PipelineError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        PipelineError::Io {
            path: path.into(),
            source,
        }
    }
}

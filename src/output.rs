//! Output formatting and persistence for enriched trips.
//!
//! Supports pretty-printing to stdout and writing the JSON export file,
//! optionally gzip-compressed.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use flate2::Compression;
use flate2::write::GzEncoder;
use serde::Serialize;
use tracing::{debug, info};

use crate::error::{PipelineError, Result};
use crate::types::EnrichedTrip;

/// One element of the exported JSON array.
///
/// Field order is the serialization order and stays fixed so exports diff
/// cleanly.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExportRecord<'a> {
    #[serde(rename = "Year-Month")]
    pub year_month: &'a str,
    pub start_station_name: Option<&'a str>,
    pub end_station_name: Option<&'a str>,
    #[serde(rename = "Start Hour")]
    pub start_hour: u32,
    #[serde(rename = "End Hour")]
    pub end_hour: u32,
}

impl<'a> From<&'a EnrichedTrip> for ExportRecord<'a> {
    fn from(trip: &'a EnrichedTrip) -> Self {
        Self {
            year_month: &trip.year_month,
            start_station_name: trip.start_station_name.as_deref(),
            end_station_name: trip.end_station_name.as_deref(),
            start_hour: trip.start_hour(),
            end_hour: trip.end_hour(),
        }
    }
}

/// Writes any serializable value as pretty JSON to stdout.
pub fn print_json(value: &impl Serialize) -> Result<()> {
    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    serde_json::to_writer_pretty(&mut out, value)
        .map_err(|e| export_error(Path::new("<stdout>"), e.into()))?;
    writeln!(out).map_err(|e| PipelineError::io("<stdout>", e))?;
    Ok(())
}

/// Serializes `trips` as a JSON array into `writer`, two-space indented.
pub fn write_records<W: Write>(writer: W, trips: &[EnrichedTrip]) -> Result<()> {
    let records: Vec<ExportRecord<'_>> = trips.iter().map(ExportRecord::from).collect();
    serde_json::to_writer_pretty(writer, &records)?;
    Ok(())
}

/// Writes the export file at `path`.
///
/// The document is gzip-compressed when `gzip` is set or the path ends in
/// `.gz`. Write failures are returned as [`PipelineError::Io`]; nothing is
/// retried.
#[tracing::instrument(skip_all, fields(path = %path.as_ref().display(), trips = trips.len()))]
pub fn write_export(path: impl AsRef<Path>, trips: &[EnrichedTrip], gzip: bool) -> Result<()> {
    let path = path.as_ref();
    let gzip = gzip || path.extension().and_then(|e| e.to_str()) == Some("gz");
    debug!(gzip, "Writing export");

    let file = File::create(path).map_err(|e| PipelineError::io(path, e))?;
    write_document(path, BufWriter::new(file), trips, gzip)?;

    info!(records = trips.len(), gzip, "Export written");
    Ok(())
}

/// Writes the export document into `writer`, attributing every write
/// failure to `path`.
fn write_document<W: Write>(
    path: &Path,
    mut writer: W,
    trips: &[EnrichedTrip],
    gzip: bool,
) -> Result<()> {
    if gzip {
        let mut encoder = GzEncoder::new(&mut writer, Compression::default());
        write_records(&mut encoder, trips).map_err(|e| export_error(path, e))?;
        encoder.finish().map_err(|e| PipelineError::io(path, e))?;
    } else {
        write_records(&mut writer, trips).map_err(|e| export_error(path, e))?;
    }
    writer.flush().map_err(|e| PipelineError::io(path, e))
}

/// serde_json reports writer failures as its own error; surface them as I/O.
fn export_error(path: &Path, err: PipelineError) -> PipelineError {
    match err {
        PipelineError::Json(e) if e.is_io() => PipelineError::io(path, e.into()),
        other => other,
    }
}

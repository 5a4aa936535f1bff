//! Trip cleaning: timestamp parsing, hour derivation and station remapping.
//!
//! Each stage takes its input by reference and returns a fresh collection, so
//! stages can be run and tested independently:
//!
//! ```text
//! RawTrip --parse_trips--> Trip --apply_remap--> Trip (+ RemapReport)
//! ```

use chrono::{DateTime, Datelike, NaiveDate, NaiveDateTime};
use serde::Serialize;
use tracing::info;

use crate::error::{PipelineError, Result};
use crate::remap::RemapTable;
use crate::types::{RawTrip, StationId, Trip};

/// Accepted timestamp layouts, tried in order.
static TIMESTAMP_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%m/%d/%Y %H:%M:%S",
    "%m/%d/%Y %H:%M",
];

/// Date-only layouts; the time is midnight.
static DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%m/%d/%Y"];

/// US layouts with a two-digit year (`2/1/15 7:58`), read as 20xx/19xx.
static SHORT_YEAR_TIMESTAMP_FORMATS: &[&str] = &["%m/%d/%y %H:%M:%S", "%m/%d/%y %H:%M"];

static SHORT_YEAR_DATE_FORMATS: &[&str] = &["%m/%d/%y"];

/// `%Y` takes any number of digits, so `0015` would otherwise parse as year 15.
const MIN_YEAR: i32 = 1000;

/// Parses a timestamp in any of the accepted layouts.
///
/// A bare date means midnight. RFC 3339 values with an offset keep their
/// wall-clock time; the offset is dropped. Years before 1000 are rejected.
pub fn parse_timestamp(value: &str) -> Option<NaiveDateTime> {
    let value = value.trim();
    let (timestamp_formats, date_formats) = if has_short_year(value) {
        (SHORT_YEAR_TIMESTAMP_FORMATS, SHORT_YEAR_DATE_FORMATS)
    } else {
        (TIMESTAMP_FORMATS, DATE_FORMATS)
    };

    timestamp_formats
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(value, fmt).ok())
        .or_else(|| {
            date_formats
                .iter()
                .find_map(|fmt| NaiveDate::parse_from_str(value, fmt).ok())
                .and_then(|date| date.and_hms_opt(0, 0, 0))
        })
        .or_else(|| {
            DateTime::parse_from_rfc3339(value)
                .ok()
                .map(|dt| dt.naive_local())
        })
        .filter(|dt| dt.year() >= MIN_YEAR)
}

/// True when the date part is slash-separated and ends in a two-digit year.
fn has_short_year(value: &str) -> bool {
    value
        .split_whitespace()
        .next()
        .filter(|date| date.contains('/'))
        .and_then(|date| date.rsplit('/').next())
        .is_some_and(|year| year.len() == 2 && year.bytes().all(|b| b.is_ascii_digit()))
}

/// Parses both timestamps of every raw trip and derives the hour fields.
///
/// # Errors
///
/// Fails on the first unparseable timestamp with [`PipelineError::Parse`],
/// naming the 1-based data row and the column.
pub fn parse_trips(raw: &[RawTrip]) -> Result<Vec<Trip>> {
    raw.iter()
        .enumerate()
        .map(|(idx, r)| {
            let row = idx + 1;
            let start = parse_column(row, "Start Date", &r.start_date)?;
            let end = parse_column(row, "End Date", &r.end_date)?;
            Ok(Trip::new(start, end, r.start_station, r.end_station))
        })
        .collect()
}

fn parse_column(row: usize, column: &'static str, value: &str) -> Result<NaiveDateTime> {
    parse_timestamp(value).ok_or_else(|| PipelineError::Parse {
        row,
        column,
        value: value.to_string(),
    })
}

/// Which station column of a trip a remap count refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum StationColumn {
    #[serde(rename = "Start Station")]
    Start,
    #[serde(rename = "End Station")]
    End,
}

impl std::fmt::Display for StationColumn {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StationColumn::Start => f.write_str("Start Station"),
            StationColumn::End => f.write_str("End Station"),
        }
    }
}

/// Number of records rewritten for one remap entry in one column.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RemapCount {
    pub column: StationColumn,
    pub from: StationId,
    pub to: StationId,
    pub count: usize,
}

/// Diagnostic counts produced by [`apply_remap`].
///
/// Holds one entry per table entry and column, including zero counts.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RemapReport {
    pub counts: Vec<RemapCount>,
}

impl RemapReport {
    /// Count of records in `column` that were rewritten away from `from`.
    pub fn count(&self, column: StationColumn, from: StationId) -> usize {
        self.counts
            .iter()
            .find(|c| c.column == column && c.from == from)
            .map(|c| c.count)
            .unwrap_or(0)
    }

    pub fn total(&self) -> usize {
        self.counts.iter().map(|c| c.count).sum()
    }

    /// Emits one log line per entry.
    pub fn log(&self) {
        for c in &self.counts {
            info!(
                column = %c.column,
                from = c.from,
                to = c.to,
                modified = c.count,
                "Remapped station ids"
            );
        }
    }
}

/// Rewrites deprecated start and end station ids.
///
/// Hours are carried over untouched. Because the table has no chains,
/// running this on its own output changes nothing.
pub fn apply_remap(trips: &[Trip], table: &RemapTable) -> (Vec<Trip>, RemapReport) {
    let mut counts = Vec::with_capacity(table.len() * 2);
    for column in [StationColumn::Start, StationColumn::End] {
        for (from, to) in table.iter() {
            let count = trips
                .iter()
                .filter(|t| station_id(t, column) == from && from != to)
                .count();
            counts.push(RemapCount {
                column,
                from,
                to,
                count,
            });
        }
    }

    let remapped = trips
        .iter()
        .map(|t| Trip {
            start_station_id: table.resolve(t.start_station_id),
            end_station_id: table.resolve(t.end_station_id),
            ..t.clone()
        })
        .collect();

    (remapped, RemapReport { counts })
}

fn station_id(trip: &Trip, column: StationColumn) -> StationId {
    match column {
        StationColumn::Start => trip.start_station_id,
        StationColumn::End => trip.end_station_id,
    }
}

/// Output of [`clean_trips`].
#[derive(Debug, Clone)]
pub struct CleanedTrips {
    pub trips: Vec<Trip>,
    pub report: RemapReport,
}

/// Parses then remaps raw trips, logging the remap diagnostics.
#[tracing::instrument(skip_all, fields(rows = raw.len(), remap_entries = table.len()))]
pub fn clean_trips(raw: &[RawTrip], table: &RemapTable) -> Result<CleanedTrips> {
    let parsed = parse_trips(raw)?;
    let (trips, report) = apply_remap(&parsed, table);
    report.log();
    info!(
        trips = trips.len(),
        remapped = report.total(),
        "Trips cleaned"
    );
    Ok(CleanedTrips { trips, report })
}

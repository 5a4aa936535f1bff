//! Record types flowing through the cleaning pipeline.

use chrono::{Datelike, NaiveDateTime, Timelike};
use serde::Deserialize;

/// Numeric station identifier as it appears in both input files.
pub type StationId = u32;

/// A single row of the trip file, before any cleaning.
///
/// Only the four columns the pipeline needs are decoded; everything else in
/// the file (trip id, duration, bike number, subscriber type, ...) is ignored.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RawTrip {
    #[serde(rename = "Start Date")]
    pub start_date: String,
    #[serde(rename = "End Date")]
    pub end_date: String,
    #[serde(rename = "Start Station")]
    pub start_station: StationId,
    #[serde(rename = "End Station")]
    pub end_station: StationId,
}

/// A row of the station file.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Station {
    #[serde(rename = "Id")]
    pub id: StationId,
    #[serde(rename = "Name")]
    pub name: String,
}

/// A trip with parsed timestamps and hour-of-day fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Trip {
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
    pub start_station_id: StationId,
    pub end_station_id: StationId,
    pub start_hour: u32,
    pub end_hour: u32,
}

impl Trip {
    /// Builds a trip, deriving both hour fields from the timestamps.
    pub fn new(
        start: NaiveDateTime,
        end: NaiveDateTime,
        start_station_id: StationId,
        end_station_id: StationId,
    ) -> Self {
        Self {
            start,
            end,
            start_station_id,
            end_station_id,
            start_hour: start.hour(),
            end_hour: end.hour(),
        }
    }

    /// Calendar month of the start timestamp, formatted `YYYY-MM`.
    pub fn year_month(&self) -> String {
        format!("{:04}-{:02}", self.start.year(), self.start.month())
    }
}

/// A trip joined with station names.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnrichedTrip {
    pub trip: Trip,
    pub start_station_name: Option<String>,
    pub end_station_name: Option<String>,
    pub year_month: String,
}

impl EnrichedTrip {
    pub fn start_hour(&self) -> u32 {
        self.trip.start_hour
    }

    pub fn end_hour(&self) -> u32 {
        self.trip.end_hour
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn at(y: i32, m: u32, d: u32, h: u32, min: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(h, min, 0)
            .unwrap()
    }

    #[test]
    fn test_trip_new_derives_hours() {
        let trip = Trip::new(at(2025, 2, 5, 14, 32), at(2025, 2, 5, 15, 1), 1, 2);
        assert_eq!(trip.start_hour, 14);
        assert_eq!(trip.end_hour, 15);
    }

    #[test]
    fn test_year_month_is_zero_padded() {
        let trip = Trip::new(at(2013, 8, 29, 9, 0), at(2013, 8, 29, 9, 5), 1, 1);
        assert_eq!(trip.year_month(), "2013-08");
    }

    #[test]
    fn test_year_month_uses_start_timestamp() {
        let trip = Trip::new(at(2025, 1, 31, 23, 50), at(2025, 2, 1, 0, 10), 1, 1);
        assert_eq!(trip.year_month(), "2025-01");
        assert_eq!(trip.end_hour, 0);
    }
}

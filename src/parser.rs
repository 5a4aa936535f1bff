//! CSV decoding for the trip and station files.

use csv::{ReaderBuilder, Trim};

use crate::error::Result;
use crate::types::{RawTrip, Station};

/// Decodes trip rows from CSV bytes with a header line.
///
/// # Errors
///
/// Returns an error if a required column is missing or a station id is not
/// an unsigned integer. The error carries the csv position of the bad record.
pub fn parse_trips(bytes: &[u8]) -> Result<Vec<RawTrip>> {
    decode(bytes)
}

/// Decodes station rows from CSV bytes with a header line.
pub fn parse_stations(bytes: &[u8]) -> Result<Vec<Station>> {
    decode(bytes)
}

fn decode<T: serde::de::DeserializeOwned>(bytes: &[u8]) -> Result<Vec<T>> {
    let mut rdr = ReaderBuilder::new().trim(Trim::All).from_reader(bytes);

    let mut rows = Vec::new();
    for result in rdr.deserialize() {
        let record: T = result?;
        rows.push(record);
    }

    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::PipelineError;

    #[test]
    fn test_parse_trips_ignores_extra_columns() {
        let csv = "Trip ID,Start Date,Start Station,End Date,End Station,Bike #\n\
                   913460,8/31/2015 23:26,50,8/31/2015 23:39,70,288\n";
        let trips = parse_trips(csv.as_bytes()).unwrap();

        assert_eq!(trips.len(), 1);
        assert_eq!(trips[0].start_date, "8/31/2015 23:26");
        assert_eq!(trips[0].start_station, 50);
        assert_eq!(trips[0].end_station, 70);
    }

    #[test]
    fn test_parse_trips_empty_body() {
        let csv = "Start Date,End Date,Start Station,End Station\n";
        assert!(parse_trips(csv.as_bytes()).unwrap().is_empty());
    }

    #[test]
    fn test_parse_trips_rejects_non_numeric_station() {
        let csv = "Start Date,End Date,Start Station,End Station\n\
                   2025-02-05 14:32:00,2025-02-05 14:50:00,north,2\n";
        let err = parse_trips(csv.as_bytes()).unwrap_err();
        assert!(matches!(err, PipelineError::Csv(_)));
    }

    #[test]
    fn test_parse_trips_missing_column() {
        let csv = "Start Date,End Date,Start Station\n2025-02-05 14:32:00,2025-02-05 14:50:00,1\n";
        assert!(parse_trips(csv.as_bytes()).is_err());
    }

    #[test]
    fn test_parse_stations() {
        let csv = "Id,Name,Lat,Long,Dock Count,City,Installation Date\n\
                   2,San Jose Diridon Caltrain Station,37.329732,-121.901782,27,San Jose,8/6/2013\n\
                   3, San Jose Civic Center ,37.330698,-121.888979,15,San Jose,8/5/2013\n";
        let stations = parse_stations(csv.as_bytes()).unwrap();

        assert_eq!(stations.len(), 2);
        assert_eq!(stations[0].id, 2);
        assert_eq!(stations[1].name, "San Jose Civic Center");
    }
}

//! Station name lookup.

use std::collections::HashMap;

use tracing::{debug, info};

use crate::error::{PipelineError, Result};
use crate::types::{EnrichedTrip, Station, StationId, Trip};

/// Station table indexed by id, remembering the order of the station file.
#[derive(Debug, Clone, Default)]
pub struct StationDirectory {
    stations: Vec<Station>,
    by_id: HashMap<StationId, usize>,
}

impl StationDirectory {
    /// Indexes `stations`, rejecting duplicate ids.
    pub fn new(stations: Vec<Station>) -> Result<Self> {
        let mut by_id = HashMap::with_capacity(stations.len());
        for (pos, station) in stations.iter().enumerate() {
            if by_id.insert(station.id, pos).is_some() {
                return Err(PipelineError::DuplicateStation { id: station.id });
            }
        }
        debug!(stations = stations.len(), "Station directory built");
        Ok(Self { stations, by_id })
    }

    /// Name for `id`. Blank names count as missing.
    pub fn name(&self, id: StationId) -> Option<&str> {
        self.by_id
            .get(&id)
            .map(|&pos| self.stations[pos].name.as_str())
            .filter(|name| !name.is_empty())
    }

    /// Position of the first station carrying `name` in the station file.
    pub fn rank(&self, name: &str) -> Option<usize> {
        self.stations.iter().position(|s| s.name == name)
    }

    /// Distinct non-blank names in station file order.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = Vec::with_capacity(self.stations.len());
        for station in &self.stations {
            let name = station.name.as_str();
            if !name.is_empty() && !names.contains(&name) {
                names.push(name);
            }
        }
        names
    }

    pub fn len(&self) -> usize {
        self.stations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stations.is_empty()
    }
}

/// Attaches station names and the year-month bucket to every trip.
///
/// Left-outer: a trip whose station id is unknown keeps a `None` name and is
/// never dropped, so the output always has one record per input trip.
#[tracing::instrument(skip_all, fields(trips = trips.len(), stations = directory.len()))]
pub fn join_stations(trips: &[Trip], directory: &StationDirectory) -> Vec<EnrichedTrip> {
    let enriched: Vec<EnrichedTrip> = trips
        .iter()
        .map(|trip| EnrichedTrip {
            start_station_name: directory.name(trip.start_station_id).map(str::to_string),
            end_station_name: directory.name(trip.end_station_id).map(str::to_string),
            year_month: trip.year_month(),
            trip: trip.clone(),
        })
        .collect();

    let unmatched = enriched
        .iter()
        .filter(|t| t.start_station_name.is_none() || t.end_station_name.is_none())
        .count();
    info!(trips = enriched.len(), unmatched, "Station names joined");

    enriched
}

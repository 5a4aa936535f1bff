//! Read-only dataset handle and the view model behind the trip dashboard.
//!
//! [`Dataset::build`] runs parse, clean and join exactly once at startup and
//! hands back an `Arc<Dataset>` that every dashboard interaction reads from.
//! Each call to [`Dataset::view`] filters and aggregates from scratch; nothing
//! is cached between selections. Rendering the view is left to the caller.

use std::collections::BTreeSet;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::analyzers::aggregate::{aggregate, densify_hours};
use crate::analyzers::filter::{ALL, TripFilter};
use crate::analyzers::types::{AggregateBucket, Dimension};
use crate::cleaner::{RemapReport, clean_trips};
use crate::error::Result;
use crate::join::{StationDirectory, join_stations};
use crate::parser;
use crate::remap::RemapTable;
use crate::types::{EnrichedTrip, RawTrip, Station};

#[derive(Debug)]
pub struct Dataset {
    trips: Vec<EnrichedTrip>,
    directory: StationDirectory,
    remap_report: RemapReport,
}

impl Dataset {
    /// Cleans and joins the raw inputs into a shared, immutable dataset.
    #[tracing::instrument(skip_all, fields(trips = raw_trips.len(), stations = stations.len()))]
    pub fn build(
        raw_trips: &[RawTrip],
        stations: Vec<Station>,
        remap: &RemapTable,
    ) -> Result<Arc<Self>> {
        let directory = StationDirectory::new(stations)?;
        let cleaned = clean_trips(raw_trips, remap)?;
        let trips = join_stations(&cleaned.trips, &directory);

        info!(trips = trips.len(), stations = directory.len(), "Dataset ready");

        Ok(Arc::new(Self {
            trips,
            directory,
            remap_report: cleaned.report,
        }))
    }

    /// Decodes both CSV inputs and builds the dataset.
    pub fn from_csv(trips_csv: &[u8], stations_csv: &[u8], remap: &RemapTable) -> Result<Arc<Self>> {
        let raw_trips = parser::parse_trips(trips_csv)?;
        let stations = parser::parse_stations(stations_csv)?;
        Self::build(&raw_trips, stations, remap)
    }

    pub fn trips(&self) -> &[EnrichedTrip] {
        &self.trips
    }

    pub fn directory(&self) -> &StationDirectory {
        &self.directory
    }

    pub fn remap_report(&self) -> &RemapReport {
        &self.remap_report
    }

    /// Dropdown choices, each list led by `"All"`.
    pub fn options(&self) -> FilterOptions {
        let months: BTreeSet<&str> = self.trips.iter().map(|t| t.year_month.as_str()).collect();
        let stations = self.directory.names();

        FilterOptions {
            year_months: with_all(months.into_iter()),
            stations: with_all(stations.into_iter()),
        }
    }

    /// Filters by `selection` and computes all four aggregates.
    pub fn view(&self, selection: &Selection) -> DashboardView {
        let filter = selection.filter();
        let matched: Vec<&EnrichedTrip> = filter.apply(&self.trips).collect();

        let by = |dimension: Dimension| aggregate(matched.iter().copied(), dimension, &self.directory);

        DashboardView {
            matched_trips: matched.len(),
            start_stations: by(Dimension::StartStation),
            end_stations: by(Dimension::EndStation),
            start_hours: by(Dimension::StartHour),
            end_hours: by(Dimension::EndHour),
        }
    }
}

fn with_all<'a>(values: impl Iterator<Item = &'a str>) -> Vec<String> {
    std::iter::once(ALL.to_string())
        .chain(values.map(str::to_string))
        .collect()
}

/// The three dashboard inputs. Each is a concrete value or `"All"`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Selection {
    pub year_month: String,
    pub start_station: String,
    pub end_station: String,
}

impl Default for Selection {
    fn default() -> Self {
        Self {
            year_month: ALL.to_string(),
            start_station: ALL.to_string(),
            end_station: ALL.to_string(),
        }
    }
}

impl Selection {
    pub fn filter(&self) -> TripFilter {
        TripFilter::from_selection(&self.year_month, &self.start_station, &self.end_station)
    }
}

/// Choices offered by the three dropdowns.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FilterOptions {
    pub year_months: Vec<String>,
    pub stations: Vec<String>,
}

/// The four charts for one selection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DashboardView {
    pub matched_trips: usize,
    pub start_stations: Vec<AggregateBucket>,
    pub end_stations: Vec<AggregateBucket>,
    pub start_hours: Vec<AggregateBucket>,
    pub end_hours: Vec<AggregateBucket>,
}

impl DashboardView {
    /// Replaces both hour series with dense 0–23 series.
    pub fn with_dense_hours(self) -> Self {
        Self {
            start_hours: densify_hours(&self.start_hours),
            end_hours: densify_hours(&self.end_hours),
            ..self
        }
    }

    pub fn is_empty(&self) -> bool {
        self.matched_trips == 0
    }
}

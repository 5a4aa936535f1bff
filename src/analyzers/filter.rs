use serde::{Deserialize, Serialize};

use crate::types::EnrichedTrip;

/// Placeholder the dashboard dropdowns use for "no filter".
pub const ALL: &str = "All";

/// Three independent optional predicates, ANDed together.
///
/// `None` matches every trip.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TripFilter {
    pub year_month: Option<String>,
    pub start_station: Option<String>,
    pub end_station: Option<String>,
}

impl TripFilter {
    /// Builds a filter from dropdown values, treating `"All"` as unset.
    pub fn from_selection(year_month: &str, start_station: &str, end_station: &str) -> Self {
        Self {
            year_month: selected(year_month),
            start_station: selected(start_station),
            end_station: selected(end_station),
        }
    }

    pub fn matches(&self, trip: &EnrichedTrip) -> bool {
        equals(&self.year_month, Some(trip.year_month.as_str()))
            && equals(&self.start_station, trip.start_station_name.as_deref())
            && equals(&self.end_station, trip.end_station_name.as_deref())
    }

    pub fn apply<'a>(&'a self, trips: &'a [EnrichedTrip]) -> impl Iterator<Item = &'a EnrichedTrip> + 'a {
        trips.iter().filter(move |t| self.matches(t))
    }
}

fn selected(value: &str) -> Option<String> {
    if value == ALL {
        None
    } else {
        Some(value.to_string())
    }
}

fn equals(wanted: &Option<String>, actual: Option<&str>) -> bool {
    match wanted {
        None => true,
        Some(wanted) => actual == Some(wanted.as_str()),
    }
}

//! Data types used by the aggregation pipeline.

use serde::Serialize;

/// What to group trips by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Dimension {
    StartStation,
    EndStation,
    StartHour,
    EndHour,
}

impl Dimension {
    pub const ALL: [Dimension; 4] = [
        Dimension::StartStation,
        Dimension::EndStation,
        Dimension::StartHour,
        Dimension::EndHour,
    ];
}

/// Value a bucket is keyed on: a station name or an hour of day.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(untagged)]
pub enum BucketKey {
    Station(String),
    Hour(u32),
}

/// A single `(value, count)` pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AggregateBucket {
    pub value: BucketKey,
    pub count: usize,
}

impl AggregateBucket {
    pub fn station(name: impl Into<String>, count: usize) -> Self {
        Self {
            value: BucketKey::Station(name.into()),
            count,
        }
    }

    pub fn hour(hour: u32, count: usize) -> Self {
        Self {
            value: BucketKey::Hour(hour),
            count,
        }
    }
}

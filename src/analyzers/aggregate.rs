use std::cmp::Reverse;
use std::collections::{BTreeMap, HashMap};

use crate::analyzers::types::{AggregateBucket, BucketKey, Dimension};
use crate::join::StationDirectory;
use crate::types::EnrichedTrip;

/// Number of hours in the dense hour series.
const HOURS_PER_DAY: u32 = 24;

/// Groups `trips` by `dimension` and counts them.
///
/// Station buckets are ordered by count descending; ties keep the order of
/// the station file (names unknown to `directory` go last, alphabetically).
/// Trips without a station name are not counted.
///
/// Hour buckets are ordered by hour ascending. Hours without any trip are
/// omitted; see [`densify_hours`] for a full 0–23 series.
pub fn aggregate<'a, I>(
    trips: I,
    dimension: Dimension,
    directory: &StationDirectory,
) -> Vec<AggregateBucket>
where
    I: IntoIterator<Item = &'a EnrichedTrip>,
{
    match dimension {
        Dimension::StartStation => {
            count_stations(trips, directory, |t| t.start_station_name.as_deref())
        }
        Dimension::EndStation => count_stations(trips, directory, |t| t.end_station_name.as_deref()),
        Dimension::StartHour => count_hours(trips, EnrichedTrip::start_hour),
        Dimension::EndHour => count_hours(trips, EnrichedTrip::end_hour),
    }
}

fn count_stations<'a, I, F>(trips: I, directory: &StationDirectory, name: F) -> Vec<AggregateBucket>
where
    I: IntoIterator<Item = &'a EnrichedTrip>,
    F: Fn(&'a EnrichedTrip) -> Option<&'a str>,
{
    let mut counts: HashMap<&str, usize> = HashMap::new();
    for trip in trips {
        if let Some(n) = name(trip) {
            *counts.entry(n).or_default() += 1;
        }
    }

    let mut ranked: Vec<(&str, usize)> = counts.into_iter().collect();
    ranked.sort_by_key(|&(n, count)| {
        (
            Reverse(count),
            directory.rank(n).unwrap_or(usize::MAX),
            n,
        )
    });

    ranked
        .into_iter()
        .map(|(n, count)| AggregateBucket::station(n, count))
        .collect()
}

fn count_hours<'a, I, F>(trips: I, hour: F) -> Vec<AggregateBucket>
where
    I: IntoIterator<Item = &'a EnrichedTrip>,
    F: Fn(&'a EnrichedTrip) -> u32,
{
    let mut counts: BTreeMap<u32, usize> = BTreeMap::new();
    for trip in trips {
        *counts.entry(hour(trip)).or_default() += 1;
    }

    counts
        .into_iter()
        .map(|(h, count)| AggregateBucket::hour(h, count))
        .collect()
}

/// Expands a sparse hour series to all 24 hours, filling gaps with zero.
///
/// Station buckets in the input are ignored.
pub fn densify_hours(buckets: &[AggregateBucket]) -> Vec<AggregateBucket> {
    let counts: HashMap<u32, usize> = buckets
        .iter()
        .filter_map(|b| match b.value {
            BucketKey::Hour(h) => Some((h, b.count)),
            BucketKey::Station(_) => None,
        })
        .collect();

    (0..HOURS_PER_DAY)
        .map(|h| AggregateBucket::hour(h, counts.get(&h).copied().unwrap_or(0)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Station, Trip};
    use chrono::NaiveDate;

    fn directory() -> StationDirectory {
        StationDirectory::new(
            [(1, "A"), (2, "B"), (3, "C")]
                .into_iter()
                .map(|(id, name)| Station {
                    id,
                    name: name.to_string(),
                })
                .collect(),
        )
        .unwrap()
    }

    fn enriched(start: Option<&str>, end: Option<&str>, start_hour: u32, end_hour: u32) -> EnrichedTrip {
        let day = NaiveDate::from_ymd_opt(2025, 2, 5).unwrap();
        let trip = Trip::new(
            day.and_hms_opt(start_hour, 0, 0).unwrap(),
            day.and_hms_opt(end_hour, 30, 0).unwrap(),
            0,
            0,
        );
        EnrichedTrip {
            year_month: trip.year_month(),
            trip,
            start_station_name: start.map(str::to_string),
            end_station_name: end.map(str::to_string),
        }
    }

    #[test]
    fn test_station_counts_descending_with_file_order_ties() {
        let trips = vec![
            enriched(Some("C"), None, 8, 8),
            enriched(Some("A"), None, 8, 8),
            enriched(Some("B"), None, 8, 8),
            enriched(Some("A"), None, 8, 8),
            enriched(Some("A"), None, 8, 8),
        ];
        let out = aggregate(&trips, Dimension::StartStation, &directory());

        assert_eq!(
            out,
            vec![
                AggregateBucket::station("A", 3),
                AggregateBucket::station("B", 1),
                AggregateBucket::station("C", 1),
            ]
        );
    }

    #[test]
    fn test_station_counts_skip_missing_names() {
        let trips = vec![
            enriched(None, Some("B"), 8, 8),
            enriched(Some("A"), None, 8, 8),
        ];
        let out = aggregate(&trips, Dimension::EndStation, &directory());
        assert_eq!(out, vec![AggregateBucket::station("B", 1)]);
    }

    #[test]
    fn test_unknown_names_sort_after_known() {
        let trips = vec![
            enriched(Some("Zed"), None, 8, 8),
            enriched(Some("Abe"), None, 8, 8),
            enriched(Some("C"), None, 8, 8),
        ];
        let out = aggregate(&trips, Dimension::StartStation, &directory());
        let names: Vec<_> = out.iter().map(|b| b.value.clone()).collect();
        assert_eq!(
            names,
            vec![
                BucketKey::Station("C".into()),
                BucketKey::Station("Abe".into()),
                BucketKey::Station("Zed".into()),
            ]
        );
    }

    #[test]
    fn test_station_aggregate_is_deterministic() {
        let trips: Vec<_> = ["B", "C", "A", "C", "B", "A"]
            .iter()
            .map(|&n| enriched(Some(n), Some(n), 8, 8))
            .collect();
        let dir = directory();
        let first = aggregate(&trips, Dimension::StartStation, &dir);
        for _ in 0..10 {
            assert_eq!(aggregate(&trips, Dimension::StartStation, &dir), first);
        }
        assert_eq!(first[0], AggregateBucket::station("A", 2));
    }

    #[test]
    fn test_hour_counts_ascending_and_sparse() {
        let trips = vec![
            enriched(None, None, 17, 18),
            enriched(None, None, 8, 9),
            enriched(None, None, 17, 17),
        ];
        let dir = directory();

        assert_eq!(
            aggregate(&trips, Dimension::StartHour, &dir),
            vec![AggregateBucket::hour(8, 1), AggregateBucket::hour(17, 2)]
        );
        assert_eq!(
            aggregate(&trips, Dimension::EndHour, &dir),
            vec![
                AggregateBucket::hour(9, 1),
                AggregateBucket::hour(17, 1),
                AggregateBucket::hour(18, 1),
            ]
        );
    }

    #[test]
    fn test_empty_input_gives_empty_aggregate() {
        let dir = directory();
        let trips: Vec<EnrichedTrip> = Vec::new();
        for dimension in Dimension::ALL {
            assert!(aggregate(&trips, dimension, &dir).is_empty());
        }
    }

    #[test]
    fn test_densify_hours() {
        let dense = densify_hours(&[AggregateBucket::hour(3, 4), AggregateBucket::hour(22, 1)]);

        assert_eq!(dense.len(), 24);
        assert_eq!(dense[0], AggregateBucket::hour(0, 0));
        assert_eq!(dense[3], AggregateBucket::hour(3, 4));
        assert_eq!(dense[22], AggregateBucket::hour(22, 1));
        assert_eq!(dense.iter().map(|b| b.count).sum::<usize>(), 5);
    }

    #[test]
    fn test_densify_empty() {
        let dense = densify_hours(&[]);
        assert!(dense.iter().all(|b| b.count == 0));
        assert_eq!(dense.len(), 24);
    }
}

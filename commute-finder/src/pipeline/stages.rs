//! Pure stages of the station pipeline.
//!
//! Each stage takes a collection by value and returns a new one.

use std::collections::HashSet;

use chrono::Duration;
use tracing::debug;

use crate::domain::{Station, UicCode};
use crate::sources::StationRecord;

/// Build stations from dataset records.
///
/// Records without a usable UIC code cannot be identified and are dropped.
pub fn to_stations(records: Vec<StationRecord>) -> Vec<Station> {
    let total = records.len();

    let stations: Vec<Station> = records
        .into_iter()
        .filter_map(|record| {
            let uic = UicCode::parse(record.code_uic.as_deref()?).ok()?;
            let location = record.coordinate();
            let name = record.display_name().unwrap_or_default().to_string();
            let city = record.commune.unwrap_or_default();
            Some(Station::new(uic, name, city, location))
        })
        .collect();

    let dropped = total - stations.len();
    if dropped > 0 {
        debug!(dropped, "records without a valid UIC code");
    }

    stations
}

/// Keep the first station for each UIC code, preserving order.
pub fn dedup_by_uic(stations: Vec<Station>) -> Vec<Station> {
    let mut seen = HashSet::new();
    stations
        .into_iter()
        .filter(|s| seen.insert(s.uic.clone()))
        .collect()
}

/// Drop stations without a city name.
///
/// Only the empty string counts as missing; a blank name is kept.
pub fn with_city(stations: Vec<Station>) -> Vec<Station> {
    stations
        .into_iter()
        .filter(|s| !s.city.is_empty())
        .collect()
}

/// Stable sort by city name (byte order).
pub fn sort_by_city(mut stations: Vec<Station>) -> Vec<Station> {
    stations.sort_by(|a, b| a.city.cmp(&b.city));
    stations
}

/// Keep stations whose two commutes are both known and under `max`.
pub fn within_threshold(stations: Vec<Station>, max: Duration) -> Vec<Station> {
    stations
        .into_iter()
        .filter(|s| {
            matches!(
                (s.car_commute, s.transit_commute),
                (Some(car), Some(transit)) if car < max && transit < max
            )
        })
        .collect()
}

//! Plain-text report of the shortlisted stations.

use chrono::Duration;

use crate::domain::Station;

/// Label in front of the car commute.
const CAR_LABEL: &str = "\u{1F6BA}";

/// Label in front of the public transport commute.
const TRANSIT_LABEL: &str = "\u{1F6B9}";

/// Shown in place of a commute that could not be computed.
const UNKNOWN: &str = "Unknown";

/// Render the report: a count line, then one line per station.
///
/// ```
/// use commute_finder::report::render;
///
/// assert_eq!(render(&[]), "0 matching stations:\n");
/// ```
pub fn render(stations: &[Station]) -> String {
    let mut out = format!("{} matching stations:\n", stations.len());

    for station in stations {
        out.push_str(&format!(
            "- {}, {}, {}, {}, {}\n",
            station.city,
            station.name,
            station.uic,
            format_commute(station.car_commute, CAR_LABEL),
            format_commute(station.transit_commute, TRANSIT_LABEL),
        ));
    }

    out
}

/// `<label> <whole minutes> minutes`, or `Unknown`.
fn format_commute(duration: Option<Duration>, label: &str) -> String {
    match duration {
        Some(d) => format!("{label} {} minutes", d.num_minutes()),
        None => UNKNOWN.to_string(),
    }
}

//! Response DTOs for the open-data, directions and journey planner APIs.
//!
//! Only the fields the commute finder reads are modelled; unknown fields are
//! ignored. Nested fields are `Option` (or default to empty lists) because
//! the upstream services omit them rather than sending nulls, and a missing
//! link must read as "no answer" instead of failing the whole response.

use chrono::Duration;
use serde::{Deserialize, Deserializer};

use crate::domain::{Coordinate, LineClass};

/// Response of the open-data records search endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct RecordsResponse<F> {
    /// The returned page of records.
    #[serde(default = "Vec::new")]
    pub records: Vec<Record<F>>,

    /// Error message, sent instead of records for bad queries.
    pub error: Option<String>,
}

/// A single dataset record.
#[derive(Debug, Clone, Deserialize)]
pub struct Record<F> {
    pub fields: Option<F>,
}

/// Fields of the Transilien stations dataset.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct StationRecord {
    /// UIC code of the station.
    pub code_uic: Option<String>,

    /// Station name.
    pub nom_gare: Option<String>,

    /// Stop label, used when `nom_gare` is absent.
    pub libelle: Option<String>,

    /// City the station belongs to.
    pub commune: Option<String>,

    /// `[lat, lon]` in WGS84.
    pub coord_gps_wgs84: Option<Vec<Option<f64>>>,
}

impl StationRecord {
    /// Station position, when both coordinates are present.
    pub fn coordinate(&self) -> Option<Coordinate> {
        Coordinate::from_pair(self.coord_gps_wgs84.as_deref()?)
    }

    /// Best available display name.
    pub fn display_name(&self) -> Option<&str> {
        self.nom_gare.as_deref().or(self.libelle.as_deref())
    }
}

/// Fields of the lines-per-station dataset.
///
/// Each line family is a flag column holding `1` when the station is served.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct LineRecord {
    #[serde(default, deserialize_with = "flag")]
    pub train: bool,

    #[serde(default, deserialize_with = "flag")]
    pub rer: bool,
}

impl LineRecord {
    pub fn line_class(&self) -> LineClass {
        LineClass::new(self.train, self.rer)
    }
}

/// Accept `1`, `1.0`, `true` or `"1"` as set; anything else (including null) as unset.
fn flag<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(serde_json::Value::Bool(b)) => b,
        Some(serde_json::Value::Number(n)) => n.as_f64() == Some(1.0),
        Some(serde_json::Value::String(s)) => s.trim() == "1",
        _ => false,
    })
}

/// Response of the directions service.
#[derive(Debug, Clone, Deserialize)]
pub struct DirectionsResponse {
    /// `OK` on success, otherwise a reason such as `ZERO_RESULTS`.
    pub status: Option<String>,

    pub error_message: Option<String>,

    #[serde(default)]
    pub routes: Vec<Route>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Route {
    #[serde(default)]
    pub legs: Vec<RouteLeg>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RouteLeg {
    pub duration: Option<Quantity>,
}

/// A numeric quantity; the service also sends a text rendering we ignore.
#[derive(Debug, Clone, Deserialize)]
pub struct Quantity {
    pub value: Option<i64>,
}

impl DirectionsResponse {
    /// Duration of the first leg of the first route.
    pub fn first_leg_duration(&self) -> Option<Duration> {
        let leg = self.routes.first()?.legs.first()?;
        seconds_to_duration(leg.duration.as_ref()?.value?)
    }

    /// Whether the service reported success (absent status counts as success).
    pub fn is_ok(&self) -> bool {
        self.status.as_deref().is_none_or(|s| s == "OK")
    }
}

/// Response of the journey planner.
#[derive(Debug, Clone, Deserialize)]
pub struct JourneysResponse {
    #[serde(default)]
    pub journeys: Vec<Journey>,

    /// Present instead of journeys, e.g. `no_solution`.
    pub error: Option<PlannerError>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Journey {
    /// Total duration in seconds.
    pub duration: Option<i64>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PlannerError {
    pub id: Option<String>,
    pub message: Option<String>,
}

impl JourneysResponse {
    /// Total duration of the first proposed journey.
    pub fn first_journey_duration(&self) -> Option<Duration> {
        seconds_to_duration(self.journeys.first()?.duration?)
    }
}

/// Negative or unrepresentable durations read as absent.
fn seconds_to_duration(seconds: i64) -> Option<Duration> {
    if seconds < 0 {
        return None;
    }
    Duration::try_seconds(seconds)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn station_record_with_all_fields() {
        let json = r#"{
            "nhits": 1,
            "records": [{
                "datasetid": "sncf-gares-et-arrets-transilien-ile-de-france",
                "recordid": "abc",
                "fields": {
                    "code_uic": "87393009",
                    "nom_gare": "Versailles Chantiers",
                    "commune": "Versailles",
                    "coord_gps_wgs84": [48.795, 2.135],
                    "zone_navigo": 4.0
                }
            }]
        }"#;

        let response: RecordsResponse<StationRecord> = serde_json::from_str(json).unwrap();
        let fields = response.records[0].fields.as_ref().unwrap();
        assert_eq!(fields.code_uic.as_deref(), Some("87393009"));
        assert_eq!(fields.display_name(), Some("Versailles Chantiers"));
        assert_eq!(fields.coordinate(), Some(Coordinate::new(48.795, 2.135)));
    }

    #[test]
    fn station_record_tolerates_missing_fields() {
        let json = r#"{"records": [{"fields": {}}, {}]}"#;

        let response: RecordsResponse<StationRecord> = serde_json::from_str(json).unwrap();
        assert_eq!(response.records.len(), 2);
        assert_eq!(response.records[0].fields, Some(StationRecord::default()));
        assert!(response.records[1].fields.is_none());
        assert_eq!(StationRecord::default().coordinate(), None);
    }

    #[test]
    fn missing_records_is_empty() {
        let response: RecordsResponse<StationRecord> = serde_json::from_str("{}").unwrap();
        assert!(response.records.is_empty());
    }

    #[test]
    fn display_name_falls_back_to_label() {
        let record = StationRecord {
            libelle: Some("VERSAILLES CH.".into()),
            ..Default::default()
        };
        assert_eq!(record.display_name(), Some("VERSAILLES CH."));
    }

    #[test]
    fn coordinate_with_null_entry_is_absent() {
        let record: StationRecord =
            serde_json::from_str(r#"{"coord_gps_wgs84": [48.795, null]}"#).unwrap();
        assert_eq!(record.coordinate(), None);
    }

    #[test]
    fn line_flags_accept_several_encodings() {
        let record: LineRecord =
            serde_json::from_str(r#"{"code_uic": "87393009", "train": 1, "rer": 0}"#).unwrap();
        assert_eq!(record.line_class(), LineClass::new(true, false));

        let record: LineRecord = serde_json::from_str(r#"{"train": 1.0, "rer": "1"}"#).unwrap();
        assert_eq!(record.line_class(), LineClass::new(true, true));

        let record: LineRecord = serde_json::from_str(r#"{"train": true, "rer": null}"#).unwrap();
        assert_eq!(record.line_class(), LineClass::new(true, false));

        let record: LineRecord = serde_json::from_str("{}").unwrap();
        assert_eq!(record.line_class(), LineClass::default());
    }

    #[test]
    fn directions_first_leg_duration() {
        let json = r#"{
            "status": "OK",
            "routes": [
                {"legs": [{"duration": {"text": "41 mins", "value": 2460}}, {"duration": {"value": 1}}]},
                {"legs": [{"duration": {"value": 9999}}]}
            ]
        }"#;
        let response: DirectionsResponse = serde_json::from_str(json).unwrap();
        assert!(response.is_ok());
        assert_eq!(response.first_leg_duration(), Some(Duration::seconds(2460)));
    }

    #[test]
    fn directions_missing_links_are_absent() {
        for json in [
            r#"{"status": "ZERO_RESULTS", "routes": []}"#,
            r#"{"routes": [{}]}"#,
            r#"{"routes": [{"legs": [{}]}]}"#,
            r#"{"routes": [{"legs": [{"duration": {"text": "41 mins"}}]}]}"#,
        ] {
            let response: DirectionsResponse = serde_json::from_str(json).unwrap();
            assert_eq!(response.first_leg_duration(), None, "{json}");
        }
    }

    #[test]
    fn directions_status() {
        let response: DirectionsResponse =
            serde_json::from_str(r#"{"status": "REQUEST_DENIED", "error_message": "bad key"}"#)
                .unwrap();
        assert!(!response.is_ok());

        let response: DirectionsResponse = serde_json::from_str("{}").unwrap();
        assert!(response.is_ok());
    }

    #[test]
    fn journeys_first_duration() {
        let json = r#"{"journeys": [{"duration": 3000, "nb_transfers": 1}, {"duration": 10}]}"#;
        let response: JourneysResponse = serde_json::from_str(json).unwrap();
        assert_eq!(response.first_journey_duration(), Some(Duration::seconds(3000)));
    }

    #[test]
    fn journeys_missing_links_are_absent() {
        let response: JourneysResponse = serde_json::from_str(
            r#"{"error": {"id": "no_solution", "message": "no solution found"}}"#,
        )
        .unwrap();
        assert_eq!(response.first_journey_duration(), None);
        assert_eq!(
            response.error.unwrap().id.as_deref(),
            Some("no_solution")
        );

        let response: JourneysResponse = serde_json::from_str(r#"{"journeys": [{}]}"#).unwrap();
        assert_eq!(response.first_journey_duration(), None);
    }

    #[test]
    fn out_of_range_durations_are_absent() {
        let response: JourneysResponse =
            serde_json::from_str(r#"{"journeys": [{"duration": 9223372036854775807}]}"#).unwrap();
        assert_eq!(response.first_journey_duration(), None);

        let response: JourneysResponse =
            serde_json::from_str(r#"{"journeys": [{"duration": -60}]}"#).unwrap();
        assert_eq!(response.first_journey_duration(), None);

        let response: DirectionsResponse = serde_json::from_str(
            r#"{"routes": [{"legs": [{"duration": {"value": 9223372036854775807}}]}]}"#,
        )
        .unwrap();
        assert_eq!(response.first_leg_duration(), None);

        let response: DirectionsResponse =
            serde_json::from_str(r#"{"routes": [{"legs": [{"duration": {"value": -1}}]}]}"#)
                .unwrap();
        assert_eq!(response.first_leg_duration(), None);
    }

    #[test]
    fn wrong_top_level_shape_fails() {
        assert!(serde_json::from_str::<RecordsResponse<StationRecord>>("[]").is_err());
        assert!(serde_json::from_str::<JourneysResponse>("\"text\"").is_err());
        assert!(serde_json::from_str::<DirectionsResponse>("not json").is_err());
    }
}

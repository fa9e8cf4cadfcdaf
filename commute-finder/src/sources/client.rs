//! Typed client for the station, line and journey APIs.

use std::time::Duration as StdDuration;

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use chrono::{Duration, NaiveDate, NaiveDateTime};
use reqwest::header::{AUTHORIZATION, HeaderMap, HeaderValue};
use serde::de::DeserializeOwned;
use tracing::{debug, info, warn};

use crate::cache::ResponseCache;
use crate::domain::{CommuteMode, Coordinate, LineClass, UicCode};
use crate::fetch::{DEFAULT_TIMEOUT_SECS, FetchError, Fetcher, HttpTransport, Transport, redact};

use super::error::DatasetError;
use super::types::{
    DirectionsResponse, JourneysResponse, LineRecord, RecordsResponse, StationRecord,
};

/// Default base URL of the SNCF open-data records search.
const DEFAULT_OPENDATA_BASE_URL: &str = "https://data.sncf.com/api/records/1.0/search/";

/// Default base URL of the driving directions service.
const DEFAULT_DIRECTIONS_URL: &str = "https://maps.googleapis.com/maps/api/directions/json";

/// Default base URL of the journey planner (SNCF coverage).
const DEFAULT_JOURNEYS_URL: &str = "https://api.sncf.com/v1/coverage/sncf/journeys";

/// Dataset listing Transilien stations and stops.
const STATIONS_DATASET: &str = "sncf-gares-et-arrets-transilien-ile-de-france";

/// Dataset listing the lines serving each station.
const LINES_DATASET: &str = "sncf-lignes-par-gares-idf";

/// Enough rows to get the whole stations dataset in one page.
const DEFAULT_STATION_ROWS: u32 = 10_000;

/// Journeys are planned for this departure so answers stay comparable
/// (and cacheable) from one run to the next.
pub fn default_departure() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2019, 3, 19)
        .and_then(|d| d.and_hms_opt(9, 0, 0))
        .unwrap_or_default()
}

/// Configuration for the dataset client.
#[derive(Debug, Clone)]
pub struct DatasetClientConfig {
    /// Journey planner key, sent as the Basic auth user name.
    pub navitia_api_key: String,
    /// Directions service key, sent as the `key` query parameter.
    pub google_api_key: String,
    /// Base URL of the open-data records search.
    pub opendata_base_url: String,
    /// Base URL of the directions service.
    pub directions_base_url: String,
    /// Base URL of the journey planner.
    pub journeys_base_url: String,
    /// `rows` parameter of the stations query.
    pub station_rows: u32,
    /// Reference departure for transit journeys.
    pub departure: NaiveDateTime,
    /// Request timeout in seconds.
    pub timeout_secs: u64,
}

impl DatasetClientConfig {
    /// Create a new config with the given API keys.
    pub fn new(navitia_api_key: impl Into<String>, google_api_key: impl Into<String>) -> Self {
        Self {
            navitia_api_key: navitia_api_key.into(),
            google_api_key: google_api_key.into(),
            opendata_base_url: DEFAULT_OPENDATA_BASE_URL.to_string(),
            directions_base_url: DEFAULT_DIRECTIONS_URL.to_string(),
            journeys_base_url: DEFAULT_JOURNEYS_URL.to_string(),
            station_rows: DEFAULT_STATION_ROWS,
            departure: default_departure(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }

    /// Point all three services at one base URL (for testing).
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        let url = url.into();
        self.opendata_base_url = format!("{url}/search/");
        self.directions_base_url = format!("{url}/directions/json");
        self.journeys_base_url = format!("{url}/journeys");
        self
    }

    /// Set the reference departure for transit journeys.
    pub fn with_departure(mut self, departure: NaiveDateTime) -> Self {
        self.departure = departure;
        self
    }

    /// Set request timeout.
    pub fn with_timeout(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }

    fn stations_url(&self) -> String {
        format!(
            "{}/?dataset={}&rows={}",
            self.opendata_base_url, STATIONS_DATASET, self.station_rows
        )
    }

    fn lines_url(&self, uic: &UicCode) -> String {
        format!(
            "{}/?dataset={}&refine.code_uic={}",
            self.opendata_base_url, LINES_DATASET, uic
        )
    }

    fn directions_url(&self, from: Coordinate, to: Coordinate) -> String {
        format!(
            "{}?origin={}&destination={}&key={}&mode=driving",
            self.directions_base_url,
            from.to_lat_lon(),
            to.to_lat_lon(),
            self.google_api_key
        )
    }

    fn journeys_url(&self, from: Coordinate, to: Coordinate) -> String {
        format!(
            "{}?from={}&to={}&datetime={}",
            self.journeys_base_url,
            from.to_lon_lat(),
            to.to_lon_lat(),
            self.departure.format("%Y%m%dT%H%M%S")
        )
    }
}

/// Client for the three datasets the commute finder reads.
///
/// Every request goes through the cache-backed `Fetcher`, so each distinct
/// query reaches the network at most once.
#[derive(Debug, Clone)]
pub struct DatasetClient<T> {
    fetcher: Fetcher<T>,
    config: DatasetClientConfig,
    planner_headers: HeaderMap,
}

impl DatasetClient<HttpTransport> {
    /// Create a client that talks HTTP and caches into `cache`.
    pub fn new(config: DatasetClientConfig, cache: ResponseCache) -> Result<Self, DatasetError> {
        let transport = HttpTransport::new(StdDuration::from_secs(config.timeout_secs))?;
        Self::with_transport(transport, cache, config)
    }
}

impl<T: Transport> DatasetClient<T> {
    /// Create a client over an arbitrary transport.
    pub fn with_transport(
        transport: T,
        cache: ResponseCache,
        config: DatasetClientConfig,
    ) -> Result<Self, DatasetError> {
        let mut planner_headers = HeaderMap::new();
        planner_headers.insert(AUTHORIZATION, basic_auth(&config.navitia_api_key)?);

        Ok(Self {
            fetcher: Fetcher::new(transport, cache),
            config,
            planner_headers,
        })
    }

    /// Fetch every record of the stations dataset.
    ///
    /// Records without a `fields` object come back as an empty record.
    pub async fn list_stations(&self) -> Result<Vec<StationRecord>, DatasetError> {
        let url = self.config.stations_url();
        let body = self.fetcher.fetch(&url).await?;
        let response: RecordsResponse<StationRecord> = parse(&url, &body)?;

        if let Some(message) = response.error {
            return Err(DatasetError::Api {
                url: redact(&url),
                message,
            });
        }

        let records: Vec<StationRecord> = response
            .records
            .into_iter()
            .map(|r| r.fields.unwrap_or_default())
            .collect();

        info!(count = records.len(), "stations found");
        Ok(records)
    }

    /// Which kinds of line serve the station with this UIC code.
    ///
    /// Reads the first matching record; a station with no record is
    /// neither a train nor an RER station.
    pub async fn classify_line(&self, uic: &UicCode) -> Result<LineClass, DatasetError> {
        let url = self.config.lines_url(uic);
        let body = self.fetcher.fetch(&url).await?;
        let response: RecordsResponse<LineRecord> = parse(&url, &body)?;

        if let Some(message) = response.error {
            return Err(DatasetError::Api {
                url: redact(&url),
                message,
            });
        }

        let class = response
            .records
            .first()
            .and_then(|r| r.fields.as_ref())
            .map(LineRecord::line_class)
            .unwrap_or_default();

        debug!(%uic, ?class, "classified station");
        Ok(class)
    }

    /// Door-to-door travel time between two points.
    ///
    /// Returns `Ok(None)` when the service has no answer for this pair.
    pub async fn journey_duration(
        &self,
        mode: CommuteMode,
        from: Coordinate,
        to: Coordinate,
    ) -> Result<Option<Duration>, DatasetError> {
        match mode {
            CommuteMode::Car => self.driving_duration(from, to).await,
            CommuteMode::Transit => self.transit_duration(from, to).await,
        }
    }

    async fn driving_duration(
        &self,
        from: Coordinate,
        to: Coordinate,
    ) -> Result<Option<Duration>, DatasetError> {
        let url = self.config.directions_url(from, to);
        let body = self.fetcher.fetch(&url).await?;
        let response: DirectionsResponse = parse(&url, &body)?;

        if !response.is_ok() {
            warn!(
                url = %redact(&url),
                status = response.status.as_deref().unwrap_or_default(),
                message = response.error_message.as_deref().unwrap_or_default(),
                "directions service returned no route"
            );
        }

        Ok(response.first_leg_duration())
    }

    async fn transit_duration(
        &self,
        from: Coordinate,
        to: Coordinate,
    ) -> Result<Option<Duration>, DatasetError> {
        let url = self.config.journeys_url(from, to);
        let body = match self
            .fetcher
            .fetch_with_headers(&url, &self.planner_headers)
            .await
        {
            Ok(body) => body,
            // "No solution" comes back as a 404 carrying an error object
            Err(FetchError::Rejected {
                status: 404, body, ..
            }) if is_planner_error(&body) => body,
            Err(e) => return Err(e.into()),
        };
        let response: JourneysResponse = parse(&url, &body)?;

        if let Some(error) = &response.error {
            warn!(
                url = %url,
                id = error.id.as_deref().unwrap_or_default(),
                message = error.message.as_deref().unwrap_or_default(),
                "journey planner returned no journey"
            );
        }

        Ok(response.first_journey_duration())
    }

    /// The transport behind the cache.
    pub fn transport(&self) -> &T {
        self.fetcher.transport()
    }
}

/// `Basic base64("<key>:")`, the journey planner's key-as-user-name scheme.
fn basic_auth(key: &str) -> Result<HeaderValue, DatasetError> {
    let encoded = STANDARD.encode(format!("{key}:"));
    let mut value = HeaderValue::from_str(&format!("Basic {encoded}"))
        .map_err(|_| DatasetError::InvalidCredential("journey planner key".to_string()))?;
    value.set_sensitive(true);
    Ok(value)
}

fn is_planner_error(body: &str) -> bool {
    serde_json::from_str::<JourneysResponse>(body).is_ok_and(|r| r.error.is_some())
}

fn parse<D: DeserializeOwned>(url: &str, body: &str) -> Result<D, DatasetError> {
    serde_json::from_str(body).map_err(|e| {
        let excerpt: String = body.chars().take(200).collect();
        debug!(url = %redact(url), %excerpt, "failed to parse response");
        DatasetError::Json {
            url: redact(url),
            message: e.to_string(),
        }
    })
}

//! Station shortlisting pipeline.
//!
//! Turns the raw stations dataset into the list of commuter-train stations
//! from which both workplaces are reachable within the commute threshold,
//! ordered by city.

mod config;
mod stages;


use std::future::Future;

use chrono::Duration;
use tracing::info;

use crate::domain::{CommuteMode, Coordinate, LineClass, Station, UicCode};
use crate::fetch::Transport;
use crate::sources::{DatasetClient, DatasetError, StationRecord};

pub use config::{DEFAULT_MAX_COMMUTE_MINS, PipelineConfig};
pub use stages::{dedup_by_uic, sort_by_city, to_stations, with_city, within_threshold};

/// Trait for providing station data and travel times.
///
/// This abstraction allows the pipeline to be tested with in-memory data.
pub trait StationSource {
    /// All station records of the dataset.
    fn list_stations(&self) -> impl Future<Output = Result<Vec<StationRecord>, DatasetError>>;

    /// Which kinds of line serve a station.
    fn classify_line(&self, uic: &UicCode)
    -> impl Future<Output = Result<LineClass, DatasetError>>;

    /// Travel time between two points, if the service has an answer.
    fn journey_duration(
        &self,
        mode: CommuteMode,
        from: Coordinate,
        to: Coordinate,
    ) -> impl Future<Output = Result<Option<Duration>, DatasetError>>;
}

impl<T: Transport> StationSource for DatasetClient<T> {
    async fn list_stations(&self) -> Result<Vec<StationRecord>, DatasetError> {
        DatasetClient::list_stations(self).await
    }

    async fn classify_line(&self, uic: &UicCode) -> Result<LineClass, DatasetError> {
        DatasetClient::classify_line(self, uic).await
    }

    async fn journey_duration(
        &self,
        mode: CommuteMode,
        from: Coordinate,
        to: Coordinate,
    ) -> Result<Option<Duration>, DatasetError> {
        DatasetClient::journey_duration(self, mode, from, to).await
    }
}

/// The station shortlisting pipeline.
///
/// Requests are issued one at a time; any failing request aborts the run.
pub struct Pipeline<'a, S> {
    source: &'a S,
    config: &'a PipelineConfig,
}

impl<'a, S: StationSource> Pipeline<'a, S> {
    /// Create a new pipeline.
    pub fn new(source: &'a S, config: &'a PipelineConfig) -> Self {
        Self { source, config }
    }

    /// Run every stage and return the shortlisted stations, city ascending.
    pub async fn run(&self) -> Result<Vec<Station>, DatasetError> {
        let records = self.source.list_stations().await?;

        let stations = to_stations(records);
        info!(count = stations.len(), "identified stations");

        let stations = dedup_by_uic(stations);
        info!(count = stations.len(), "distinct stations");

        let stations = sort_by_city(with_city(stations));
        info!(count = stations.len(), "stations with a city");

        let stations = self.keep_train_not_rer(stations).await?;
        info!(count = stations.len(), "train stations not on the RER");

        let stations = self.add_commutes(stations).await?;

        let stations = within_threshold(stations, self.config.max_commute());
        info!(
            count = stations.len(),
            max_mins = self.config.max_commute_mins,
            "stations within commuting range"
        );

        Ok(stations)
    }

    async fn keep_train_not_rer(&self, stations: Vec<Station>) -> Result<Vec<Station>, DatasetError> {
        let mut kept = Vec::with_capacity(stations.len());

        for station in stations {
            let class = self.source.classify_line(&station.uic).await?;
            if class.is_train_not_rer() {
                kept.push(station);
            }
        }

        Ok(kept)
    }

    async fn add_commutes(&self, stations: Vec<Station>) -> Result<Vec<Station>, DatasetError> {
        let mut enriched = Vec::with_capacity(stations.len());

        for station in stations {
            // Without a position there is nothing to ask the services
            let Some(location) = station.location else {
                enriched.push(station);
                continue;
            };

            let car = self
                .source
                .journey_duration(
                    CommuteMode::Car,
                    location,
                    self.config.car_workplace.location,
                )
                .await?;

            let transit = self
                .source
                .journey_duration(
                    CommuteMode::Transit,
                    location,
                    self.config.transit_workplace.location,
                )
                .await?;

            enriched.push(station.with_commutes(car, transit));
        }

        Ok(enriched)
    }
}

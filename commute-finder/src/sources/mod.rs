//! Typed access to the open-data and journey APIs.
//!
//! Three read operations sit on top of the cache-backed fetcher:
//! - the Transilien stations dataset,
//! - the lines-per-station dataset (is a station on a train or RER line?),
//! - door-to-door travel times by car (directions service) or public
//!   transport (journey planner).

mod client;
mod error;
mod types;

pub use client::{DatasetClient, DatasetClientConfig, default_departure};
pub use error::DatasetError;
pub use types::{
    DirectionsResponse, Journey, JourneysResponse, LineRecord, PlannerError, Quantity, Record,
    RecordsResponse, Route, RouteLeg, StationRecord,
};

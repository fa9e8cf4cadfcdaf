//! Domain types for the commute finder.
//!
//! Value types shared by the data sources, the pipeline and the report.
//! Types that carry an invariant enforce it at construction time.

mod commute;
mod geo;
mod station;

pub use commute::{CommuteMode, LineClass};
pub use geo::{Coordinate, Workplace};
pub use station::{InvalidUicCode, Station, UicCode};

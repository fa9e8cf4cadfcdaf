//! Commuter station finder.
//!
//! Lists the Île-de-France train stations (RER excluded) from which two
//! workplaces, one by car and one by public transport, are both reachable
//! within the commute threshold. Every remote response is cached on disk so
//! repeated runs stay offline.

pub mod cache;
pub mod config;
pub mod domain;
pub mod error;
pub mod fetch;
pub mod pipeline;
pub mod report;
pub mod sources;

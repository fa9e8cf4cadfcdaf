//! Pipeline configuration.

use chrono::Duration;

use crate::domain::Workplace;

/// Commutes at or above this many minutes disqualify a station.
pub const DEFAULT_MAX_COMMUTE_MINS: i64 = 90;

/// Configuration parameters for the station search.
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    /// Destination of the car commute.
    pub car_workplace: Workplace,

    /// Destination of the public transport commute.
    pub transit_workplace: Workplace,

    /// Exclusive upper bound on either commute (minutes).
    pub max_commute_mins: i64,
}

impl PipelineConfig {
    /// Create a new configuration with the given parameters.
    pub fn new(car_workplace: Workplace, transit_workplace: Workplace, max_commute_mins: i64) -> Self {
        Self {
            car_workplace,
            transit_workplace,
            max_commute_mins,
        }
    }

    /// Set the commute threshold.
    pub fn with_max_commute_mins(mut self, mins: i64) -> Self {
        self.max_commute_mins = mins;
        self
    }

    /// Returns the commute threshold as a Duration.
    ///
    /// Saturates at the representable bounds.
    pub fn max_commute(&self) -> Duration {
        Duration::try_minutes(self.max_commute_mins).unwrap_or(if self.max_commute_mins < 0 {
            Duration::MIN
        } else {
            Duration::MAX
        })
    }
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            car_workplace: Workplace::default_car(),
            transit_workplace: Workplace::default_transit(),
            max_commute_mins: DEFAULT_MAX_COMMUTE_MINS,
        }
    }
}

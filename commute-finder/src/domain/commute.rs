//! Commute modes and line classification.

use std::fmt;

/// How a commute is travelled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CommuteMode {
    /// Driving, answered by the directions service.
    Car,
    /// Public transport, answered by the journey planner.
    Transit,
}

impl fmt::Display for CommuteMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CommuteMode::Car => f.write_str("car"),
            CommuteMode::Transit => f.write_str("transit"),
        }
    }
}

/// Which kinds of line serve a station.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LineClass {
    /// Served by a Transilien train line.
    pub is_train: bool,
    /// Served by an RER line.
    pub is_rer: bool,
}

impl LineClass {
    pub fn new(is_train: bool, is_rer: bool) -> Self {
        Self { is_train, is_rer }
    }

    /// Commuter train station that is not on the RER network.
    pub fn is_train_not_rer(&self) -> bool {
        self.is_train && !self.is_rer
    }
}

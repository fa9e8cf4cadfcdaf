//! Station identity and the station record carried through the pipeline.

use std::fmt;

use chrono::Duration;

use super::geo::Coordinate;

/// Error returned when parsing an invalid UIC code.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid UIC code: {reason}")]
pub struct InvalidUicCode {
    reason: &'static str,
}

/// A UIC station code, e.g. `87393009`.
///
/// UIC codes are non-empty strings of ASCII digits. Leading zeros are
/// significant, so the code is kept as text rather than as a number.
///
/// # Examples
///
/// ```
/// use commute_finder::domain::UicCode;
///
/// let code = UicCode::parse("87393009").unwrap();
/// assert_eq!(code.as_str(), "87393009");
///
/// assert!(UicCode::parse("").is_err());
/// assert!(UicCode::parse("8739A009").is_err());
/// ```
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct UicCode(String);

impl UicCode {
    /// Parse a UIC code. Surrounding whitespace is ignored.
    pub fn parse(s: &str) -> Result<Self, InvalidUicCode> {
        let s = s.trim();

        if s.is_empty() {
            return Err(InvalidUicCode {
                reason: "must not be empty",
            });
        }

        if !s.bytes().all(|b| b.is_ascii_digit()) {
            return Err(InvalidUicCode {
                reason: "must contain only ASCII digits",
            });
        }

        Ok(UicCode(s.to_string()))
    }

    /// Returns the code as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for UicCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "UicCode({})", self.0)
    }
}

impl fmt::Display for UicCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A train station, optionally enriched with commute durations.
#[derive(Debug, Clone, PartialEq)]
pub struct Station {
    /// Station identity.
    pub uic: UicCode,

    /// Display name (may be empty when the dataset omits it).
    pub name: String,

    /// Owning city. Empty when the dataset omits it.
    pub city: String,

    /// WGS84 position, when the dataset provides both coordinates.
    pub location: Option<Coordinate>,

    /// Driving time to the car workplace.
    pub car_commute: Option<Duration>,

    /// Public transport time to the transit workplace.
    pub transit_commute: Option<Duration>,
}

impl Station {
    /// Create a station without commute information.
    pub fn new(
        uic: UicCode,
        name: impl Into<String>,
        city: impl Into<String>,
        location: Option<Coordinate>,
    ) -> Self {
        Self {
            uic,
            name: name.into(),
            city: city.into(),
            location,
            car_commute: None,
            transit_commute: None,
        }
    }

    /// Returns a copy of this station carrying the given commutes.
    pub fn with_commutes(
        &self,
        car_commute: Option<Duration>,
        transit_commute: Option<Duration>,
    ) -> Self {
        Self {
            car_commute,
            transit_commute,
            ..self.clone()
        }
    }
}

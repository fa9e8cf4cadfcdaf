//! Geographic coordinates and workplace locations.

/// A WGS84 coordinate in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Coordinate {
    pub lat: f64,
    pub lon: f64,
}

impl Coordinate {
    pub fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }

    /// Build a coordinate from a `[lat, lon, ...]` pair as published by the
    /// open-data datasets. Returns `None` unless both entries are present.
    pub fn from_pair(pair: &[Option<f64>]) -> Option<Self> {
        match pair {
            [Some(lat), Some(lon), ..] => Some(Self::new(*lat, *lon)),
            _ => None,
        }
    }

    /// `lat,lon`, the order used by the directions service.
    pub fn to_lat_lon(&self) -> String {
        format!("{},{}", self.lat, self.lon)
    }

    /// `lon;lat`, the order used by the journey planner.
    pub fn to_lon_lat(&self) -> String {
        format!("{};{}", self.lon, self.lat)
    }
}

/// A named fixed location someone commutes to.
#[derive(Debug, Clone, PartialEq)]
pub struct Workplace {
    pub name: String,
    pub location: Coordinate,
}

impl Workplace {
    pub fn new(name: impl Into<String>, location: Coordinate) -> Self {
        Self {
            name: name.into(),
            location,
        }
    }

    /// Workplace reached by car (Gustave Roussy, Villejuif).
    pub fn default_car() -> Self {
        Self::new("GR", Coordinate::new(48.79444, 2.348062))
    }

    /// Workplace reached by public transport (Rueil-Malmaison).
    pub fn default_transit() -> Self {
        Self::new("OUI", Coordinate::new(48.893205, 2.237082))
    }
}

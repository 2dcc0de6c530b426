//! Coordinates and great-circle distance.
//!
//! Distances use the Haversine formula on a spherical Earth model, which is
//! accurate to well under a percent at the scales a guessing game cares about.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Mean Earth radius in kilometers, shared by every distance in the crate.
pub const EARTH_RADIUS_KM: f64 = 6371.0;

const LAT_MAX: f64 = 90.0;
const LNG_MAX: f64 = 180.0;

/// A latitude/longitude pair in decimal degrees.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    latitude: f64,
    longitude: f64,
}

impl Coordinate {
    /// Create a coordinate, clamping latitude into [-90, 90] and longitude
    /// into [-180, 180].
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude: latitude.clamp(-LAT_MAX, LAT_MAX),
            longitude: longitude.clamp(-LNG_MAX, LNG_MAX),
        }
    }

    pub fn latitude(&self) -> f64 {
        self.latitude
    }

    pub fn longitude(&self) -> f64 {
        self.longitude
    }
}

impl fmt::Display for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.6}, {:.6}", self.latitude, self.longitude)
    }
}

/// Great-circle distance between two coordinates in kilometers.
///
/// Symmetric, non-negative, and zero for coincident points. Always finite,
/// antipodes included.
pub fn distance_km(a: Coordinate, b: Coordinate) -> f64 {
    let d_lat = (b.latitude - a.latitude).to_radians();
    let d_lng = (b.longitude - a.longitude).to_radians();
    let lat1 = a.latitude.to_radians();
    let lat2 = b.latitude.to_radians();

    let h = (d_lat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (d_lng / 2.0).sin().powi(2);

    // Rounding can land h a few ulps above 1 for near-antipodal pairs,
    // where asin would return NaN.
    2.0 * EARTH_RADIUS_KM * h.min(1.0).sqrt().asin()
}

/// Render a distance the way result panels show it: whole meters below one
/// kilometer, otherwise kilometers with a single decimal.
pub fn format_distance(distance_km: f64) -> String {
    if distance_km < 1.0 {
        format!("{} m", (distance_km * 1000.0).round() as i64)
    } else {
        format!("{distance_km:.1} km")
    }
}

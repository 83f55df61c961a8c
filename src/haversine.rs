//! Great-circle travel estimation (fallback when no matrix is available).
//!
//! Uses straight-line distance and an assumed average speed. Less accurate
//! than a routing service (ignores roads) but always available.

use crate::matrix::DistanceMatrix;

/// Average driving speed assumption for time estimation.
pub const DEFAULT_SPEED_KMH: f64 = 50.0;

/// Earth radius in kilometers.
const EARTH_RADIUS_KM: f64 = 6371.0;

/// Distance assumed when a location has no coordinates, so such locations
/// are not treated as colocated with everything else.
pub const NO_COORD_DISTANCE_KM: f64 = 999.0;

/// Haversine distance between two (lat, lng) points in kilometers.
pub fn haversine_km(from: (f64, f64), to: (f64, f64)) -> f64 {
    let (lat1, lng1) = from;
    let (lat2, lng2) = to;

    let lat1_rad = lat1.to_radians();
    let lat2_rad = lat2.to_radians();
    let delta_lat = (lat2 - lat1).to_radians();
    let delta_lng = (lng2 - lng1).to_radians();

    let a = (delta_lat / 2.0).sin().powi(2)
        + lat1_rad.cos() * lat2_rad.cos() * (delta_lng / 2.0).sin().powi(2);
    let c = 2.0 * a.sqrt().asin();

    EARTH_RADIUS_KM * c
}

/// Distance between two optional coordinate pairs, falling back to
/// [`NO_COORD_DISTANCE_KM`] when either side is unknown.
pub fn distance_km(from: Option<(f64, f64)>, to: Option<(f64, f64)>) -> f64 {
    match (from, to) {
        (Some(from), Some(to)) => haversine_km(from, to),
        _ => NO_COORD_DISTANCE_KM,
    }
}

/// Convert kilometers to travel minutes at the given speed, rounded to
/// the nearest minute.
pub fn travel_minutes(km: f64, speed_kmh: f64) -> u32 {
    (km / speed_kmh * 60.0).round() as u32
}

/// Straight-line matrix provider. Synthesizes a [`DistanceMatrix`] from
/// coordinates so the route optimizer can run without external travel data.
#[derive(Debug, Clone)]
pub struct HaversineMatrix {
    /// Assumed average driving speed in km/h.
    pub speed_kmh: f64,
}

impl Default for HaversineMatrix {
    fn default() -> Self {
        Self {
            speed_kmh: DEFAULT_SPEED_KMH,
        }
    }
}

impl HaversineMatrix {
    pub fn new(speed_kmh: f64) -> Self {
        Self { speed_kmh }
    }

    /// Build a matrix over optional coordinates. Pairs involving a
    /// coordinate-less location get the large fallback distance.
    pub fn matrix_for(&self, locations: &[Option<(f64, f64)>]) -> DistanceMatrix {
        let n = locations.len();
        let mut matrix = DistanceMatrix::unknown(n);

        for (i, from) in locations.iter().enumerate() {
            for (j, to) in locations.iter().enumerate() {
                if i == j {
                    matrix.set(i, j, Some(0.0), Some(0.0));
                    continue;
                }
                let km = distance_km(*from, *to);
                let minutes = km / self.speed_kmh * 60.0;
                matrix.set(i, j, Some(minutes), Some(km));
            }
        }

        matrix
    }
}

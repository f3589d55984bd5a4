//! Great-circle distance on a spherical Earth.

use crate::event::Coordinates;

/// Mean Earth radius in kilometers.
const EARTH_RADIUS_KM: f64 = 6371.0;

/// Haversine distance between two points in kilometers.
///
/// Symmetric, deterministic, and zero for identical points. Callers are
/// responsible for supplying in-range coordinates (validated during
/// normalization).
pub fn distance_km(a: Coordinates, b: Coordinates) -> f64 {
    let lat_a = a.lat.to_radians();
    let lat_b = b.lat.to_radians();
    let delta_lat = (b.lat - a.lat).to_radians();
    let delta_lon = (b.lon - a.lon).to_radians();

    let h = (delta_lat / 2.0).sin().powi(2)
        + lat_a.cos() * lat_b.cos() * (delta_lon / 2.0).sin().powi(2);
    let c = 2.0 * h.sqrt().atan2((1.0 - h).sqrt());

    EARTH_RADIUS_KM * c
}

#[cfg(test)]
mod tests {
    use super::*;

    fn p(lat: f64, lon: f64) -> Coordinates {
        Coordinates { lat, lon }
    }

    #[test]
    fn identical_points_are_zero() {
        let bangkok = p(13.7563, 100.5018);
        assert_eq!(distance_km(bangkok, bangkok), 0.0);
    }

    #[test]
    fn symmetric_within_tolerance() {
        let a = p(13.7563, 100.5018);
        let b = p(21.99, 96.07);
        let ab = distance_km(a, b);
        let ba = distance_km(b, a);
        assert!((ab - ba).abs() < 1e-9);
    }

    #[test]
    fn known_city_pair() {
        // NYC to LA, approximately 3940 km
        let dist = distance_km(p(40.7128, -74.0060), p(34.0522, -118.2437));
        assert!((dist - 3940.0).abs() < 100.0);
    }

    #[test]
    fn bangkok_to_mandalay_region() {
        // Roughly 1000 km; well inside a 2000 km alert radius.
        let dist = distance_km(p(13.7563, 100.5018), p(21.99, 96.07));
        assert!(dist > 900.0 && dist < 1100.0);
    }
}

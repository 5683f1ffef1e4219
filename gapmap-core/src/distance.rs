//! Great-circle distance between WGS84 coordinates.

use geo::Coord;

/// Mean Earth radius used for distance calculations, in kilometres.
pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// Haversine distance in kilometres between two `(x = lon, y = lat)` points.
///
/// # Examples
/// ```
/// use geo::Coord;
/// use gapmap_core::haversine_km;
///
/// let origin = Coord { x: 0.0, y: 0.0 };
/// assert_eq!(haversine_km(origin, origin), 0.0);
/// ```
#[must_use]
#[expect(
    clippy::float_arithmetic,
    reason = "great-circle distance is a floating-point formula"
)]
pub fn haversine_km(from: Coord<f64>, to: Coord<f64>) -> f64 {
    let lat_from = from.y.to_radians();
    let lat_to = to.y.to_radians();
    let d_lat = (to.y - from.y).to_radians();
    let d_lon = (to.x - from.x).to_radians();

    let a = (d_lat / 2.0).sin().powi(2) + lat_from.cos() * lat_to.cos() * (d_lon / 2.0).sin().powi(2);
    let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());

    EARTH_RADIUS_KM * c
}

use crate::utils::constants::COORDINATE_DECIMALS;

/// Grid key for a coordinate pair: each axis rounded to
/// [`COORDINATE_DECIMALS`] places and scaled to an integer.
///
/// Rounding works on the exact decimal value of the double, not on the
/// scaled product. `34.05005` is stored as `34.050049999..` and keys to
/// `340500`, while `34.05005 * 1e4` is exactly `340500.5` and would round up.
///
/// # Examples
/// ```
/// use aqi_processor::utils::coordinates::grid_key;
///
/// assert_eq!(grid_key(34.05001, -118.24001), grid_key(34.05002, -118.24002));
/// assert_ne!(grid_key(34.0500, -118.2400), grid_key(34.0501, -118.2400));
/// ```
pub fn grid_key(latitude: f64, longitude: f64) -> (i64, i64) {
    (fixed_point(latitude), fixed_point(longitude))
}

fn fixed_point(value: f64) -> i64 {
    // Non-finite input has no cell; it never reaches here from the aggregator.
    format!("{:.*}", COORDINATE_DECIMALS, value)
        .replace('.', "")
        .parse()
        .unwrap_or(0)
}

/// Round to one decimal place, half away from zero.
pub fn round_tenths(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

/// Calculate the distance between two points using the Haversine formula
pub fn haversine_distance(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
    const EARTH_RADIUS_KM: f64 = 6371.0;

    let lat1_rad = lat1.to_radians();
    let lat2_rad = lat2.to_radians();
    let delta_lat = (lat2 - lat1).to_radians();
    let delta_lon = (lon2 - lon1).to_radians();

    let a = (delta_lat / 2.0).sin().powi(2)
        + lat1_rad.cos() * lat2_rad.cos() * (delta_lon / 2.0).sin().powi(2);
    let c = 2.0 * a.sqrt().asin();

    EARTH_RADIUS_KM * c
}

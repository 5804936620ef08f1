//! Web Mercator on a 512px world at zoom 0.
//!
//! This is the tile convention shared by the base map and the flow layer, so
//! zoom levels computed here can be handed to either surface unchanged.

use core::f64::consts::PI;

/// World size in pixels at zoom 0.
pub const TILE_SIZE: f64 = 512.0;

/// Latitude limit of the square Web Mercator world (degrees).
pub const MAX_LATITUDE: f64 = 85.051_128_779_806_59;

/// Project `[lon, lat]` (degrees) to world pixels at zoom 0.
///
/// `y` grows southwards.
pub fn project(lon_lat: [f64; 2]) -> [f64; 2] {
    let [lon, lat] = lon_lat;
    let lat = lat.clamp(-MAX_LATITUDE, MAX_LATITUDE);
    let lambda = lon.to_radians();
    let phi = lat.to_radians();
    let x = TILE_SIZE * (lambda + PI) / (2.0 * PI);
    let y = TILE_SIZE * (PI - (PI / 4.0 + phi / 2.0).tan().ln()) / (2.0 * PI);
    [x, y]
}

/// Inverse of [`project`].
pub fn unproject(xy: [f64; 2]) -> [f64; 2] {
    let [x, y] = xy;
    let lambda = x / TILE_SIZE * (2.0 * PI) - PI;
    let phi = 2.0 * ((PI - y / TILE_SIZE * (2.0 * PI)).exp().atan() - PI / 4.0);
    [lambda.to_degrees(), phi.to_degrees()]
}

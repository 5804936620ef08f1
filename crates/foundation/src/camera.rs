//! Shared camera description for the flow layer and the base map.

use crate::bounds::GeoBounds;
use crate::math::{project, stable_eq_f64, unproject};

/// Five-parameter viewport description.
///
/// Longitude/latitude in degrees, zoom on the 512px Web Mercator scale,
/// bearing and pitch in degrees.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct CameraState {
    pub longitude: f64,
    pub latitude: f64,
    pub zoom: f64,
    pub bearing: f64,
    pub pitch: f64,
}

impl CameraState {
    pub fn new(longitude: f64, latitude: f64, zoom: f64, bearing: f64, pitch: f64) -> Self {
        Self {
            longitude,
            latitude,
            zoom,
            bearing,
            pitch,
        }
    }

    /// `[lon, lat]`, the order map widgets take a center in.
    pub fn center(&self) -> [f64; 2] {
        [self.longitude, self.latitude]
    }

    /// Field-wise equality where NaN matches NaN.
    ///
    /// `PartialEq` would report a NaN camera as changed on every frame.
    pub fn same_as(&self, other: &CameraState) -> bool {
        stable_eq_f64(self.longitude, other.longitude)
            && stable_eq_f64(self.latitude, other.latitude)
            && stable_eq_f64(self.zoom, other.zoom)
            && stable_eq_f64(self.bearing, other.bearing)
            && stable_eq_f64(self.pitch, other.pitch)
    }
}

/// Viewport size in CSS pixels.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct ViewportSize {
    pub width: f64,
    pub height: f64,
}

impl ViewportSize {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }
}

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct FitOptions {
    /// Fraction of the extent added on every side before fitting.
    pub pad: f64,
    pub min_zoom: f64,
    pub max_zoom: f64,
}

impl Default for FitOptions {
    fn default() -> Self {
        Self {
            pad: 0.3,
            min_zoom: 0.0,
            max_zoom: 20.0,
        }
    }
}

/// Camera that frames `bounds` inside `viewport`, looking straight down.
///
/// A zero-size extent (a single location) fits at `max_zoom`.
pub fn fit_bounds(bounds: GeoBounds, viewport: ViewportSize, opts: FitOptions) -> CameraState {
    let b = bounds.padded(opts.pad);
    let nw = project([b.west, b.north]);
    let se = project([b.east, b.south]);
    let dx = (se[0] - nw[0]).abs();
    let dy = (se[1] - nw[1]).abs();

    let width = viewport.width.max(1.0);
    let height = viewport.height.max(1.0);

    let scale = match (dx > 0.0, dy > 0.0) {
        (true, true) => (width / dx).min(height / dy),
        (true, false) => width / dx,
        (false, true) => height / dy,
        (false, false) => f64::INFINITY,
    };
    let zoom = if scale.is_finite() {
        scale.log2().clamp(opts.min_zoom, opts.max_zoom)
    } else {
        opts.max_zoom
    };

    let [longitude, latitude] = unproject([(nw[0] + se[0]) / 2.0, (nw[1] + se[1]) / 2.0]);
    CameraState::new(longitude, latitude, zoom, 0.0, 0.0)
}

/// Fits the camera to a set of `[lon, lat]` points; `None` if none is finite.
pub fn fit_points<I>(points: I, viewport: ViewportSize, opts: FitOptions) -> Option<CameraState>
where
    I: IntoIterator<Item = [f64; 2]>,
{
    GeoBounds::from_points(points).map(|b| fit_bounds(b, viewport, opts))
}

#[cfg(test)]
mod tests {
    use super::{CameraState, FitOptions, ViewportSize, fit_bounds, fit_points};
    use crate::bounds::GeoBounds;

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn single_point_fits_at_max_zoom() {
        let cam = fit_points(
            [[20.0, 10.0]],
            ViewportSize::new(800.0, 600.0),
            FitOptions::default(),
        )
        .expect("camera");
        assert!(close(cam.longitude, 20.0));
        assert!(close(cam.latitude, 10.0));
        assert_eq!(cam.zoom, 20.0);
        assert_eq!(cam.bearing, 0.0);
        assert_eq!(cam.pitch, 0.0);
    }

    #[test]
    fn full_width_fits_at_zoom_zero() {
        let opts = FitOptions {
            pad: 0.0,
            ..FitOptions::default()
        };
        let cam = fit_bounds(
            GeoBounds::new(-180.0, 0.0, 180.0, 0.0),
            ViewportSize::new(512.0, 512.0),
            opts,
        );
        assert!(close(cam.zoom, 0.0));
        assert!(close(cam.longitude, 0.0));
    }

    #[test]
    fn padding_zooms_out() {
        let b = GeoBounds::new(-73.7, 45.4, -73.5, 45.6);
        let vp = ViewportSize::new(1024.0, 768.0);
        let tight = fit_bounds(b, vp, FitOptions { pad: 0.0, ..FitOptions::default() });
        let padded = fit_bounds(b, vp, FitOptions::default());
        assert!(padded.zoom < tight.zoom);
    }

    #[test]
    fn fit_points_without_finite_points_is_none() {
        let cam = fit_points(
            [[f64::NAN, 1.0]],
            ViewportSize::new(100.0, 100.0),
            FitOptions::default(),
        );
        assert!(cam.is_none());
    }

    #[test]
    fn same_as_treats_nan_fields_as_equal() {
        let a = CameraState::new(f64::NAN, 1.0, 2.0, 0.0, 0.0);
        assert_ne!(a, a);
        assert!(a.same_as(&a));
        assert!(!a.same_as(&CameraState::new(f64::NAN, 1.0, 2.5, 0.0, 0.0)));
    }
}

//! Float comparison policies.
//!
//! Camera values and picked magnitudes travel through the app as raw `f64`
//! and may be NaN (malformed CSV fields are forwarded unchanged). These
//! helpers give those values a deterministic equality and ordering.

use core::cmp::Ordering;

/// Canonicalize a floating-point value for deterministic comparison.
///
/// Rules:
/// - `-0.0` becomes `0.0`
/// - all NaNs become a single canonical NaN
pub fn canonical_f64(v: f64) -> f64 {
    if v == 0.0 {
        // Handles +0.0 and -0.0.
        0.0
    } else if v.is_nan() {
        f64::NAN
    } else {
        v
    }
}

/// Deterministic total ordering for floats.
pub fn stable_total_cmp_f64(a: f64, b: f64) -> Ordering {
    canonical_f64(a).total_cmp(&canonical_f64(b))
}

/// Equality under [`stable_total_cmp_f64`]: NaN equals NaN, `-0.0` equals `0.0`.
#[inline]
pub fn stable_eq_f64(a: f64, b: f64) -> bool {
    stable_total_cmp_f64(a, b) == Ordering::Equal
}

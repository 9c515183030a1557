//! Gaussian envelope and soft-edged circular aperture
//!
//! Both factors are pure functions of the pixel offset from the canvas centre.
//! Their product is the windowing term applied to the grating.

use crate::io::configuration::{APERTURE_FEATHER_FRACTION, APERTURE_RADIUS_FRACTION};
use crate::math::easing::smoothstep;

/// Radial Gaussian falloff `exp(-(dx² + dy²) / (2σ²))`
///
/// A vanishing `sigma` collapses to a unit impulse at the centre instead of
/// producing NaN from `0 / 0`.
pub fn gaussian(dx: f64, dy: f64, sigma: f64) -> f64 {
    let dist_sq = dx.mul_add(dx, dy * dy);
    if dist_sq == 0.0 {
        return 1.0;
    }
    let denominator = 2.0 * sigma * sigma;
    if denominator <= 0.0 {
        return 0.0;
    }
    (-dist_sq / denominator).exp()
}

/// Radius at which the aperture reaches zero
pub fn aperture_radius(size: u32) -> f64 {
    f64::from(size) * APERTURE_RADIUS_FRACTION
}

/// Width of the soft edge inside the aperture radius
pub fn aperture_feather(size: u32) -> f64 {
    f64::from(size) * APERTURE_FEATHER_FRACTION
}

/// Circular aperture with a smoothstep edge
///
/// Returns 1 inside `radius - feather`, 0 at and beyond `radius`, and a
/// monotone ease between the two.
pub fn aperture(r: f64, size: u32) -> f64 {
    let radius = aperture_radius(size);
    let feather = aperture_feather(size);
    1.0 - smoothstep(radius - feather, radius, r)
}

/// Combined window `gaussian · aperture` in `[0, 1]`
pub fn envelope(dx: f64, dy: f64, size: u32, sigma: f64) -> f64 {
    let r = dx.hypot(dy);
    gaussian(dx, dy, sigma) * aperture(r, size)
}

//! Vertical sinusoidal grating

use crate::io::configuration::PIXELS_PER_DEGREE;
use std::f64::consts::TAU;

/// Grating period in pixels for a spatial frequency in cycles per degree
///
/// Non-positive frequencies fall back to one cycle spanning the canvas.
pub fn wavelength(spatial_frequency: f64, size: u32) -> f64 {
    let size = f64::from(size);
    let cycles_per_image = spatial_frequency * (size / PIXELS_PER_DEGREE);
    if cycles_per_image > 0.0 {
        size / cycles_per_image
    } else {
        size
    }
}

/// Grating value in `[-1, 1]` at horizontal offset `dx`
///
/// A positive `shift` moves the stripes to the right.
pub fn grating(dx: f64, wavelength: f64, phase: f64, shift: f64) -> f64 {
    (TAU * (dx - shift) / wavelength + phase).sin()
}

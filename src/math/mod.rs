//! Mathematical utilities for stimulus synthesis

/// Smooth step, clamping and linear interpolation helpers
pub mod easing;

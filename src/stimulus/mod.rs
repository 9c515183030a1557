//! Gabor stimulus evaluators and the patch synthesizer
//!
//! A patch is a vertical sine grating windowed by a Gaussian envelope and a
//! soft circular aperture, sampled on a square grayscale canvas.

/// Gaussian envelope and circular aperture
pub mod envelope;
/// Sinusoidal grating and wavelength derivation
pub mod grating;
/// Frame parameters and per-pixel synthesis
pub mod patch;

pub use patch::{FrameParameters, Patch};

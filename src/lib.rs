//! Gabor patch stimulus synthesis and animated GIF sweeps for the research website
//!
//! Patches are rendered as immutable grayscale buffers, collected into ordered
//! sequences (a spatial-frequency sweep or a temporal flicker ramp) and encoded
//! as looping GIFs. Website photo resizing utilities live alongside.

#![forbid(unsafe_code)]

/// Input/output operations, command line and error handling
pub mod io;
/// Easing and interpolation helpers
pub mod math;
/// Frame sequence construction and ordered rendering
pub mod sequence;
/// Envelope, grating and patch synthesis
pub mod stimulus;

pub use io::error::{GaborError, Result};

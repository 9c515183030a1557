//! Gabor patch synthesis into an immutable grayscale intensity buffer

use crate::io::configuration::{DEFAULT_CONTRAST, SIGMA_SIZE_DIVISOR};
use crate::io::error::{Result, invalid_parameter};
use crate::stimulus::envelope::envelope;
use crate::stimulus::grating::{grating, wavelength};
use image::{GrayImage, Luma, Rgba, RgbaImage};
use ndarray::Array2;

/// Parameters for rendering a single stimulus frame
///
/// Constructed fresh for every frame of a sweep and never mutated afterwards.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameParameters {
    /// Grating frequency in cycles per degree
    pub spatial_frequency: f64,
    /// Edge length of the square canvas in pixels
    pub size: u32,
    /// Contrast in `[0, 1]`; zero renders a flat mid-gray field
    pub contrast: f64,
    /// Envelope standard deviation in pixels, derived from `size` when unset
    pub sigma: Option<f64>,
    /// Grating phase in radians
    pub phase: f64,
    /// Rightward grating displacement in pixels
    pub horizontal_shift: f64,
}

impl FrameParameters {
    /// Parameters with default contrast, derived sigma and no phase or shift
    pub const fn new(spatial_frequency: f64, size: u32) -> Self {
        Self {
            spatial_frequency,
            size,
            contrast: DEFAULT_CONTRAST,
            sigma: None,
            phase: 0.0,
            horizontal_shift: 0.0,
        }
    }

    /// Replace the contrast
    pub const fn with_contrast(mut self, contrast: f64) -> Self {
        self.contrast = contrast;
        self
    }

    /// Use an explicit envelope sigma instead of the size-derived default
    pub const fn with_sigma(mut self, sigma: f64) -> Self {
        self.sigma = Some(sigma);
        self
    }

    /// Replace the grating phase
    pub const fn with_phase(mut self, phase: f64) -> Self {
        self.phase = phase;
        self
    }

    /// Replace the horizontal grating shift
    pub const fn with_shift(mut self, horizontal_shift: f64) -> Self {
        self.horizontal_shift = horizontal_shift;
        self
    }

    /// Envelope sigma actually used for synthesis
    ///
    /// The default is a fixed fraction of the canvas so the visible aperture
    /// does not shrink as spatial frequency rises.
    pub fn effective_sigma(&self) -> f64 {
        self.sigma
            .unwrap_or_else(|| f64::from(self.size) / SIGMA_SIZE_DIVISOR)
    }

    /// Grating period in pixels for these parameters
    pub fn wavelength(&self) -> f64 {
        wavelength(self.spatial_frequency, self.size)
    }

    /// Reject parameters that cannot produce a meaningful image
    ///
    /// A non-positive spatial frequency is accepted and renders a single
    /// cycle across the canvas.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - `size` is zero
    /// - `contrast` is not finite or lies outside `[0, 1]`
    /// - `sigma` is set but not a positive finite number
    /// - `spatial_frequency`, `phase` or `horizontal_shift` is not finite
    pub fn validate(&self) -> Result<()> {
        if self.size == 0 {
            return Err(invalid_parameter(
                "size",
                &self.size,
                &"canvas size must be at least one pixel",
            ));
        }
        if !self.contrast.is_finite() || !(0.0..=1.0).contains(&self.contrast) {
            return Err(invalid_parameter(
                "contrast",
                &self.contrast,
                &"contrast must lie in [0, 1]",
            ));
        }
        if let Some(sigma) = self.sigma {
            if !sigma.is_finite() || sigma <= 0.0 {
                return Err(invalid_parameter(
                    "sigma",
                    &sigma,
                    &"sigma must be a positive number of pixels",
                ));
            }
        }
        if !self.spatial_frequency.is_finite() {
            return Err(invalid_parameter(
                "spatial_frequency",
                &self.spatial_frequency,
                &"spatial frequency must be finite",
            ));
        }
        if !self.phase.is_finite() {
            return Err(invalid_parameter(
                "phase",
                &self.phase,
                &"phase must be finite",
            ));
        }
        if !self.horizontal_shift.is_finite() {
            return Err(invalid_parameter(
                "horizontal_shift",
                &self.horizontal_shift,
                &"shift must be finite",
            ));
        }
        Ok(())
    }
}

/// Map a windowed grating value to an 8-bit intensity
///
/// Always lands in `[0, 255]`; NaN maps to black.
pub fn to_intensity(value: f64, contrast: f64) -> u8 {
    let scaled = (value.mul_add(contrast, 1.0) / 2.0 * 255.0).round();
    if scaled.is_nan() {
        return 0;
    }
    scaled.clamp(0.0, 255.0) as u8
}

/// Rendered grayscale stimulus frame
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Patch {
    pixels: Array2<u8>,
}

impl Patch {
    /// Render a patch
    ///
    /// # Errors
    ///
    /// Returns an error if the parameters fail [`FrameParameters::validate`]
    pub fn synthesize(params: &FrameParameters) -> Result<Self> {
        params.validate()?;

        let size = params.size as usize;
        let center = f64::from(params.size) / 2.0;
        let sigma = params.effective_sigma();
        let period = params.wavelength();

        let pixels = Array2::from_shape_fn((size, size), |(y, x)| {
            let dx = x as f64 - center;
            let dy = y as f64 - center;
            let window = envelope(dx, dy, params.size, sigma);
            let wave = grating(dx, period, params.phase, params.horizontal_shift);
            to_intensity(window * wave, params.contrast)
        });

        Ok(Self { pixels })
    }

    /// Edge length in pixels
    pub fn size(&self) -> u32 {
        self.pixels.nrows() as u32
    }

    /// Intensity at column `x`, row `y`
    pub fn intensity(&self, x: u32, y: u32) -> Option<u8> {
        self.pixels.get((y as usize, x as usize)).copied()
    }

    /// Row-major intensity buffer
    pub const fn pixels(&self) -> &Array2<u8> {
        &self.pixels
    }

    /// True when every pixel has the same intensity
    pub fn is_uniform(&self) -> bool {
        let mut values = self.pixels.iter();
        values
            .next()
            .is_none_or(|first| values.all(|value| value == first))
    }

    /// Single-channel image view of the patch
    pub fn to_gray_image(&self) -> GrayImage {
        let size = self.size();
        GrayImage::from_fn(size, size, |x, y| {
            Luma([self.intensity(x, y).unwrap_or(0)])
        })
    }

    /// Opaque RGBA copy of the patch for multi-frame encoders
    pub fn to_rgba_image(&self) -> RgbaImage {
        let size = self.size();
        RgbaImage::from_fn(size, size, |x, y| {
            let value = self.intensity(x, y).unwrap_or(0);
            Rgba([value, value, value, u8::MAX])
        })
    }
}

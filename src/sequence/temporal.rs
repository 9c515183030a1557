//! Temporal flicker ramp
//!
//! Simulates a stimulus blinking on and off while its flicker rate climbs
//! linearly from `min_hz` to `max_hz`. On-frames lose contrast as the rate
//! rises, approximating flicker fusion; off-frames are flat mid-gray.
//! Every frame is a pure function of its index.

use crate::io::configuration::{
    DEFAULT_CONTRAST, DEFAULT_PATCH_SIZE, TEMPORAL_CONTRAST_FALLOFF, TEMPORAL_FRAME_COUNT,
    TEMPORAL_MAX_HZ, TEMPORAL_MIN_HZ, TEMPORAL_SPATIAL_FREQUENCY, TEMPORAL_TIME_STEP_S,
};
use crate::io::error::{Result, invalid_parameter};
use crate::math::easing::lerp;
use crate::stimulus::FrameParameters;
use std::f64::consts::TAU;

/// Linear flicker-rate ramp rendered as on/off frames
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TemporalRamp {
    /// Number of frames in the ramp
    pub frame_count: usize,
    /// Simulated seconds between frames
    pub time_step: f64,
    /// Flicker rate of the first frame
    pub min_hz: f64,
    /// Flicker rate of the last frame
    pub max_hz: f64,
    /// Grating frequency held constant across the ramp
    pub spatial_frequency: f64,
    /// Contrast of an on-frame at `min_hz`
    pub base_contrast: f64,
    /// Canvas edge length in pixels
    pub size: u32,
}

impl Default for TemporalRamp {
    fn default() -> Self {
        Self {
            frame_count: TEMPORAL_FRAME_COUNT,
            time_step: TEMPORAL_TIME_STEP_S,
            min_hz: TEMPORAL_MIN_HZ,
            max_hz: TEMPORAL_MAX_HZ,
            spatial_frequency: TEMPORAL_SPATIAL_FREQUENCY,
            base_contrast: DEFAULT_CONTRAST,
            size: DEFAULT_PATCH_SIZE,
        }
    }
}

impl TemporalRamp {
    /// Check ramp settings before any frame is built
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - `frame_count` is zero
    /// - `time_step` is not a positive finite number
    /// - `min_hz` is not positive or `max_hz` does not exceed it
    /// - `base_contrast` lies outside `[0, 1]`
    pub fn validate(&self) -> Result<()> {
        if self.frame_count == 0 {
            return Err(invalid_parameter(
                "frame_count",
                &self.frame_count,
                &"the ramp needs at least one frame",
            ));
        }
        if !self.time_step.is_finite() || self.time_step <= 0.0 {
            return Err(invalid_parameter(
                "time_step",
                &self.time_step,
                &"time step must be a positive number of seconds",
            ));
        }
        if !self.min_hz.is_finite() || self.min_hz <= 0.0 {
            return Err(invalid_parameter(
                "min_hz",
                &self.min_hz,
                &"flicker rate must be positive",
            ));
        }
        if !self.max_hz.is_finite() || self.max_hz <= self.min_hz {
            return Err(invalid_parameter(
                "max_hz",
                &self.max_hz,
                &format!("must exceed min_hz {}", self.min_hz),
            ));
        }
        if !self.base_contrast.is_finite() || !(0.0..=1.0).contains(&self.base_contrast) {
            return Err(invalid_parameter(
                "base_contrast",
                &self.base_contrast,
                &"contrast must lie in [0, 1]",
            ));
        }
        Ok(())
    }

    /// Simulated time of frame `index` in seconds
    pub fn time_at(&self, index: usize) -> f64 {
        index as f64 * self.time_step
    }

    /// Flicker rate of frame `index`, exact at both ends of the ramp
    pub fn hz_at(&self, index: usize) -> f64 {
        if self.frame_count <= 1 {
            return self.min_hz;
        }
        let t = index as f64 / (self.frame_count - 1) as f64;
        lerp(self.min_hz, self.max_hz, t)
    }

    /// Whether the stimulus is visible on frame `index`
    pub fn is_on(&self, index: usize) -> bool {
        (TAU * self.hz_at(index) * self.time_at(index)).sin() >= 0.0
    }

    /// Contrast multiplier for a flicker rate: 1 at `min_hz`, 0 at `max_hz`
    pub fn contrast_scale(&self, hz: f64) -> f64 {
        let remaining = 1.0 - (hz - self.min_hz) / (self.max_hz - self.min_hz);
        remaining.max(0.0).powf(TEMPORAL_CONTRAST_FALLOFF)
    }

    /// Contrast of an on-frame flickering at `hz`
    pub fn on_contrast(&self, hz: f64) -> f64 {
        self.base_contrast * self.contrast_scale(hz)
    }

    /// Parameters of frame `index`; off-frames have zero contrast
    pub fn frame_at(&self, index: usize) -> FrameParameters {
        let contrast = if self.is_on(index) {
            self.on_contrast(self.hz_at(index))
        } else {
            0.0
        };
        FrameParameters::new(self.spatial_frequency, self.size).with_contrast(contrast)
    }

    /// Frame parameters in ascending simulated time
    ///
    /// # Errors
    ///
    /// Returns an error if the ramp settings or any generated frame fail
    /// validation
    pub fn frames(&self) -> Result<Vec<FrameParameters>> {
        self.validate()?;
        (0..self.frame_count)
            .map(|index| {
                let params = self.frame_at(index);
                params.validate().map(|()| params)
            })
            .collect()
    }
}

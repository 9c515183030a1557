//! Spatial-frequency sweep: one frame per integer cycles-per-degree value

use crate::io::configuration::{
    DEFAULT_CONTRAST, DEFAULT_PATCH_SIZE, SPATIAL_MAX_FREQUENCY, SPATIAL_MIN_FREQUENCY,
};
use crate::io::error::{Result, invalid_parameter};
use crate::stimulus::FrameParameters;

/// Ascending sweep over integer spatial frequencies at fixed contrast
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpatialSweep {
    /// First frequency in cycles per degree
    pub min_frequency: u32,
    /// Last frequency in cycles per degree, inclusive
    pub max_frequency: u32,
    /// Canvas edge length in pixels
    pub size: u32,
    /// Contrast shared by every frame
    pub contrast: f64,
}

impl Default for SpatialSweep {
    fn default() -> Self {
        Self {
            min_frequency: SPATIAL_MIN_FREQUENCY,
            max_frequency: SPATIAL_MAX_FREQUENCY,
            size: DEFAULT_PATCH_SIZE,
            contrast: DEFAULT_CONTRAST,
        }
    }
}

impl SpatialSweep {
    /// Number of frames the sweep produces
    pub const fn frame_count(&self) -> usize {
        if self.max_frequency < self.min_frequency {
            0
        } else {
            (self.max_frequency - self.min_frequency) as usize + 1
        }
    }

    /// Frame parameters in ascending frequency order
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The frequency range is empty or starts at zero
    /// - Any generated frame fails parameter validation
    pub fn frames(&self) -> Result<Vec<FrameParameters>> {
        if self.min_frequency == 0 {
            return Err(invalid_parameter(
                "min_frequency",
                &self.min_frequency,
                &"spatial frequencies start at 1 cpd",
            ));
        }
        if self.max_frequency < self.min_frequency {
            return Err(invalid_parameter(
                "max_frequency",
                &self.max_frequency,
                &format!("must not be below min_frequency {}", self.min_frequency),
            ));
        }

        (self.min_frequency..=self.max_frequency)
            .map(|frequency| {
                let params = FrameParameters::new(f64::from(frequency), self.size)
                    .with_contrast(self.contrast);
                params.validate().map(|()| params)
            })
            .collect()
    }
}

//! Stimulus constants and runtime configuration defaults

// Display geometry assumed by the website figures
/// Pixels subtending one degree of visual angle
pub const PIXELS_PER_DEGREE: f64 = 60.0;

/// Default edge length of the square stimulus canvas
pub const DEFAULT_PATCH_SIZE: u32 = 200;

/// Default Michelson-style contrast of a rendered patch
pub const DEFAULT_CONTRAST: f64 = 0.8;

// Keeps the aperture the same size at every spatial frequency
/// Gaussian sigma as a divisor of the canvas size
pub const SIGMA_SIZE_DIVISOR: f64 = 2.2;

/// Circular aperture radius as a fraction of canvas size
pub const APERTURE_RADIUS_FRACTION: f64 = 0.48;

/// Width of the soft aperture edge as a fraction of canvas size
pub const APERTURE_FEATHER_FRACTION: f64 = 0.04;

// Spatial-frequency sweep
/// Lowest spatial frequency in the sweep (cycles per degree)
pub const SPATIAL_MIN_FREQUENCY: u32 = 1;
/// Highest spatial frequency in the sweep (cycles per degree)
pub const SPATIAL_MAX_FREQUENCY: u32 = 30;
/// Per-frame display time of the spatial sweep
pub const SPATIAL_FRAME_DURATION_MS: u32 = 150;

// Temporal flicker ramp
/// Number of frames in the flicker ramp
pub const TEMPORAL_FRAME_COUNT: usize = 240;
/// Simulated seconds between consecutive ramp frames
pub const TEMPORAL_TIME_STEP_S: f64 = 0.03;
/// Flicker rate of the first ramp frame
pub const TEMPORAL_MIN_HZ: f64 = 1.0;
/// Flicker rate of the last ramp frame
pub const TEMPORAL_MAX_HZ: f64 = 30.0;
/// Spatial frequency held fixed while the flicker rate changes
pub const TEMPORAL_SPATIAL_FREQUENCY: f64 = 4.0;
/// Exponent shaping how fast contrast fades as flicker rate rises
pub const TEMPORAL_CONTRAST_FALLOFF: f64 = 1.3;
/// Per-frame display time of the flicker ramp
pub const TEMPORAL_FRAME_DURATION_MS: u32 = 30;

// GIF stores delays in hundredths of a second
/// Granularity of GIF frame delays
pub const GIF_DELAY_GRANULARITY_MS: u32 = 10;

/// Delay assumed for GIF frames that store none
pub const GIF_DEFAULT_DELAY_MS: u32 = 100;

// Output settings
/// Directory receiving generated website figures
pub const DEFAULT_OUTPUT_DIR: &str = "assets/images";
/// File name of the spatial sweep animation
pub const SPATIAL_OUTPUT_NAME: &str = "gabor_spatial_frequency.gif";
/// File name of the temporal ramp animation
pub const TEMPORAL_OUTPUT_NAME: &str = "temporal_frequency.gif";

// Asset resizing
/// JPEG quality for single resizes
pub const DEFAULT_JPEG_QUALITY: u8 = 95;
/// JPEG quality for generated web variants
pub const VARIANT_JPEG_QUALITY: u8 = 85;

/// JPEG quality for height-normalized figures
pub const FIGURE_JPEG_QUALITY: u8 = 90;

/// Share of the image height removed by a trim
pub const DEFAULT_TRIM_FRACTION: f64 = 0.15;

/// Named target sizes produced for every website photograph
pub const WEB_VARIANTS: [(&str, u32, u32); 5] = [
    ("hero", 1920, 1080),
    ("card", 400, 300),
    ("thumbnail", 150, 150),
    ("gallery", 800, 600),
    ("team", 300, 400),
];

// Progress bar display settings
/// Width of progress bars in characters
pub const PROGRESS_BAR_WIDTH: u16 = 40;

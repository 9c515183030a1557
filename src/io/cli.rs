//! Command-line interface for stimulus animations and website asset tooling

use crate::io::animation::{encode_animation, inspect_animation, validate_frame_duration};
use crate::io::configuration::{
    DEFAULT_CONTRAST, DEFAULT_JPEG_QUALITY, DEFAULT_OUTPUT_DIR, DEFAULT_PATCH_SIZE,
    DEFAULT_TRIM_FRACTION, FIGURE_JPEG_QUALITY,
    SPATIAL_FRAME_DURATION_MS, SPATIAL_MAX_FREQUENCY, SPATIAL_MIN_FREQUENCY,
    SPATIAL_OUTPUT_NAME, TEMPORAL_FRAME_COUNT, TEMPORAL_FRAME_DURATION_MS, TEMPORAL_MAX_HZ,
    TEMPORAL_MIN_HZ, TEMPORAL_OUTPUT_NAME, TEMPORAL_SPATIAL_FREQUENCY, TEMPORAL_TIME_STEP_S,
};
use crate::io::error::Result;
use crate::io::image::export_patch_png;
use crate::io::progress::FrameProgress;
use crate::io::resize::{
    CropAnchor, Enhancement, ResizeOptions, TrimMode, create_web_variants, enhance_file,
    fit_height_file, resize_animation_to_height, resize_file, scale_file, trim_file,
};
use crate::sequence::{SequenceBuilder, SpatialSweep, TemporalRamp};
use crate::stimulus::{FrameParameters, Patch};
use clap::{ArgAction, Args, Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::time::Instant;

#[derive(Parser, Debug)]
#[command(name = "gaborgif")]
#[command(
    author,
    version,
    about = "Render Gabor patch sweeps as looping GIFs and prepare website images"
)]
/// Command-line arguments for the stimulus and asset tool
pub struct Cli {
    /// Operation to run
    #[command(subcommand)]
    pub command: Command,

    /// Suppress progress output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Increase log detail (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Worker threads for frame rendering (defaults to all cores)
    #[arg(long, global = true, value_parser = clap::value_parser!(u16).range(1..))]
    pub threads: Option<u16>,
}

impl Cli {
    /// Check if progress should be displayed
    pub const fn should_show_progress(&self) -> bool {
        !self.quiet
    }

    /// Default log directive implied by the verbosity flags
    pub const fn log_directive(&self) -> &'static str {
        match self.verbose {
            0 => "warn",
            1 => "info",
            2 => "debug",
            _ => "trace",
        }
    }
}

/// Available subcommands
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Sweep spatial frequency (1-30 cpd) and write a looping GIF
    Spatial(SpatialArgs),
    /// Ramp flicker rate (1-30 Hz) and write a looping GIF
    Temporal(TemporalArgs),
    /// Render a single patch as a PNG
    Frame(FrameArgs),
    /// Resize and crop one image to exact dimensions
    Resize(ResizeArgs),
    /// Resize one image to a fixed height, keeping its aspect ratio
    FitHeight(FitHeightArgs),
    /// Resize one image by a scale factor
    Scale(ScaleArgs),
    /// Cut a share of the rows off the bottom or off both ends
    Trim(TrimArgs),
    /// Resize every frame of an animated GIF to a fixed height
    GifHeight(GifHeightArgs),
    /// Write the standard website size variants of one image
    Variants(VariantsArgs),
    /// Adjust brightness, contrast, saturation and sharpness of one image
    Enhance(EnhanceArgs),
    /// Report frame count, size, delays and looping of a GIF
    Inspect(InspectArgs),
}

/// Where an animation is written
#[derive(Args, Debug, Clone)]
pub struct OutputArgs {
    /// Directory receiving the animation
    #[arg(long, default_value = DEFAULT_OUTPUT_DIR)]
    pub output_dir: PathBuf,

    /// File name inside the output directory (subcommand default if omitted)
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

impl OutputArgs {
    /// Resolved output file path
    pub fn resolve(&self, default_name: &str) -> PathBuf {
        self.output_dir.join(
            self.output
                .as_deref()
                .unwrap_or_else(|| Path::new(default_name)),
        )
    }
}

/// Arguments of the `spatial` subcommand
#[derive(Args, Debug, Clone)]
pub struct SpatialArgs {
    #[command(flatten)]
    #[allow(missing_docs)]
    pub output: OutputArgs,

    /// Canvas edge length in pixels
    #[arg(short, long, default_value_t = DEFAULT_PATCH_SIZE, value_parser = clap::value_parser!(u32).range(1..))]
    pub size: u32,

    /// Patch contrast in [0, 1]
    #[arg(short, long, default_value_t = DEFAULT_CONTRAST, value_parser = parse_unit_interval)]
    pub contrast: f64,

    /// Display time of each frame in milliseconds, a multiple of 10
    #[arg(short, long, default_value_t = SPATIAL_FRAME_DURATION_MS, value_parser = parse_frame_duration)]
    pub duration: u32,

    /// First spatial frequency in cycles per degree
    #[arg(long, default_value_t = SPATIAL_MIN_FREQUENCY, value_parser = clap::value_parser!(u32).range(1..))]
    pub min_frequency: u32,

    /// Last spatial frequency in cycles per degree
    #[arg(long, default_value_t = SPATIAL_MAX_FREQUENCY, value_parser = clap::value_parser!(u32).range(1..))]
    pub max_frequency: u32,
}

/// Arguments of the `temporal` subcommand
#[derive(Args, Debug, Clone)]
pub struct TemporalArgs {
    #[command(flatten)]
    #[allow(missing_docs)]
    pub output: OutputArgs,

    /// Canvas edge length in pixels
    #[arg(short, long, default_value_t = DEFAULT_PATCH_SIZE, value_parser = clap::value_parser!(u32).range(1..))]
    pub size: u32,

    /// On-frame contrast at the lowest flicker rate, in [0, 1]
    #[arg(short, long, default_value_t = DEFAULT_CONTRAST, value_parser = parse_unit_interval)]
    pub contrast: f64,

    /// Display time of each frame in milliseconds, a multiple of 10
    #[arg(short, long, default_value_t = TEMPORAL_FRAME_DURATION_MS, value_parser = parse_frame_duration)]
    pub duration: u32,

    /// Number of frames in the ramp
    #[arg(short, long, default_value_t = TEMPORAL_FRAME_COUNT)]
    pub frames: usize,

    /// Simulated seconds between frames
    #[arg(long, default_value_t = TEMPORAL_TIME_STEP_S, value_parser = parse_positive)]
    pub dt: f64,

    /// Grating frequency held fixed during the ramp, in cycles per degree
    #[arg(long, default_value_t = TEMPORAL_SPATIAL_FREQUENCY)]
    pub spatial_frequency: f64,

    /// Flicker rate of the first frame
    #[arg(long, default_value_t = TEMPORAL_MIN_HZ, value_parser = parse_positive)]
    pub min_hz: f64,

    /// Flicker rate of the last frame
    #[arg(long, default_value_t = TEMPORAL_MAX_HZ, value_parser = parse_positive)]
    pub max_hz: f64,
}

/// Arguments of the `frame` subcommand
#[derive(Args, Debug, Clone)]
pub struct FrameArgs {
    /// Spatial frequency in cycles per degree
    #[arg(short, long)]
    pub frequency: f64,

    /// Output PNG path
    #[arg(short, long)]
    pub output: PathBuf,

    /// Canvas edge length in pixels
    #[arg(short, long, default_value_t = DEFAULT_PATCH_SIZE, value_parser = clap::value_parser!(u32).range(1..))]
    pub size: u32,

    /// Patch contrast in [0, 1]
    #[arg(short, long, default_value_t = DEFAULT_CONTRAST, value_parser = parse_unit_interval)]
    pub contrast: f64,

    /// Envelope sigma in pixels (defaults to size / 2.2)
    #[arg(long, value_parser = parse_positive)]
    pub sigma: Option<f64>,

    /// Grating phase in radians
    #[arg(long, default_value_t = 0.0, allow_negative_numbers = true)]
    pub phase: f64,

    /// Rightward grating shift in pixels
    #[arg(long, default_value_t = 0.0, allow_negative_numbers = true)]
    pub shift: f64,
}

/// Arguments of the `resize` subcommand
#[derive(Args, Debug, Clone)]
pub struct ResizeArgs {
    /// Source image
    #[arg(value_name = "INPUT")]
    pub input: PathBuf,

    /// Destination image; the extension selects the format
    #[arg(short, long)]
    pub output: PathBuf,

    /// Output width in pixels
    #[arg(short = 'w', long, value_parser = clap::value_parser!(u32).range(1..))]
    pub width: u32,

    /// Output height in pixels
    #[arg(short = 'H', long, value_parser = clap::value_parser!(u32).range(1..))]
    pub height: u32,

    /// Part of the image kept when cropping
    #[arg(short, long, value_enum, default_value_t = CropAnchor::Center)]
    pub crop: CropAnchor,

    /// JPEG quality 1-100
    #[arg(long, default_value_t = DEFAULT_JPEG_QUALITY, value_parser = clap::value_parser!(u8).range(1..=100))]
    pub quality: u8,
}

/// Arguments of the `fit-height` subcommand
#[derive(Args, Debug, Clone)]
pub struct FitHeightArgs {
    /// Source image
    #[arg(value_name = "INPUT")]
    pub input: PathBuf,

    /// Destination image; the extension selects the format
    #[arg(short, long)]
    pub output: PathBuf,

    /// Output height in pixels
    #[arg(short = 'H', long, value_parser = clap::value_parser!(u32).range(1..))]
    pub height: u32,

    /// JPEG quality 1-100
    #[arg(long, default_value_t = FIGURE_JPEG_QUALITY, value_parser = clap::value_parser!(u8).range(1..=100))]
    pub quality: u8,
}

/// Arguments of the `scale` subcommand
#[derive(Args, Debug, Clone)]
pub struct ScaleArgs {
    /// Source image
    #[arg(value_name = "INPUT")]
    pub input: PathBuf,

    /// Destination image; the extension selects the format
    #[arg(short, long)]
    pub output: PathBuf,

    /// Factor applied to both sides, e.g. 0.7
    #[arg(short, long, value_parser = parse_positive)]
    pub factor: f64,

    /// JPEG quality 1-100
    #[arg(long, default_value_t = DEFAULT_JPEG_QUALITY, value_parser = clap::value_parser!(u8).range(1..=100))]
    pub quality: u8,
}

/// Arguments of the `trim` subcommand
#[derive(Args, Debug, Clone)]
pub struct TrimArgs {
    /// Source image
    #[arg(value_name = "INPUT")]
    pub input: PathBuf,

    /// Destination image; the extension selects the format
    #[arg(short, long)]
    pub output: PathBuf,

    /// Which rows to remove
    #[arg(short, long, value_enum, default_value_t = TrimMode::Bottom)]
    pub mode: TrimMode,

    /// Share of the height removed at each trimmed edge
    #[arg(long, default_value_t = DEFAULT_TRIM_FRACTION, value_parser = parse_unit_interval)]
    pub fraction: f64,

    /// JPEG quality 1-100
    #[arg(long, default_value_t = DEFAULT_JPEG_QUALITY, value_parser = clap::value_parser!(u8).range(1..=100))]
    pub quality: u8,
}

/// Arguments of the `gif-height` subcommand
#[derive(Args, Debug, Clone)]
pub struct GifHeightArgs {
    /// Source GIF
    #[arg(value_name = "GIF")]
    pub input: PathBuf,

    /// Destination GIF
    #[arg(short, long)]
    pub output: PathBuf,

    /// Output height in pixels
    #[arg(short = 'H', long, value_parser = clap::value_parser!(u32).range(1..))]
    pub height: u32,
}

/// Arguments of the `variants` subcommand
#[derive(Args, Debug, Clone)]
pub struct VariantsArgs {
    /// Source image
    #[arg(value_name = "INPUT")]
    pub input: PathBuf,

    /// Directory receiving the variants
    #[arg(short, long)]
    pub output_dir: PathBuf,
}

/// Arguments of the `enhance` subcommand
#[derive(Args, Debug, Clone)]
pub struct EnhanceArgs {
    /// Source image
    #[arg(value_name = "INPUT")]
    pub input: PathBuf,

    /// Destination image
    #[arg(short, long)]
    pub output: PathBuf,

    /// Brightness factor (1.0 keeps the original)
    #[arg(long, default_value_t = 1.0, value_parser = parse_factor)]
    pub brightness: f32,

    /// Contrast factor (1.0 keeps the original)
    #[arg(long, default_value_t = 1.0, value_parser = parse_factor)]
    pub contrast: f32,

    /// Saturation factor (1.0 keeps the original)
    #[arg(long, default_value_t = 1.0, value_parser = parse_factor)]
    pub saturation: f32,

    /// Sharpness factor (1.0 keeps the original)
    #[arg(long, default_value_t = 1.0, value_parser = parse_factor)]
    pub sharpness: f32,

    /// JPEG quality 1-100
    #[arg(long, default_value_t = DEFAULT_JPEG_QUALITY, value_parser = clap::value_parser!(u8).range(1..=100))]
    pub quality: u8,
}

/// Arguments of the `inspect` subcommand
#[derive(Args, Debug, Clone)]
pub struct InspectArgs {
    /// GIF to inspect
    #[arg(value_name = "GIF")]
    pub path: PathBuf,
}

/// Parse a number in `[0, 1]`
///
/// # Errors
///
/// Returns a message if the text is not a finite number in range
pub fn parse_unit_interval(text: &str) -> std::result::Result<f64, String> {
    let value: f64 = text
        .trim()
        .parse()
        .map_err(|_| format!("'{text}' is not a number"))?;
    if value.is_finite() && (0.0..=1.0).contains(&value) {
        Ok(value)
    } else {
        Err(format!("{value} is outside [0, 1]"))
    }
}

/// Parse a frame display time a GIF can store exactly
///
/// # Errors
///
/// Returns a message if the text is not an integer or the duration is below
/// 10 ms or off the 10 ms grid
pub fn parse_frame_duration(text: &str) -> std::result::Result<u32, String> {
    let value: u32 = text
        .trim()
        .parse()
        .map_err(|_| format!("'{text}' is not a whole number of milliseconds"))?;
    validate_frame_duration(value).map_err(|e| e.to_string())?;
    Ok(value)
}

/// Parse a strictly positive finite number
///
/// # Errors
///
/// Returns a message if the text is not a finite number above zero
pub fn parse_positive(text: &str) -> std::result::Result<f64, String> {
    let value: f64 = text
        .trim()
        .parse()
        .map_err(|_| format!("'{text}' is not a number"))?;
    if value.is_finite() && value > 0.0 {
        Ok(value)
    } else {
        Err(format!("{value} must be greater than zero"))
    }
}

/// Parse a non-negative enhancement factor
///
/// # Errors
///
/// Returns a message if the text is not a finite number of at least zero
pub fn parse_factor(text: &str) -> std::result::Result<f32, String> {
    let value: f32 = text
        .trim()
        .parse()
        .map_err(|_| format!("'{text}' is not a number"))?;
    if value.is_finite() && value >= 0.0 {
        Ok(value)
    } else {
        Err(format!("{value} must be zero or greater"))
    }
}

/// Executes a parsed command line
pub struct Runner {
    cli: Cli,
}

impl Runner {
    /// Create a runner for the given CLI arguments
    pub const fn new(cli: Cli) -> Self {
        Self { cli }
    }

    /// Run the selected subcommand
    ///
    /// # Errors
    ///
    /// Returns an error if validation, rendering, encoding or file I/O fails
    pub fn run(&self) -> Result<()> {
        match &self.cli.command {
            Command::Spatial(args) => self.run_spatial(args),
            Command::Temporal(args) => self.run_temporal(args),
            Command::Frame(args) => Self::run_frame(args),
            Command::Resize(args) => Self::run_resize(args),
            Command::FitHeight(args) => Self::run_fit_height(args),
            Command::Scale(args) => Self::run_scale(args),
            Command::Trim(args) => Self::run_trim(args),
            Command::GifHeight(args) => Self::run_gif_height(args),
            Command::Variants(args) => Self::run_variants(args),
            Command::Enhance(args) => Self::run_enhance(args),
            Command::Inspect(args) => Self::run_inspect(args),
        }
    }

    fn sequence_builder(&self) -> SequenceBuilder {
        self.cli
            .threads
            .map_or_else(SequenceBuilder::new, |n| SequenceBuilder::with_threads(usize::from(n)))
    }

    fn run_spatial(&self, args: &SpatialArgs) -> Result<()> {
        let sweep = SpatialSweep {
            min_frequency: args.min_frequency,
            max_frequency: args.max_frequency,
            size: args.size,
            contrast: args.contrast,
        };
        let frames = sweep.frames()?;
        let path = args.output.resolve(SPATIAL_OUTPUT_NAME);
        self.render_animation("spatial", &frames, args.duration, &path)
    }

    fn run_temporal(&self, args: &TemporalArgs) -> Result<()> {
        let ramp = TemporalRamp {
            frame_count: args.frames,
            time_step: args.dt,
            min_hz: args.min_hz,
            max_hz: args.max_hz,
            spatial_frequency: args.spatial_frequency,
            base_contrast: args.contrast,
            size: args.size,
        };
        let frames = ramp.frames()?;
        let path = args.output.resolve(TEMPORAL_OUTPUT_NAME);
        self.render_animation("temporal", &frames, args.duration, &path)
    }

    fn render_animation(
        &self,
        label: &str,
        frames: &[FrameParameters],
        duration_ms: u32,
        path: &Path,
    ) -> Result<()> {
        let start_time = Instant::now();
        let progress = if self.cli.should_show_progress() {
            FrameProgress::new(label, frames.len())
        } else {
            FrameProgress::hidden(frames.len())
        };

        let result = self
            .sequence_builder()
            .render_with(frames, &progress)
            .and_then(|patches| {
                progress.set_stage("encoding");
                encode_animation(patches, duration_ms, path)
            });

        match &result {
            Ok(()) => {
                progress.finish(format!("-> {}", path.display()));
                tracing::info!(
                    label,
                    frames = frames.len(),
                    elapsed_ms = start_time.elapsed().as_millis(),
                    path = %path.display(),
                    "animation complete"
                );
            }
            Err(_) => progress.abandon(),
        }
        result
    }

    fn run_frame(args: &FrameArgs) -> Result<()> {
        let mut params = FrameParameters::new(args.frequency, args.size)
            .with_contrast(args.contrast)
            .with_phase(args.phase)
            .with_shift(args.shift);
        if let Some(sigma) = args.sigma {
            params = params.with_sigma(sigma);
        }
        let patch = Patch::synthesize(&params)?;
        export_patch_png(&patch, &args.output)
    }

    fn run_resize(args: &ResizeArgs) -> Result<()> {
        let options = ResizeOptions {
            width: args.width,
            height: args.height,
            anchor: args.crop,
            quality: args.quality,
        };
        resize_file(&args.input, &args.output, &options)?;
        Ok(())
    }

    fn run_fit_height(args: &FitHeightArgs) -> Result<()> {
        fit_height_file(&args.input, &args.output, args.height, args.quality)?;
        Ok(())
    }

    fn run_scale(args: &ScaleArgs) -> Result<()> {
        scale_file(&args.input, &args.output, args.factor, args.quality)?;
        Ok(())
    }

    fn run_trim(args: &TrimArgs) -> Result<()> {
        trim_file(
            &args.input,
            &args.output,
            args.mode,
            args.fraction,
            args.quality,
        )?;
        Ok(())
    }

    fn run_gif_height(args: &GifHeightArgs) -> Result<()> {
        resize_animation_to_height(&args.input, &args.output, args.height)?;
        Ok(())
    }

    // Allow print for listing the files a user asked for
    #[allow(clippy::print_stdout)]
    fn run_variants(args: &VariantsArgs) -> Result<()> {
        for path in create_web_variants(&args.input, &args.output_dir)? {
            println!("{}", path.display());
        }
        Ok(())
    }

    fn run_enhance(args: &EnhanceArgs) -> Result<()> {
        let enhancement = Enhancement {
            brightness: args.brightness,
            contrast: args.contrast,
            saturation: args.saturation,
            sharpness: args.sharpness,
        };
        enhance_file(&args.input, &args.output, &enhancement, args.quality)
    }

    // Allow print for the report the user asked for
    #[allow(clippy::print_stdout)]
    fn run_inspect(args: &InspectArgs) -> Result<()> {
        let summary = inspect_animation(&args.path)?;
        println!("{}: {summary}", args.path.display());
        Ok(())
    }
}

//! Looping GIF encoding of frame sequences and inspection of the result
//!
//! Output is written through a temporary file in the destination directory
//! and renamed into place only after the whole animation encoded, so a failed
//! run never leaves a truncated GIF behind.

use crate::io::configuration::{GIF_DEFAULT_DELAY_MS, GIF_DELAY_GRANULARITY_MS};
use crate::io::error::{GaborError, Result, file_system_error, invalid_parameter};
use crate::stimulus::Patch;
use image::codecs::gif::{GifDecoder, GifEncoder, Repeat};
use image::error::{DecodingError, ImageFormatHint};
use image::{
    AnimationDecoder, Delay, Frame, GrayImage, ImageDecoder, ImageError, ImageFormat, Luma,
    RgbaImage,
};
use std::fmt;
use std::io::{Cursor, Write};
use std::path::{Path, PathBuf};

// Quantizer speed; grayscale frames fit the palette exactly at any speed
const ENCODER_SPEED: i32 = 10;

/// Ordered RGBA frames with a fixed per-frame display time, looping forever
#[derive(Debug, Clone)]
pub struct Animation {
    frames: Vec<RgbaImage>,
    frame_duration_ms: u32,
}

/// Reject display times a GIF cannot store exactly
///
/// GIF delays are whole centiseconds, so anything below 10 ms or off the
/// 10 ms grid would be silently rounded by the codec.
///
/// # Errors
///
/// Returns [`GaborError::InvalidParameter`] for such durations
pub fn validate_frame_duration(frame_duration_ms: u32) -> Result<()> {
    if frame_duration_ms < GIF_DELAY_GRANULARITY_MS {
        return Err(invalid_parameter(
            "frame_duration_ms",
            &frame_duration_ms,
            &format!("GIF delays must be at least {GIF_DELAY_GRANULARITY_MS} ms"),
        ));
    }
    if frame_duration_ms % GIF_DELAY_GRANULARITY_MS != 0 {
        return Err(invalid_parameter(
            "frame_duration_ms",
            &frame_duration_ms,
            &format!("GIF delays are stored in {GIF_DELAY_GRANULARITY_MS} ms steps"),
        ));
    }
    Ok(())
}

impl Animation {
    /// Assemble an animation from rendered patches
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - `frames` is empty
    /// - `frame_duration_ms` fails [`validate_frame_duration`]
    /// - Frames differ in size
    pub fn new(frames: Vec<Patch>, frame_duration_ms: u32) -> Result<Self> {
        Self::from_images(
            frames.iter().map(Patch::to_rgba_image).collect(),
            frame_duration_ms,
        )
    }

    /// Assemble an animation from arbitrary RGBA frames
    ///
    /// # Errors
    ///
    /// Same conditions as [`Animation::new`]
    pub fn from_images(frames: Vec<RgbaImage>, frame_duration_ms: u32) -> Result<Self> {
        let first = frames.first().ok_or(GaborError::EmptySequence)?;
        validate_frame_duration(frame_duration_ms)?;
        let (width, height) = first.dimensions();
        if let Some((index, odd)) = frames
            .iter()
            .enumerate()
            .find(|(_, frame)| frame.dimensions() != (width, height))
        {
            return Err(invalid_parameter(
                "frames",
                &format!("{}x{}", odd.width(), odd.height()),
                &format!("frame {index} does not match the {width}x{height} canvas"),
            ));
        }
        Ok(Self {
            frames,
            frame_duration_ms,
        })
    }

    /// Number of frames
    pub fn frame_count(&self) -> usize {
        self.frames.len()
    }

    /// Shared frame width and height in pixels
    pub fn dimensions(&self) -> (u32, u32) {
        self.frames.first().map_or((0, 0), RgbaImage::dimensions)
    }

    /// Display time of every frame
    pub const fn frame_duration_ms(&self) -> u32 {
        self.frame_duration_ms
    }

    /// Frames in playback order
    pub fn frames(&self) -> &[RgbaImage] {
        &self.frames
    }

    /// Encode as an in-memory GIF that loops indefinitely
    ///
    /// # Errors
    ///
    /// Returns an error if the GIF codec rejects a frame
    pub fn to_gif_bytes(&self) -> std::result::Result<Vec<u8>, ImageError> {
        let delay = Delay::from_numer_denom_ms(self.frame_duration_ms, 1);
        let mut bytes = Vec::new();
        {
            // The trailer is emitted when the encoder drops
            let mut encoder = GifEncoder::new_with_speed(&mut bytes, ENCODER_SPEED);
            encoder.set_repeat(Repeat::Infinite)?;
            encoder.encode_frames(
                self.frames
                    .iter()
                    .map(|frame| Frame::from_parts(frame.clone(), 0, 0, delay)),
            )?;
        }
        Ok(bytes)
    }

    /// Encode and atomically write the animation to `path`
    ///
    /// Missing parent directories are created.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - Encoding fails
    /// - The destination directory cannot be created or written
    /// - The temporary file cannot be renamed onto `path`
    #[tracing::instrument(level = "debug", skip(self), fields(frames = self.frames.len()))]
    pub fn write(&self, path: &Path) -> Result<()> {
        let bytes = self.to_gif_bytes().map_err(|e| GaborError::Encoding {
            path: path.to_path_buf(),
            source: e,
        })?;
        write_atomic(path, &bytes)?;
        tracing::info!(
            path = %path.display(),
            frames = self.frames.len(),
            bytes = bytes.len(),
            "animation written"
        );
        Ok(())
    }
}

/// Encode `frames` as a looping GIF at `path`
///
/// # Errors
///
/// Returns [`GaborError::EmptySequence`] for an empty sequence and otherwise
/// the errors of [`Animation::new`] and [`Animation::write`]
pub fn encode_animation(frames: Vec<Patch>, frame_duration_ms: u32, path: &Path) -> Result<()> {
    Animation::new(frames, frame_duration_ms)?.write(path)
}

/// Write `bytes` to a sibling temporary file, then rename it onto `path`
///
/// # Errors
///
/// Returns an error if any directory, write or rename step fails; the
/// temporary file is removed in that case
pub fn write_atomic(path: &Path, bytes: &[u8]) -> Result<()> {
    let parent = path
        .parent()
        .filter(|parent| !parent.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));

    std::fs::create_dir_all(parent)
        .map_err(|e| file_system_error(parent, "create directory", e))?;

    let mut staged = tempfile::Builder::new()
        .prefix(".gaborgif-")
        .suffix(".tmp")
        .tempfile_in(parent)
        .map_err(|e| file_system_error(parent, "create temporary file", e))?;

    staged
        .write_all(bytes)
        .and_then(|()| staged.as_file().sync_all())
        .map_err(|e| file_system_error(staged.path(), "write", e))?;

    staged
        .persist(path)
        .map_err(|e| file_system_error(path, "rename into place", e.error))?;
    Ok(())
}

/// Properties of an encoded animation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnimationSummary {
    /// Number of decoded frames
    pub frame_count: usize,
    /// Logical screen width
    pub width: u32,
    /// Logical screen height
    pub height: u32,
    /// Display time of each frame in order
    pub delays_ms: Vec<u32>,
    /// Whether the loop extension requests infinite repetition
    pub loops_forever: bool,
}

impl fmt::Display for AnimationSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} frames, {}x{}, ",
            self.frame_count, self.width, self.height
        )?;
        match (self.delays_ms.first(), self.delays_ms.iter().min(), self.delays_ms.iter().max()) {
            (Some(_), Some(min), Some(max)) if min == max => write!(f, "{min} ms per frame")?,
            (Some(_), Some(min), Some(max)) => write!(f, "{min}-{max} ms per frame")?,
            _ => write!(f, "no delays")?,
        }
        if self.loops_forever {
            write!(f, ", loops forever")
        } else {
            write!(f, ", plays once")
        }
    }
}

struct Decoded {
    width: u32,
    height: u32,
    frames: Vec<Frame>,
    loops_forever: bool,
}

fn decode(path: &Path) -> Result<Decoded> {
    let bytes = std::fs::read(path).map_err(|e| file_system_error(path, "read", e))?;
    let load_error = |source| GaborError::ImageLoad {
        path: PathBuf::from(path),
        source,
    };

    let decoder = GifDecoder::new(Cursor::new(bytes.as_slice())).map_err(load_error)?;
    let (width, height) = decoder.dimensions();
    let frames = decoder
        .into_frames()
        .collect_frames()
        .map_err(load_error)?;
    let loops_forever = read_loop_flag(&bytes).map_err(load_error)?;

    Ok(Decoded {
        width,
        height,
        frames,
        loops_forever,
    })
}

fn delay_ms(frame: &Frame) -> u32 {
    let (numer, denom) = frame.delay().numer_denom_ms();
    numer.checked_div(denom).unwrap_or(0)
}

// The loop extension is only known once the frames before it were read
fn read_loop_flag(bytes: &[u8]) -> std::result::Result<bool, ImageError> {
    let gif_error = |e: gif::DecodingError| {
        ImageError::Decoding(DecodingError::new(
            ImageFormatHint::Exact(ImageFormat::Gif),
            e,
        ))
    };
    let mut decoder = gif::DecodeOptions::new()
        .read_info(Cursor::new(bytes))
        .map_err(gif_error)?;
    while decoder.read_next_frame().map_err(gif_error)?.is_some() {}
    Ok(matches!(decoder.repeat(), gif::Repeat::Infinite))
}

/// Summarize the GIF at `path`
///
/// # Errors
///
/// Returns an error if the file cannot be read or is not a decodable GIF
pub fn inspect_animation(path: &Path) -> Result<AnimationSummary> {
    let decoded = decode(path)?;
    let delays_ms = decoded
        .frames
        .iter()
        .map(delay_ms)
        .collect();

    Ok(AnimationSummary {
        frame_count: decoded.frames.len(),
        width: decoded.width,
        height: decoded.height,
        delays_ms,
        loops_forever: decoded.loops_forever,
    })
}

/// Decode every frame of the GIF at `path` as grayscale, in playback order
///
/// # Errors
///
/// Returns an error if the file cannot be read or is not a decodable GIF
pub fn read_frames(path: &Path) -> Result<Vec<GrayImage>> {
    let decoded = decode(path)?;
    Ok(decoded
        .frames
        .into_iter()
        .map(|frame| luminance(&frame.into_buffer()))
        .collect())
}

/// Decode the GIF at `path` into an [`Animation`]
///
/// Every frame takes the first frame's delay; a zero delay becomes
/// [`GIF_DEFAULT_DELAY_MS`], the rate browsers fall back to.
///
/// # Errors
///
/// Returns an error if the file cannot be read or decoded
pub fn load_animation(path: &Path) -> Result<Animation> {
    let decoded = decode(path)?;
    let frame_duration_ms = decoded
        .frames
        .first()
        .map(delay_ms)
        .filter(|&delay| delay > 0)
        .unwrap_or(GIF_DEFAULT_DELAY_MS);
    Animation::from_images(
        decoded.frames.into_iter().map(Frame::into_buffer).collect(),
        frame_duration_ms,
    )
}

fn luminance(rgba: &RgbaImage) -> GrayImage {
    GrayImage::from_fn(rgba.width(), rgba.height(), |x, y| {
        Luma([rgba.get_pixel_checked(x, y).map_or(0, |pixel| pixel.0[0])])
    })
}
